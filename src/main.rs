use anyhow::Result;
use clap::Parser;

use recoverjpeg::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let summary = recoverjpeg::run(&args)?;

    if !args.quiet {
        println!("{}", recoverjpeg::restored_message(summary.recovered));
    }

    Ok(())
}
