//! Recover JPEG pictures from a raw disk, a disk image or a damaged
//! filesystem by carving them out of the raw bytes.

pub mod cli;
pub mod progress;
pub mod size;

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use recoverjpeg_core::{ByteSource, JpegCarver, NoProgress, ScanSummary};
use recoverjpeg_io::{FileWriter, MmapReader};
use tracing::info;

use cli::Args;
use progress::BarProgress;

/// Runs one recovery as described by `args`.
///
/// Configuration is checked before the input is opened. Failing to read
/// the input or to write a picture aborts the run.
pub fn run(args: &Args) -> Result<ScanSummary> {
    let config = args.scan_config()?;
    let layout = args.output_layout()?;
    let carver = JpegCarver::with_config(config)?;

    let reader = MmapReader::new(&args.input)
        .with_context(|| format!("unable to open {} for reading", args.input.display()))?;

    info!(
        "scanning {} ({})",
        args.input.display(),
        format_size(reader.len(), BINARY)
    );

    let mut writer = FileWriter::new(layout).with_custody(args.custody);
    let summary = if args.show_progress() {
        carver.scan(&reader, &mut writer, BarProgress::for_scan(reader.len())?)
    } else {
        carver.scan(&reader, &mut writer, NoProgress)
    }
    .with_context(|| format!("unable to restore pictures into {}", args.output.display()))?;

    info!(
        recovered = summary.recovered,
        undersized = summary.undersized,
        "analyzed {}",
        format_size(summary.bytes_scanned, BINARY)
    );

    Ok(summary)
}

/// Final line printed after a run, e.g. `Restored 3 pictures`.
pub fn restored_message(recovered: u64) -> String {
    format!(
        "Restored {} picture{}",
        recovered,
        if recovered > 1 { "s" } else { "" }
    )
}
