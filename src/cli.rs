use crate::size::{parse_nonzero_size, parse_size};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use recoverjpeg_core::ScanConfig;
use recoverjpeg_io::{NameFormat, OutputLayout, DEFAULT_FILE_FORMAT};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "recoverjpeg")]
#[command(version, about = "Recover JPEG pictures from a file or a device", long_about = None)]
pub struct Args {
    /// File or device to scan
    #[arg(value_name = "FILE|DEVICE")]
    pub input: PathBuf,

    /// Block size in bytes
    #[arg(short = 'b', long, value_name = "SIZE", default_value = "512", value_parser = parse_nonzero_size)]
    pub block_size: u64,

    /// Directory format string in printf syntax, one directory per 100 pictures
    #[arg(short = 'd', long, value_name = "FORMAT")]
    pub dir_format: Option<String>,

    /// File format string in printf syntax
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = DEFAULT_FILE_FORMAT)]
    pub file_format: String,

    /// Initial picture index
    #[arg(short = 'i', long = "index", value_name = "INDEX", default_value_t = 0)]
    pub start_index: u64,

    /// Max jpeg file size in bytes
    #[arg(short = 'm', long, value_name = "SIZE", default_value = "6m", value_parser = parse_size)]
    pub max_size: u64,

    /// Restore jpeg files into this directory
    #[arg(short = 'o', long, value_name = "DIRECTORY", default_value = ".")]
    pub output: PathBuf,

    /// Be quiet
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Minimal file size in bytes to restore
    #[arg(short = 's', long, value_name = "SIZE", default_value = "0", value_parser = parse_size)]
    pub cutoff: u64,

    /// Size to skip at the beginning
    #[arg(short = 'S', long, value_name = "SIZE", default_value = "0", value_parser = parse_size)]
    pub skip: u64,

    /// Be verbose (repeat for a full segment trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write a chain-of-custody JSON file next to every picture
    #[arg(long)]
    pub custody: bool,
}

impl Args {
    pub fn scan_config(&self) -> Result<ScanConfig> {
        let config = ScanConfig {
            block_size: self.block_size,
            max_size: usize::try_from(self.max_size).context("max size does not fit in memory")?,
            min_size: usize::try_from(self.cutoff).context("cutoff does not fit in memory")?,
            start_index: self.start_index,
            skip_bytes: self.skip,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn output_layout(&self) -> Result<OutputLayout> {
        let file_format = NameFormat::parse(&self.file_format)?;
        let layout = OutputLayout::new(&self.output, file_format);

        match &self.dir_format {
            Some(dir_format) => Ok(layout.with_dir_format(NameFormat::parse(dir_format)?)),
            None => Ok(layout),
        }
    }

    /// The progress bar would interleave with the diagnostic trace, so it
    /// is shown only in the default mode.
    #[inline]
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbose == 0
    }

    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::WARN,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("recoverjpeg").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["disk.img"]);
        let config = args.scan_config().unwrap();

        assert_eq!(config, ScanConfig::default());
        assert_eq!(args.output, PathBuf::from("."));
        assert!(args.show_progress());
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn test_sizes_with_suffixes() {
        let args = parse(&["-b", "4k", "-m", "10m", "-s", "1k", "-S", "1g", "-i", "7", "/dev/sdb"]);
        let config = args.scan_config().unwrap();

        assert_eq!(config.block_size, 4096);
        assert_eq!(config.max_size, 10 * 1024 * 1024);
        assert_eq!(config.min_size, 1024);
        assert_eq!(config.skip_bytes, 1 << 30);
        assert_eq!(config.start_index, 7);
    }

    #[test]
    fn test_quiet_and_verbose() {
        assert!(!parse(&["-q", "x"]).show_progress());
        assert_eq!(parse(&["-q", "x"]).log_level(), Level::ERROR);
        assert!(!parse(&["-v", "x"]).show_progress());
        assert_eq!(parse(&["-v", "x"]).log_level(), Level::DEBUG);
        assert_eq!(parse(&["-vv", "x"]).log_level(), Level::TRACE);
    }

    #[test]
    fn test_layout() {
        let args = parse(&["-o", "/out", "-d", "dir%03d", "-f", "p%d.jpg", "x"]);
        let layout = args.output_layout().unwrap();
        assert_eq!(layout.path_for(250), PathBuf::from("/out/dir002/p250.jpg"));
    }
}
