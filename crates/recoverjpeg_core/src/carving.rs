//! Block-aligned carving scanner.
//!
//! Probes the input at every block boundary. A validated JPEG is handed to
//! the sink and the cursor jumps past it, rounded up to the next block;
//! anything else advances the cursor by a single block.

use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::jpeg::{self, Probe, MIN_JPEG_SIZE};
use crate::traits::{ByteSource, ImageSink, ProgressSink, RecoveredImage};

pub const DEFAULT_BLOCK_SIZE: u64 = 512;
pub const DEFAULT_MAX_SIZE: usize = 6 * 1024 * 1024;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Alignment of candidate offsets and of the advance after a recovery.
    pub block_size: u64,
    /// Upper bound for segment lengths and for the end of scan data.
    pub max_size: usize,
    /// Images must be strictly larger than this to be kept.
    pub min_size: usize,
    /// Index given to the first recovered image.
    pub start_index: u64,
    /// Offset at which scanning starts.
    pub skip_bytes: u64,
    /// Minimum cursor advance between two progress reports.
    pub progress_interval: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            min_size: 0,
            start_index: 0,
            skip_bytes: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(CoreError::InvalidConfig(
                "block size must be greater than zero".into(),
            ));
        }
        if self.max_size < MIN_JPEG_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "maximum size must be at least {MIN_JPEG_SIZE} bytes"
            )));
        }
        if self.progress_interval == 0 {
            return Err(CoreError::InvalidConfig(
                "progress interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Images handed to the sink.
    pub recovered: u64,
    /// Valid images dropped because they were not larger than `min_size`.
    pub undersized: u64,
    /// Bytes covered by the scan, from the skip offset to the end.
    pub bytes_scanned: u64,
}

pub struct JpegCarver {
    config: ScanConfig,
}

impl JpegCarver {
    pub fn with_config(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scans `input` from the configured skip offset to its end.
    ///
    /// Every recovered image is written to `sink` before the cursor moves
    /// on, so indices follow scan order. A sink error stops the scan.
    pub fn scan<I, W, P>(&self, input: &I, mut sink: W, mut progress: P) -> Result<ScanSummary>
    where
        I: ByteSource + ?Sized,
        W: ImageSink,
        P: ProgressSink,
    {
        let size = input.len();
        let block_size = self.config.block_size;
        let mut summary = ScanSummary::default();
        let mut offset = self.config.skip_bytes;
        let mut next_report = offset;
        let mut reported = false;

        debug!(size, offset, block_size, "starting scan");

        while offset < size {
            if offset >= next_report {
                progress.report_progress(offset, summary.recovered);
                next_report = offset.saturating_add(self.config.progress_interval);
                reported = true;
            }

            let window = input.window(offset);
            let length = match jpeg::probe(window, self.config.max_size) {
                Probe::Accepted { length } if length > self.config.min_size => length,
                Probe::Accepted { length } => {
                    trace!(offset, length, "skipping undersized image");
                    summary.undersized += 1;
                    offset = offset.saturating_add(block_size);
                    continue;
                }
                Probe::Rejected(_) => {
                    offset = offset.saturating_add(block_size);
                    continue;
                }
            };

            let index = self
                .config
                .start_index
                .checked_add(summary.recovered)
                .ok_or_else(|| {
                    CoreError::InvalidConfig(format!(
                        "picture index overflows after {} recovered images",
                        summary.recovered
                    ))
                })?;
            let image = RecoveredImage {
                index,
                offset,
                data: &window[..length],
            };
            sink.write_image(&image)?;
            debug!(
                index = image.index,
                "recovered image at offset {offset:#x} ({length} bytes)"
            );

            summary.recovered += 1;
            offset = offset.saturating_add(round_up(length as u64, block_size));
        }

        if reported {
            progress.report_done();
        }

        summary.bytes_scanned = size.saturating_sub(self.config.skip_bytes);
        Ok(summary)
    }
}

#[inline]
fn round_up(length: u64, block_size: u64) -> u64 {
    length.div_ceil(block_size) * block_size
}
