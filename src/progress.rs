//! Terminal progress bar for the carving scan.

use anyhow::Result;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use recoverjpeg_core::ProgressSink;

pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn for_scan(device_size: u64) -> Result<Self> {
        let bar = ProgressBar::new(device_size);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {msg}")?
                .progress_chars("##-"),
        );
        Ok(Self { bar })
    }
}

impl ProgressSink for BarProgress {
    fn report_progress(&mut self, bytes_scanned: u64, images_found: u64) {
        self.bar.set_position(bytes_scanned);
        self.bar.set_message(format!(
            "Recovered files: {images_found:4}  Analyzed: {}",
            format_size(bytes_scanned, BINARY)
        ));
    }

    fn report_done(&mut self) {
        self.bar.finish_and_clear();
    }
}
