pub mod carving;
mod error;
pub mod jpeg;
mod traits;

pub use carving::{JpegCarver, ScanConfig, ScanSummary};
pub use error::{CoreError, Result};
pub use jpeg::{probe, Probe, Rejection};
pub use traits::{ByteSource, ImageSink, NoProgress, ProgressSink, RecoveredImage};
