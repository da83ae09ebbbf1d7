//! Core traits defining the collaborators of the carving scanner.
//!
//! The scanner only ever sees these interfaces, so the same loop runs over
//! a memory-mapped disk, an in-memory buffer in tests, or any other
//! random-access byte store. Output and progress follow the same pattern.

use crate::error::Result;

/// A read-only, randomly addressable stream of bytes, typically a disk or
/// a disk image mapped into memory.
///
/// # Example
///
/// ```ignore
/// struct MappedDisk { /* ... */ }
///
/// impl ByteSource for MappedDisk {
///     fn len(&self) -> u64 {
///         // Total size in bytes
///     }
///
///     fn window(&self, offset: u64) -> &[u8] {
///         // Everything from `offset` to the end of the disk
///     }
/// }
/// ```
pub trait ByteSource {
    /// Returns the total size of the stream in bytes.
    fn len(&self) -> u64;

    /// Returns the bytes from `offset` to the end of the stream.
    ///
    /// An offset at or past the end yields an empty slice.
    fn window(&self, offset: u64) -> &[u8];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ByteSource for [u8] {
    fn len(&self) -> u64 {
        <[u8]>::len(self) as u64
    }

    fn window(&self, offset: u64) -> &[u8] {
        usize::try_from(offset)
            .ok()
            .and_then(|start| self.get(start..))
            .unwrap_or(&[])
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    fn window(&self, offset: u64) -> &[u8] {
        ByteSource::window(self.as_slice(), offset)
    }
}

/// One validated JPEG handed to an [`ImageSink`].
#[derive(Debug, Clone, Copy)]
pub struct RecoveredImage<'a> {
    /// Output index: the configured start index plus the number of images
    /// recovered before this one.
    pub index: u64,
    /// Absolute offset of the start-of-image marker in the input.
    pub offset: u64,
    /// Exactly the bytes of the image, start-of-image through end-of-image.
    pub data: &'a [u8],
}

/// Destination for recovered images.
///
/// Each image is delivered exactly once, in scan order. An error returned
/// here is fatal to the scan.
pub trait ImageSink {
    /// Persists one recovered image.
    ///
    /// # Arguments
    ///
    /// * `image` - The image bytes together with its index and source offset
    fn write_image(&mut self, image: &RecoveredImage<'_>) -> Result<()>;
}

impl<S: ImageSink + ?Sized> ImageSink for &mut S {
    fn write_image(&mut self, image: &RecoveredImage<'_>) -> Result<()> {
        (**self).write_image(image)
    }
}

/// Receives scan progress.
pub trait ProgressSink {
    /// Called periodically with the number of bytes analysed so far and the
    /// number of images recovered so far.
    fn report_progress(&mut self, bytes_scanned: u64, images_found: u64);

    /// Called once when the scan is over, if any progress was reported.
    fn report_done(&mut self);
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn report_progress(&mut self, bytes_scanned: u64, images_found: u64) {
        (**self).report_progress(bytes_scanned, images_found);
    }

    fn report_done(&mut self) {
        (**self).report_done();
    }
}

/// Progress sink that discards everything, used in quiet and verbose modes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report_progress(&mut self, _bytes_scanned: u64, _images_found: u64) {}

    fn report_done(&mut self) {}
}
