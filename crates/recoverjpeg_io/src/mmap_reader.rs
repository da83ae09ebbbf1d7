//! Read-only memory mapping of a disk, partition or image file.

use memmap2::{Mmap, MmapOptions};
use recoverjpeg_core::{ByteSource, CoreError, Result};
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Maps the whole input into memory so the scanner can hand the walker a
/// window reaching to the true end of the stream.
///
/// The size is taken by seeking to the end rather than from file metadata,
/// which reports zero for block devices. An empty input maps nothing.
pub struct MmapReader {
    mmap: Option<Mmap>,
    size: u64,
}

impl MmapReader {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let size = file.seek(SeekFrom::End(0))?;

        if size == 0 {
            debug!(path = %path.display(), "input is empty");
            return Ok(Self { mmap: None, size });
        }

        let len = usize::try_from(size).map_err(|_| {
            CoreError::InvalidFormat(format!("input of {size} bytes does not fit in memory"))
        })?;

        #[cfg(target_os = "linux")]
        {
            use rustix::fs::{fadvise, Advice};
            if let Err(err) = fadvise(&file, 0, None, Advice::Sequential) {
                debug!(path = %path.display(), %err, "fadvise failed");
            }
        }

        let mmap = unsafe { MmapOptions::new().len(len).map(&file) }?;

        #[cfg(target_os = "linux")]
        {
            if let Err(err) = mmap.advise(memmap2::Advice::Sequential) {
                debug!(path = %path.display(), %err, "madvise failed");
            }
        }

        debug!(path = %path.display(), size, "input mapped");
        Ok(Self {
            mmap: Some(mmap),
            size,
        })
    }
}

impl ByteSource for MmapReader {
    fn len(&self) -> u64 {
        self.size
    }

    fn window(&self, offset: u64) -> &[u8] {
        match self.mmap.as_deref() {
            Some(data) => ByteSource::window(data, offset),
            None => &[],
        }
    }
}
