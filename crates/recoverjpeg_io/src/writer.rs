use crate::naming::OutputLayout;
use chrono::Utc;
use recoverjpeg_core::{ImageSink, RecoveredImage, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const WRITE_BUFFER_SIZE: usize = 128 * 1024;

/// Provenance record written next to a recovered image.
#[derive(Debug, Serialize)]
struct ChainOfCustody {
    filename: String,
    source_offset: String,
    source_offset_decimal: u64,
    file_size: u64,
    sha256_hash: String,
    recovery_timestamp: String,
}

/// Writes every recovered image to its own file under an [`OutputLayout`].
pub struct FileWriter {
    layout: OutputLayout,
    custody: bool,
    ready_dir: Option<PathBuf>,
}

impl FileWriter {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            custody: false,
            ready_dir: None,
        }
    }

    /// Also writes a `<image>.custody.json` sidecar for every image.
    pub fn with_custody(mut self, enabled: bool) -> Self {
        self.custody = enabled;
        self
    }

    fn ensure_directory(&mut self, dir: &Path) -> Result<()> {
        if self.ready_dir.as_deref() == Some(dir) {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        self.ready_dir = Some(dir.to_path_buf());
        Ok(())
    }
}

impl ImageSink for FileWriter {
    fn write_image(&mut self, image: &RecoveredImage<'_>) -> Result<()> {
        let dir = self.layout.directory_for(image.index);
        self.ensure_directory(&dir)?;

        let path = self.layout.path_for(image.index);
        let file = File::create(&path)?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        writer.write_all(image.data)?;
        writer.flush()?;

        debug!(path = %path.display(), size = image.data.len(), "image written");

        if self.custody {
            write_chain_of_custody(&path, image)?;
        }

        Ok(())
    }
}

fn write_chain_of_custody(image_path: &Path, image: &RecoveredImage<'_>) -> Result<()> {
    let filename = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let custody = ChainOfCustody {
        filename,
        source_offset: format!("0x{:016X}", image.offset),
        source_offset_decimal: image.offset,
        file_size: image.data.len() as u64,
        sha256_hash: compute_sha256(image.data),
        recovery_timestamp: Utc::now().to_rfc3339(),
    };

    let sidecar_path = custody_path(image_path);
    let json = serde_json::to_string_pretty(&custody).map_err(std::io::Error::other)?;
    fs::write(&sidecar_path, json)?;

    info!(path = %sidecar_path.display(), "custody record written");
    Ok(())
}

fn custody_path(image_path: &Path) -> PathBuf {
    let mut name = image_path.as_os_str().to_owned();
    name.push(".custody.json");
    PathBuf::from(name)
}

fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
