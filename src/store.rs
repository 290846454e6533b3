//! On-disk photo slot storage.
//!
//! Each slot owns one image file named by its zero-padded index plus a JSON
//! sidecar holding the capture metadata. Overwrites reuse both paths in
//! place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::CaptureMetadata;
use crate::error::{Result, SamplerError};
use crate::night::BrightnessSource;

/// Slot-indexed photo storage rooted at one output directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    base_dir: PathBuf,
}

impl PhotoStore {
    /// Create the store, making the output directory if needed. Failure here
    /// is fatal at startup.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Image path for a slot: `image_0001.jpg` etc.
    pub fn image_path(&self, slot: u32) -> PathBuf {
        self.base_dir.join(format!("image_{slot:04}.jpg"))
    }

    fn metadata_path(&self, slot: u32) -> PathBuf {
        self.base_dir.join(format!("image_{slot:04}.json"))
    }

    /// Persist the sidecar for a just-captured slot, replacing any previous
    /// occupant's metadata.
    pub fn write_metadata(&self, slot: u32, metadata: &CaptureMetadata) -> Result<()> {
        let json = serde_json::to_string_pretty(metadata).map_err(|e| SamplerError::Metadata {
            slot,
            reason: e.to_string(),
        })?;
        fs::write(self.metadata_path(slot), json)?;
        Ok(())
    }

    /// Read a slot's sidecar back. Missing or corrupt metadata is a hard
    /// error, never a default.
    pub fn read_metadata(&self, slot: u32) -> Result<CaptureMetadata> {
        let path = self.metadata_path(slot);
        let contents = fs::read_to_string(&path).map_err(|e| SamplerError::Metadata {
            slot,
            reason: format!("{}: {e}", path.display()),
        })?;
        serde_json::from_str(&contents).map_err(|e| SamplerError::Metadata {
            slot,
            reason: format!("{}: {e}", path.display()),
        })
    }
}

impl BrightnessSource for PhotoStore {
    fn brightness(&self, slot: u32) -> Result<f64> {
        Ok(self.read_metadata(slot)?.brightness)
    }
}
