//! Camera abstraction for the sampling loop.
//!
//! The loop drives a [`CameraSink`] one capture at a time; production wiring
//! binds the real device, tests bind [`crate::mock::MockCamera`], and
//! [`SimulatedCamera`] renders real JPEG frames for hardware-free runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SamplerError};
use crate::geotag::GeoTag;

/// One capture order issued by the loop controller.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Destination photo slot; reused when the overwrite policy triggers.
    pub slot: u32,
    /// Image file path for this slot.
    pub path: PathBuf,
    /// Position metadata to embed with the image.
    pub geotag: GeoTag,
    /// Cycle timestamp (the single per-cycle instant).
    pub timestamp: DateTime<Utc>,
}

/// Metadata persisted alongside each captured image.
///
/// `brightness` is the exposure-metadata field the night classifier reads
/// back; everything else is carried for the downstream analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub captured_at: DateTime<Utc>,
    pub brightness: f64,
    #[serde(flatten)]
    pub geotag: GeoTag,
}

/// Exclusive camera device handle.
pub trait CameraSink {
    /// Capture one image into `request.path`, embedding the geotag, and
    /// report the capture metadata. Creates or overwrites the file.
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureMetadata>;

    /// Release the device at the end of the run.
    fn release(&mut self) -> Result<()>;
}

/// Camera stand-in that writes real JPEG frames of a configured luminance.
///
/// Lets the full loop run on a bench with no camera attached: the reported
/// brightness equals the configured value, and the rendered frame's gray
/// level matches it so the files are honest to eyeball.
pub struct SimulatedCamera {
    brightness: f64,
    width: u32,
    height: u32,
}

impl SimulatedCamera {
    pub fn new(brightness: f64) -> Self {
        Self {
            brightness,
            width: 64,
            height: 48,
        }
    }

    pub fn set_brightness(&mut self, brightness: f64) {
        self.brightness = brightness;
    }
}

impl CameraSink for SimulatedCamera {
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureMetadata> {
        let level = (self.brightness.clamp(0.0, 1.0) * 255.0) as u8;
        let frame = image::GrayImage::from_pixel(self.width, self.height, image::Luma([level]));
        frame
            .save(&request.path)
            .map_err(|e| SamplerError::Capture(format!("{}: {e}", request.path.display())))?;
        Ok(CaptureMetadata {
            captured_at: request.timestamp,
            brightness: self.brightness,
            geotag: request.geotag.clone(),
        })
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}
