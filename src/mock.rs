//! Deterministic stand-ins for the hardware and time seams.
//!
//! These let the full loop run in unit and integration tests with no
//! devices attached and no real sleeps: [`ManualClock`] advances virtual
//! time by exactly the requested pauses.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::camera::{CameraSink, CaptureMetadata, CaptureRequest};
use crate::error::{Result, SamplerError};
use crate::position::{GroundPosition, GroundTrack};
use crate::sensor::{FieldSensor, MagneticField};

/// Virtual clock: `sleep` advances `now` instead of blocking.
pub struct ManualClock {
    now: RefCell<DateTime<Utc>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RefCell::new(start),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn starting_at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Self::new(
            Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
                .single()
                .unwrap_or_else(|| panic!("invalid test datetime")),
        )
    }

    /// Every pause requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl crate::controller::TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.borrow()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        let mut now = self.now.borrow_mut();
        *now += chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

/// Ground track pinned to one point, for runs with stubbed propagation.
pub struct FixedGroundTrack {
    position: GroundPosition,
}

impl FixedGroundTrack {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            position: GroundPosition {
                latitude_deg,
                longitude_deg,
            },
        }
    }
}

impl GroundTrack for FixedGroundTrack {
    fn position_at(&self, _t: DateTime<Utc>) -> Result<GroundPosition> {
        Ok(self.position)
    }
}

/// Scripted magnetometer: steady values, optionally failing on one read.
pub struct MockSensor {
    field: MagneticField,
    heading: f64,
    reads: u32,
    fail_on_read: Option<u32>,
}

impl MockSensor {
    /// Fixed, benign readings for every cycle.
    pub fn steady() -> Self {
        Self {
            field: MagneticField {
                x: 12.3456,
                y: -4.5678,
                z: 30.9,
            },
            heading: 182.5012,
            reads: 0,
            fail_on_read: None,
        }
    }

    /// Steady readings except the `cycle`-th magnetic-field read, which
    /// errors to exercise the abandoned-cycle path.
    pub fn failing_on_cycle(cycle: u32) -> Self {
        Self {
            fail_on_read: Some(cycle),
            ..Self::steady()
        }
    }
}

impl FieldSensor for MockSensor {
    fn magnetic_field(&mut self) -> Result<MagneticField> {
        self.reads += 1;
        if self.fail_on_read == Some(self.reads) {
            return Err(SamplerError::Sensor("simulated device timeout".into()));
        }
        Ok(self.field)
    }

    fn heading(&mut self) -> Result<f64> {
        Ok(self.heading)
    }
}

type BrightnessFn = Box<dyn Fn(u32) -> f64>;

/// Scripted camera: brightness is a function of the destination slot, and
/// every capture is logged so tests can observe the overwrite policy.
pub struct MockCamera {
    brightness: BrightnessFn,
    captures: Rc<RefCell<Vec<u32>>>,
}

impl MockCamera {
    pub fn with_brightness(brightness: impl Fn(u32) -> f64 + 'static) -> Self {
        Self {
            brightness: Box::new(brightness),
            captures: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared handle to the slot sequence captured so far.
    pub fn capture_log(&self) -> Rc<RefCell<Vec<u32>>> {
        Rc::clone(&self.captures)
    }
}

impl CameraSink for MockCamera {
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureMetadata> {
        // Write a stub file so the slot visibly exists on disk.
        std::fs::write(&request.path, b"mock frame")
            .map_err(|e| SamplerError::Capture(format!("{}: {e}", request.path.display())))?;
        self.captures.borrow_mut().push(request.slot);
        Ok(CaptureMetadata {
            captured_at: request.timestamp,
            brightness: (self.brightness)(request.slot),
            geotag: request.geotag.clone(),
        })
    }

    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}
