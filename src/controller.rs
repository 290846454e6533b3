//! The sampling loop controller.
//!
//! Owns the run's mutable state, sequences the collaborators each cycle, and
//! applies the timing and slot-overwrite policies. Strictly single-threaded:
//! every call blocks, and a cycle runs to completion (or local failure)
//! before the next begins, keeping sensor, position, and capture tightly
//! time-correlated.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::camera::{CameraSink, CaptureRequest};
use crate::config::RunConfig;
use crate::error::Result;
use crate::geotag::GeoTag;
use crate::night::NightClassifier;
use crate::position::GroundTrack;
use crate::recorder::{SampleRecord, SampleRecorder};
use crate::sensor::FieldSensor;
use crate::solar::SolarEphemeris;
use crate::state::{LoopState, RunPhase};
use crate::store::PhotoStore;

/// Source of "now" and of blocking pauses.
///
/// One `now()` observation is taken per cycle so position, solar geometry,
/// and the elapsed-time check all see a consistent instant. Tests bind
/// [`crate::mock::ManualClock`] and run on virtual time.
pub trait TimeSource {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time source for flight runs.
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Outcome counters for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Cycles attempted, successful or not.
    pub cycles: u32,
    /// Rows appended to the sample log.
    pub records_written: u32,
    /// Cycles abandoned at the boundary after a caught failure.
    pub failed_cycles: u32,
}

/// Drives the Warming -> Sampling -> Finished run.
pub struct LoopController<G, S, C, T> {
    config: RunConfig,
    state: LoopState,
    phase: RunPhase,
    ground_track: G,
    sensor: S,
    camera: C,
    clock: T,
    ephemeris: SolarEphemeris,
    classifier: NightClassifier,
    store: PhotoStore,
    recorder: SampleRecorder,
}

impl<G, S, C, T> LoopController<G, S, C, T>
where
    G: GroundTrack,
    S: FieldSensor,
    C: CameraSink,
    T: TimeSource,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: RunConfig,
        ground_track: G,
        sensor: S,
        camera: C,
        clock: T,
        ephemeris: SolarEphemeris,
        store: PhotoStore,
        recorder: SampleRecorder,
    ) -> Self {
        let classifier = NightClassifier::new(config.night_threshold);
        Self {
            config,
            state: LoopState::new(),
            phase: RunPhase::Warming,
            ground_track,
            sensor,
            camera,
            clock,
            ephemeris,
            classifier,
            store,
            recorder,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run cycles until the configured duration has elapsed.
    ///
    /// A failure inside a cycle body is caught here, logged with its cause,
    /// and the cycle abandoned; the loop proceeds without retry. Only the
    /// elapsed-time check at the cycle boundary ends the run.
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = self.clock.now();
        let mut summary = RunSummary::default();
        info!(
            duration_secs = self.config.run_duration.as_secs(),
            "sampling run started"
        );

        loop {
            if self.phase == RunPhase::Warming {
                info!("camera warm-up");
                self.clock.sleep(self.config.warm_up_delay);
                self.phase = RunPhase::Sampling;
            }

            summary.cycles += 1;
            if let Err(e) = self.cycle() {
                summary.failed_cycles += 1;
                error!(cycle = self.state.cycle_index, "cycle abandoned: {e}");
            }
            self.state.next_cycle();

            let elapsed = self
                .clock
                .now()
                .signed_duration_since(started)
                .to_std()
                .unwrap_or_default();
            if elapsed >= self.config.run_duration {
                self.phase = RunPhase::Finished;
                break;
            }
        }

        if let Err(e) = self.camera.release() {
            warn!("camera release failed: {e}");
        }
        summary.records_written = self.recorder.rows_written() as u32;
        info!(
            cycles = summary.cycles,
            records = summary.records_written,
            failed = summary.failed_cycles,
            "sampling run finished"
        );
        Ok(summary)
    }

    /// One Sampling-phase cycle. Any error abandons the remainder of the
    /// cycle; state mutated before the failure point stands.
    fn cycle(&mut self) -> Result<()> {
        let now = self.clock.now();
        let cycle = self.state.cycle_index;
        info!(cycle, "cycle started");

        let position = self.ground_track.position_at(now)?;
        let field = self.sensor.magnetic_field()?;
        let heading = self.sensor.heading()?;
        let sun = self
            .ephemeris
            .sun_altaz(position.latitude_deg, position.longitude_deg, now)?;
        info!(
            cycle,
            latitude = position.latitude_deg,
            longitude = position.longitude_deg,
            sun_altitude = sun.altitude_deg,
            "position and solar geometry computed"
        );

        // The night flag in a row is the classification from the end of the
        // previous cycle; classification below feeds the next row.
        let record = SampleRecord::new(
            now,
            cycle,
            self.state.photo_index,
            self.state.last_night_flag,
            &field,
            &position,
            heading,
            &sun,
        );
        self.recorder.append(&record)?;

        let slot = self.state.photo_index;
        self.capture_geotagged(slot, &position, now)?;
        info!(cycle, slot, "photo captured");

        // Every third slot is followed by the short pause, producing a denser
        // burst every third capture.
        let delay = if slot % 3 == 0 {
            self.config.short_delay
        } else {
            self.config.long_delay
        };
        self.clock.sleep(delay);

        self.state.advance_photo();
        if self.state.can_classify() {
            let night = self
                .classifier
                .is_night(&self.store, self.state.newest_slot())?;
            self.state.apply_classification(night);
            if night {
                info!(
                    slot = self.state.photo_index,
                    "night side detected, slot will be overwritten"
                );
            }
        }
        Ok(())
    }

    /// Convert the position to EXIF rationals, capture into the slot path,
    /// and persist the metadata sidecar.
    fn capture_geotagged(
        &mut self,
        slot: u32,
        position: &crate::position::GroundPosition,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let request = CaptureRequest {
            slot,
            path: self.store.image_path(slot),
            geotag: GeoTag::from_position(position),
            timestamp: now,
        };
        let metadata = self.camera.capture(&request)?;
        self.store.write_metadata(slot, &metadata)
    }
}
