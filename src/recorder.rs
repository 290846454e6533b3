//! Append-only CSV sample log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::position::GroundPosition;
use crate::sensor::{round3, MagneticField};
use crate::solar::SunPosition;
use crate::state::NightFlag;

/// Column order of the sample log.
const HEADER: [&str; 12] = [
    "timestamp",
    "cycle_index",
    "photo_index",
    "night_flag",
    "mag_x",
    "mag_y",
    "mag_z",
    "latitude",
    "longitude",
    "heading",
    "sun_altitude",
    "sun_azimuth",
];

/// One row of the sample log. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRecord {
    pub timestamp: DateTime<Utc>,
    pub cycle_index: u32,
    pub photo_index: u32,
    pub night_flag: NightFlag,
    pub mag_x: f64,
    pub mag_y: f64,
    pub mag_z: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub heading: f64,
    pub sun_altitude: f64,
    pub sun_azimuth: f64,
}

impl SampleRecord {
    /// Assemble a row from the cycle's measurements. Magnetic field and
    /// heading are rounded to three decimals at this boundary.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: DateTime<Utc>,
        cycle_index: u32,
        photo_index: u32,
        night_flag: NightFlag,
        field: &MagneticField,
        position: &GroundPosition,
        heading: f64,
        sun: &SunPosition,
    ) -> Self {
        let field = field.rounded();
        Self {
            timestamp,
            cycle_index,
            photo_index,
            night_flag,
            mag_x: field.x,
            mag_y: field.y,
            mag_z: field.z,
            latitude: position.latitude_deg,
            longitude: position.longitude_deg,
            heading: round3(heading),
            sun_altitude: sun.altitude_deg,
            sun_azimuth: sun.azimuth_deg,
        }
    }
}

/// CSV writer that flushes every row before returning, so a row is never
/// silently lost once `append` reports success.
pub struct SampleRecorder {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl SampleRecorder {
    /// Create the log file and write the header once. Failure here is fatal
    /// at startup.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Serialize and durably append one record. No buffering across cycles.
    pub fn append(&mut self, record: &SampleRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(cycle: u32) -> SampleRecord {
        SampleRecord::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
            cycle,
            cycle,
            NightFlag::Unknown,
            &MagneticField {
                x: 12.34567,
                y: -3.2,
                z: 0.125,
            },
            &GroundPosition {
                latitude_deg: 51.5074,
                longitude_deg: -0.1278,
            },
            123.45678,
            &SunPosition {
                altitude_deg: 10.0,
                azimuth_deg: 200.0,
            },
        )
    }

    #[test]
    fn header_is_written_at_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let _recorder = SampleRecorder::create(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().next().unwrap(), HEADER.join(","));
    }

    #[test]
    fn rows_are_visible_without_dropping_the_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut recorder = SampleRecorder::create(&path).unwrap();
        recorder.append(&sample(1)).unwrap();
        recorder.append(&sample(2)).unwrap();

        // Read back while the writer is still alive: flush-per-append.
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2026-05-01T12:00:00Z,1,1,unknown,"));
        assert_eq!(recorder.rows_written(), 2);
    }

    #[test]
    fn measurements_are_rounded_to_three_decimals() {
        let record = sample(1);
        assert_eq!(record.mag_x, 12.346);
        assert_eq!(record.heading, 123.457);
        // position and solar values pass through unrounded
        assert_eq!(record.latitude, 51.5074);
    }
}
