//! Ground-track position from two-line orbital elements.
//!
//! SGP4 propagation yields a TEME position vector; rotating it by Greenwich
//! mean sidereal time gives an Earth-fixed vector, and a WGS-84 iteration
//! gives the geodetic point directly beneath the platform.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::error::{Result, SamplerError};

/// WGS-84 semi-major axis in kilometers.
const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Geodetic ground point beneath the platform, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Source of the platform's current ground-track position.
///
/// Pure function of the supplied instant: no side effects, no caching.
/// Production binds [`TleGroundTrack`]; tests bind a fixed fake.
pub trait GroundTrack {
    fn position_at(&self, t: DateTime<Utc>) -> Result<GroundPosition>;
}

/// SGP4-backed ground track seeded from a TLE set.
pub struct TleGroundTrack {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl TleGroundTrack {
    /// Parse a TLE pair. Failure here is fatal at startup.
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| SamplerError::Propagation(format!("TLE parse: {e}")))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| SamplerError::Propagation(format!("SGP4 init: {e}")))?;
        Ok(Self {
            elements,
            constants,
        })
    }

    /// Load a TLE from a file containing either two element lines or a named
    /// three-line set.
    pub fn from_tle_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut lines = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        let first = lines
            .next()
            .ok_or_else(|| SamplerError::Propagation("empty TLE file".into()))?;
        // A leading name line carries no line-number prefix.
        let (line1, line2) = if first.starts_with("1 ") {
            (first, lines.next())
        } else {
            (
                lines.next().ok_or_else(|| {
                    SamplerError::Propagation("TLE file missing element lines".into())
                })?,
                lines.next(),
            )
        };
        let line2 = line2
            .ok_or_else(|| SamplerError::Propagation("TLE file missing second line".into()))?;
        Self::from_tle(line1, line2)
    }

    /// Epoch of the loaded element set.
    pub fn epoch(&self) -> chrono::NaiveDateTime {
        self.elements.datetime
    }
}

impl GroundTrack for TleGroundTrack {
    fn position_at(&self, t: DateTime<Utc>) -> Result<GroundPosition> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&t.naive_utc())
            .map_err(|e| SamplerError::Propagation(e.to_string()))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| SamplerError::Propagation(e.to_string()))?;
        let [x, y, z] = prediction.position;

        // TEME -> pseudo Earth-fixed: rotate about the pole by GMST.
        let gmst = gmst_radians(t);
        let (sin_g, cos_g) = gmst.sin_cos();
        let ex = cos_g * x + sin_g * y;
        let ey = -sin_g * x + cos_g * y;

        let longitude_deg = ey.atan2(ex).to_degrees();
        let latitude_deg = geodetic_latitude_deg(ex.hypot(ey), z);
        Ok(GroundPosition {
            latitude_deg,
            longitude_deg,
        })
    }
}

/// Greenwich mean sidereal time (IAU 1982 series) in radians.
fn gmst_radians(t: DateTime<Utc>) -> f64 {
    let jd = t.timestamp() as f64 / 86_400.0
        + t.timestamp_subsec_nanos() as f64 / 86_400.0e9
        + 2_440_587.5;
    let d = jd - 2_451_545.0;
    let centuries = d / 36_525.0;
    let gmst_deg = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * centuries * centuries
        - centuries * centuries * centuries / 38_710_000.0;
    gmst_deg.rem_euclid(360.0).to_radians()
}

/// Geodetic latitude for an Earth-fixed point, via the standard WGS-84
/// fixed-point iteration on the prime-vertical radius.
fn geodetic_latitude_deg(p_km: f64, z_km: f64) -> f64 {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let mut lat = (z_km).atan2(p_km * (1.0 - e2));
    for _ in 0..5 {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = (z_km + e2 * n * sin_lat).atan2(p_km);
    }
    lat.to_degrees()
}
