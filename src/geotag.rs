//! Decimal-degree to EXIF-style rational angle conversion.
//!
//! Image metadata stores angles as unsigned degree/minute/second rationals
//! plus a hemisphere reference letter. Seconds are kept as an exact
//! tenths-of-arcsecond integer (`T/10`) so nothing is lost to floating-point
//! rounding between capture and read-back.

use serde::{Deserialize, Serialize};

use crate::position::GroundPosition;

/// Sign + degree/minute/second decomposition of a geodetic angle.
///
/// Invariants: `minutes < 60`, `seconds_tenths < 600`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmsAngle {
    /// True for south latitudes / west longitudes.
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    /// Arcseconds scaled by ten, carried as an integer.
    pub seconds_tenths: u32,
}

impl DmsAngle {
    /// Decompose a signed decimal-degree angle.
    ///
    /// Works on the total count of arcsecond tenths so carries (59.95" → next
    /// minute) fall out of the integer arithmetic instead of needing
    /// per-component fixups.
    pub fn from_degrees(angle_deg: f64) -> Self {
        let negative = angle_deg < 0.0;
        let total_tenths = (angle_deg.abs() * 36_000.0).round() as u64;
        Self {
            negative,
            degrees: (total_tenths / 36_000) as u32,
            minutes: ((total_tenths / 600) % 60) as u32,
            seconds_tenths: (total_tenths % 600) as u32,
        }
    }

    /// Reconstruct the unsigned decimal angle.
    pub fn magnitude_degrees(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds_tenths as f64 / 36_000.0
    }

    /// Reconstruct the signed decimal angle.
    pub fn to_degrees(&self) -> f64 {
        let magnitude = self.magnitude_degrees();
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// EXIF rational string, e.g. `98° 34' 58.7"` → `"98/1,34/1,587/10"`.
    pub fn exif_rational(&self) -> String {
        format!(
            "{}/1,{}/1,{}/10",
            self.degrees, self.minutes, self.seconds_tenths
        )
    }
}

/// Position metadata embedded alongside a captured image.
///
/// Stored in the slot's JSON sidecar; hemisphere references follow the EXIF
/// GPS convention (N/S for latitude, E/W for longitude).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoTag {
    pub latitude: String,
    pub latitude_ref: char,
    pub longitude: String,
    pub longitude_ref: char,
}

impl GeoTag {
    pub fn from_position(position: &GroundPosition) -> Self {
        let lat = DmsAngle::from_degrees(position.latitude_deg);
        let lon = DmsAngle::from_degrees(position.longitude_deg);
        Self {
            latitude: lat.exif_rational(),
            latitude_ref: if lat.negative { 'S' } else { 'N' },
            longitude: lon.exif_rational(),
            longitude_ref: if lon.negative { 'W' } else { 'E' },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn london_round_trips_within_tolerance() {
        let lat = DmsAngle::from_degrees(51.5074);
        assert!(!lat.negative);
        assert_eq!(lat.degrees, 51);
        assert_eq!(lat.minutes, 30);
        assert_abs_diff_eq!(lat.to_degrees(), 51.5074, epsilon = 1e-4);

        let lon = DmsAngle::from_degrees(-0.1278);
        assert!(lon.negative);
        assert_eq!(lon.degrees, 0);
        assert_eq!(lon.minutes, 7);
        assert_abs_diff_eq!(lon.to_degrees(), -0.1278, epsilon = 1e-4);
    }

    #[test]
    fn rational_string_format() {
        let angle = DmsAngle {
            negative: false,
            degrees: 98,
            minutes: 34,
            seconds_tenths: 587,
        };
        assert_eq!(angle.exif_rational(), "98/1,34/1,587/10");
    }

    #[test]
    fn seconds_carry_into_minutes_and_degrees() {
        // 45.999999° is within half a tenth of 46° 0' 0.0"
        let angle = DmsAngle::from_degrees(45.999_999);
        assert_eq!(angle.degrees, 46);
        assert_eq!(angle.minutes, 0);
        assert_eq!(angle.seconds_tenths, 0);
    }

    #[test]
    fn components_stay_in_range() {
        for &deg in &[0.0, -0.1278, 51.5074, -89.9999, 179.999_99, -179.999_99] {
            let angle = DmsAngle::from_degrees(deg);
            assert!(angle.minutes < 60, "minutes out of range for {deg}");
            assert!(angle.seconds_tenths < 600, "seconds out of range for {deg}");
        }
    }

    #[test]
    fn hemisphere_references() {
        let tag = GeoTag::from_position(&GroundPosition {
            latitude_deg: 51.5074,
            longitude_deg: -0.1278,
        });
        assert_eq!(tag.latitude_ref, 'N');
        assert_eq!(tag.longitude_ref, 'W');

        let tag = GeoTag::from_position(&GroundPosition {
            latitude_deg: -33.8688,
            longitude_deg: 151.2093,
        });
        assert_eq!(tag.latitude_ref, 'S');
        assert_eq!(tag.longitude_ref, 'E');
    }
}
