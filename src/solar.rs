//! Apparent solar altitude/azimuth for a ground point.
//!
//! The per-day quantities (declination, equation of time) are tabulated once
//! at process start into a [`SolarEphemeris`]; the per-call work is the hour
//! angle and the altitude/azimuth trigonometry. No claim is made that the
//! resulting geometry correlates with sea-surface reflection conditions; this
//! module only supplies the numbers.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::{Result, SamplerError};

/// Earth's axial tilt in degrees.
const AXIAL_TILT_DEG: f64 = 23.45;
/// Hour angle rate: the sun moves 15 degrees of hour angle per hour.
const DEGREES_PER_HOUR: f64 = 15.0;

/// Sun position as seen from a ground point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Apparent height above the horizon, degrees.
    pub altitude_deg: f64,
    /// Compass bearing, degrees clockwise from north in [0, 360).
    pub azimuth_deg: f64,
}

/// One tabulated day of solar geometry inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SolarDay {
    declination_deg: f64,
    equation_of_time_min: f64,
}

/// Per-day solar dataset for a single calendar year.
///
/// Built once at startup; lookups outside the tabulated year are an
/// ephemeris error so a run straddling New Year surfaces the stale dataset
/// instead of silently extrapolating.
#[derive(Debug, Clone)]
pub struct SolarEphemeris {
    year: i32,
    days: Vec<SolarDay>,
}

impl SolarEphemeris {
    /// Tabulate declination and equation of time for every day of `year`.
    pub fn generate(year: i32) -> Self {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        let day_count = if leap { 366 } else { 365 };
        let days = (1..=day_count)
            .map(|day_of_year| SolarDay {
                declination_deg: declination_deg(day_of_year),
                equation_of_time_min: equation_of_time_min(day_of_year),
            })
            .collect();
        Self { year, days }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    fn day(&self, t: DateTime<Utc>) -> Result<SolarDay> {
        if t.year() != self.year {
            return Err(SamplerError::Ephemeris(format!(
                "time {} outside tabulated year {}",
                t.format("%Y-%m-%d %H:%M:%S"),
                self.year
            )));
        }
        Ok(self.days[t.ordinal() as usize - 1])
    }

    /// Apparent sun altitude/azimuth at `t` for the given geodetic point.
    pub fn sun_altaz(&self, latitude_deg: f64, longitude_deg: f64, t: DateTime<Utc>) -> Result<SunPosition> {
        let day = self.day(t)?;
        let utc_hours =
            t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0;
        // Local solar time: longitude contributes 4 minutes per degree.
        let correction_hours = (4.0 * longitude_deg + day.equation_of_time_min) / 60.0;
        let solar_time = (utc_hours + correction_hours).rem_euclid(24.0);
        let hour_angle = (DEGREES_PER_HOUR * (solar_time - 12.0)).to_radians();

        let lat = latitude_deg.to_radians();
        let dec = day.declination_deg.to_radians();

        let cos_zenith = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
        let zenith = cos_zenith.clamp(-1.0, 1.0).acos();

        let sin_az = -dec.cos() * hour_angle.sin();
        let cos_az = dec.sin() * lat.cos() - dec.cos() * lat.sin() * hour_angle.cos();
        let azimuth_deg = sin_az.atan2(cos_az).to_degrees().rem_euclid(360.0);

        Ok(SunPosition {
            altitude_deg: 90.0 - zenith.to_degrees(),
            azimuth_deg,
        })
    }
}

fn declination_deg(day_of_year: u32) -> f64 {
    AXIAL_TILT_DEG * ((360.0 / 365.0) * (284 + day_of_year) as f64).to_radians().sin()
}

fn equation_of_time_min(day_of_year: u32) -> f64 {
    let b = ((day_of_year as f64 - 1.0) * (360.0 / 365.0)).to_radians();
    229.18
        * (0.000_075 + 0.001_868 * b.cos()
            - 0.032_077 * b.sin()
            - 0.014_615 * (2.0 * b).cos()
            - 0.040_849 * (2.0 * b).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dataset_covers_leap_years() {
        assert_eq!(SolarEphemeris::generate(2024).days.len(), 366);
        assert_eq!(SolarEphemeris::generate(2026).days.len(), 365);
    }

    #[test]
    fn declination_stays_within_axial_tilt() {
        for day in 1..=365 {
            assert!(declination_deg(day).abs() <= AXIAL_TILT_DEG + 1e-9);
        }
        // June solstice is near the northern extreme
        assert!(declination_deg(172) > 23.0);
        // December solstice near the southern extreme
        assert!(declination_deg(355) < -23.0);
    }

    #[test]
    fn equinox_noon_sun_is_near_zenith_at_origin() {
        let ephemeris = SolarEphemeris::generate(2026);
        let t = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let sun = ephemeris.sun_altaz(0.0, 0.0, t).unwrap();
        assert!(
            sun.altitude_deg > 80.0,
            "expected near-zenith sun, got altitude {}",
            sun.altitude_deg
        );
    }

    #[test]
    fn midnight_sun_is_below_horizon_at_origin() {
        let ephemeris = SolarEphemeris::generate(2026);
        let t = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let sun = ephemeris.sun_altaz(0.0, 0.0, t).unwrap();
        assert!(sun.altitude_deg < -80.0);
    }

    #[test]
    fn azimuth_is_a_compass_bearing() {
        let ephemeris = SolarEphemeris::generate(2026);
        for hour in 0..24 {
            let t = Utc.with_ymd_and_hms(2026, 7, 1, hour, 0, 0).unwrap();
            let sun = ephemeris.sun_altaz(48.0, 11.0, t).unwrap();
            assert!((0.0..360.0).contains(&sun.azimuth_deg));
        }
    }

    #[test]
    fn morning_sun_rises_in_the_east() {
        let ephemeris = SolarEphemeris::generate(2026);
        let t = Utc.with_ymd_and_hms(2026, 3, 20, 8, 0, 0).unwrap();
        let sun = ephemeris.sun_altaz(48.0, 11.0, t).unwrap();
        assert!(
            sun.azimuth_deg > 45.0 && sun.azimuth_deg < 180.0,
            "expected eastern azimuth, got {}",
            sun.azimuth_deg
        );
    }

    #[test]
    fn time_outside_tabulated_year_is_an_error() {
        let ephemeris = SolarEphemeris::generate(2026);
        let t = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 5).unwrap();
        assert!(matches!(
            ephemeris.sun_altaz(0.0, 0.0, t),
            Err(SamplerError::Ephemeris(_))
        ));
    }
}
