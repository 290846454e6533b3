use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one sampling run.
///
/// These are named run constants, not operator inputs: the defaults below are
/// the flight values. The struct round-trips through serde so a deployment can
/// persist the exact configuration it ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total wall-clock duration of the run; the loop exits at the first
    /// cycle boundary at or past this elapsed time.
    pub run_duration: Duration,
    /// One-time camera settle delay before the very first capture.
    pub warm_up_delay: Duration,
    /// Pause after capturing a slot whose index is divisible by three.
    pub short_delay: Duration,
    /// Pause after capturing every other slot.
    pub long_delay: Duration,
    /// Brightness cutoff (inclusive) below which a photo counts as
    /// night-side.
    pub night_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_duration: Duration::from_secs(176 * 60),
            warm_up_delay: Duration::from_secs(2),
            short_delay: Duration::from_millis(60),
            long_delay: Duration::from_secs(25),
            night_threshold: 0.09,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flight_values() {
        let config = RunConfig::default();
        assert_eq!(config.run_duration, Duration::from_secs(10_560));
        assert_eq!(config.warm_up_delay, Duration::from_secs(2));
        assert_eq!(config.short_delay, Duration::from_millis(60));
        assert_eq!(config.long_delay, Duration::from_secs(25));
        assert_eq!(config.night_threshold, 0.09);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RunConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.long_delay, config.long_delay);
        assert_eq!(back.night_threshold, config.night_threshold);
    }
}
