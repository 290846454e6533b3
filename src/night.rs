//! Night-side classification from stored photo brightness.

use crate::error::Result;

/// Read-back channel for per-slot brightness metadata.
///
/// Implemented by [`crate::store::PhotoStore`] in production; tests supply a
/// map-backed fake. A missing value is an error, not a classification.
pub trait BrightnessSource {
    fn brightness(&self, slot: u32) -> Result<f64>;
}

/// Classifies the ground below as night-side when two consecutive photos are
/// both dark.
#[derive(Debug, Clone, Copy)]
pub struct NightClassifier {
    threshold: f64,
}

impl NightClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// True iff the brightness of `newest_slot` and the slot before it are
    /// both at or below the threshold. Requires `newest_slot >= 2`.
    pub fn is_night(&self, source: &dyn BrightnessSource, newest_slot: u32) -> Result<bool> {
        let current = source.brightness(newest_slot)?;
        let previous = source.brightness(newest_slot - 1)?;
        Ok(current <= self.threshold && previous <= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SamplerError;
    use std::collections::HashMap;

    struct MapSource(HashMap<u32, f64>);

    impl BrightnessSource for MapSource {
        fn brightness(&self, slot: u32) -> Result<f64> {
            self.0
                .get(&slot)
                .copied()
                .ok_or_else(|| SamplerError::Metadata {
                    slot,
                    reason: "no metadata".into(),
                })
        }
    }

    fn source(previous: f64, current: f64) -> MapSource {
        MapSource(HashMap::from([(1, previous), (2, current)]))
    }

    #[test]
    fn both_dark_is_night() {
        let classifier = NightClassifier::new(0.09);
        assert!(classifier.is_night(&source(0.05, 0.07), 2).unwrap());
    }

    #[test]
    fn one_bright_is_not_night() {
        let classifier = NightClassifier::new(0.09);
        assert!(!classifier.is_night(&source(0.5, 0.05), 2).unwrap());
        assert!(!classifier.is_night(&source(0.05, 0.5), 2).unwrap());
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let classifier = NightClassifier::new(0.09);
        assert!(classifier.is_night(&source(0.09, 0.09), 2).unwrap());
    }

    #[test]
    fn missing_metadata_surfaces_as_error() {
        let classifier = NightClassifier::new(0.09);
        let only_current = MapSource(HashMap::from([(2, 0.01)]));
        assert!(matches!(
            classifier.is_night(&only_current, 2),
            Err(SamplerError::Metadata { slot: 1, .. })
        ));
    }
}
