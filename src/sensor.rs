use crate::error::Result;

/// Raw magnetometer reading in microtesla.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticField {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MagneticField {
    /// Copy with each component rounded to three decimals, the precision
    /// recorded in the sample log.
    pub fn rounded(&self) -> Self {
        Self {
            x: round3(self.x),
            y: round3(self.y),
            z: round3(self.z),
        }
    }
}

/// Orientation/magnetic-field sensor as seen by the loop.
///
/// Production wiring binds the real device driver; tests bind [`crate::mock::MockSensor`].
pub trait FieldSensor {
    /// Raw magnetic field components.
    fn magnetic_field(&mut self) -> Result<MagneticField>;

    /// Compass heading relative to magnetic north, degrees.
    fn heading(&mut self) -> Result<f64>;
}

/// Round to three decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_three_decimals() {
        assert_eq!(round3(12.34567), 12.346);
        assert_eq!(round3(-0.0004), -0.0);
        let field = MagneticField {
            x: 1.23456,
            y: -7.89012,
            z: 0.5,
        }
        .rounded();
        assert_eq!(field.x, 1.235);
        assert_eq!(field.y, -7.89);
        assert_eq!(field.z, 0.5);
    }
}
