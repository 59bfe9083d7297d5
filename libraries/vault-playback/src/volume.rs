//! Volume level
//!
//! The UI slider works in whole percent (0-100); media elements take a linear
//! 0.0-1.0 fraction. Stored snapshots carry the fraction.

/// Volume controller with linear scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,
}

impl Volume {
    /// Create new volume controller, clamping to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
        }
    }

    /// Build from a stored 0.0-1.0 fraction
    ///
    /// Out-of-range values are clamped; NaN yields `None`.
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if fraction.is_nan() {
            return None;
        }
        let level = (fraction.clamp(0.0, 1.0) * 100.0).round() as u8;
        Some(Self::new(level))
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Linear fraction handed to the media sink
    pub fn fraction(&self) -> f64 {
        f64::from(self.level) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(50);
        assert_eq!(vol.level(), 50);

        vol.set_level(75);
        assert_eq!(vol.level(), 75);

        // Clamp to 100
        vol.set_level(150);
        assert_eq!(vol.level(), 100);
    }

    #[test]
    fn fraction_is_linear() {
        assert_eq!(Volume::new(0).fraction(), 0.0);
        assert_eq!(Volume::new(50).fraction(), 0.5);
        assert_eq!(Volume::new(100).fraction(), 1.0);
        assert!((Volume::new(37).fraction() - 0.37).abs() < 1e-9);
    }

    #[test]
    fn from_fraction_rounds_and_clamps() {
        assert_eq!(Volume::from_fraction(0.42).unwrap().level(), 42);
        assert_eq!(Volume::from_fraction(0.999).unwrap().level(), 100);
        assert_eq!(Volume::from_fraction(1.7).unwrap().level(), 100);
        assert_eq!(Volume::from_fraction(-0.3).unwrap().level(), 0);
        assert!(Volume::from_fraction(f64::NAN).is_none());
    }

    #[test]
    fn default_is_full_volume() {
        assert_eq!(Volume::default().level(), 100);
    }
}
