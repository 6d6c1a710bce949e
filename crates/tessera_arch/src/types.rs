//! Shared data types for device architecture models.

use serde::{Deserialize, Serialize};

/// A timing delay with min/typical/max corners.
///
/// Represents the propagation delay through a device element across
/// different process/voltage/temperature corners. Routing cost functions
/// use the slow corner ([`max_ns`](Delay::max_ns)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    /// Minimum delay in nanoseconds (fast corner).
    pub min_ns: f64,
    /// Typical delay in nanoseconds (nominal corner).
    pub typ_ns: f64,
    /// Maximum delay in nanoseconds (slow corner).
    pub max_ns: f64,
}

impl Delay {
    /// A zero delay (no propagation time).
    pub const ZERO: Self = Self {
        min_ns: 0.0,
        typ_ns: 0.0,
        max_ns: 0.0,
    };

    /// Creates a new delay with the given min/typ/max values.
    pub fn new(min_ns: f64, typ_ns: f64, max_ns: f64) -> Self {
        Self {
            min_ns,
            typ_ns,
            max_ns,
        }
    }

    /// Creates a delay with all three corners equal.
    pub fn constant(ns: f64) -> Self {
        Self {
            min_ns: ns,
            typ_ns: ns,
            max_ns: ns,
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::ops::Add for Delay {
    type Output = Delay;

    fn add(self, rhs: Delay) -> Delay {
        Delay {
            min_ns: self.min_ns + rhs.min_ns,
            typ_ns: self.typ_ns + rhs.typ_ns,
            max_ns: self.max_ns + rhs.max_ns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_zero() {
        let d = Delay::ZERO;
        assert_eq!(d.min_ns, 0.0);
        assert_eq!(d.typ_ns, 0.0);
        assert_eq!(d.max_ns, 0.0);
    }

    #[test]
    fn delay_new() {
        let d = Delay::new(0.1, 0.2, 0.3);
        assert_eq!(d.min_ns, 0.1);
        assert_eq!(d.typ_ns, 0.2);
        assert_eq!(d.max_ns, 0.3);
    }

    #[test]
    fn delay_constant() {
        let d = Delay::constant(0.5);
        assert_eq!(d.min_ns, 0.5);
        assert_eq!(d.max_ns, 0.5);
    }

    #[test]
    fn delay_add() {
        let a = Delay::new(0.1, 0.2, 0.3);
        let b = Delay::new(0.1, 0.1, 0.1);
        let sum = a + b;
        assert!((sum.max_ns - 0.4).abs() < 1e-9);
    }

    #[test]
    fn delay_default() {
        assert_eq!(Delay::default(), Delay::ZERO);
    }

    #[test]
    fn delay_serde_roundtrip() {
        let d = Delay::new(0.5, 1.0, 1.5);
        let json = serde_json::to_string(&d).unwrap();
        let restored: Delay = serde_json::from_str(&json).unwrap();
        assert_eq!(d, restored);
    }
}
