//! Zero-free arithmetic
//!
//! A zero-free machine never stores an exact zero. Values whose magnitude
//! falls below [`ZERO_THRESHOLD`] are replaced by a signed infinitesimal so
//! that the sign of the original value survives the substitution.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

/// Magnitudes strictly below this are considered zero
pub const ZERO_THRESHOLD: f64 = 1e-10;

/// Substitute magnitude used in place of a zero
pub const INFINITESIMAL: f64 = 1e-12;

/// Perturbation added before reading the sign of a near-zero value
const SIGN_PERTURBATION: f64 = 1e-15;

/// Replace a near-zero value with a signed infinitesimal.
///
/// Values at or above the threshold pass through unchanged.
pub fn floor(value: f64) -> f64 {
    if value.abs() < ZERO_THRESHOLD {
        ZeroFree::EPSILON.with_sign_of(value + SIGN_PERTURBATION)
    } else {
        value
    }
}

/// Whether a value is a legal zero-free scalar
pub fn is_zero_free(value: f64) -> bool {
    value.abs() >= ZERO_THRESHOLD || value.abs() == ZeroFree::EPSILON.magnitude()
}

/// Sentinel scalar that never represents an exact zero.
///
/// Combining two `ZeroFree` values stays inside the type; combining with a
/// plain `f64` yields the plain result computed from the raw magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroFree(f64);

impl ZeroFree {
    /// The canonical infinitesimal
    pub const EPSILON: ZeroFree = ZeroFree(INFINITESIMAL);

    /// Wrap a magnitude, substituting the infinitesimal for zero
    pub fn new(magnitude: f64) -> Self {
        Self(floor(magnitude.abs()))
    }

    pub fn magnitude(&self) -> f64 {
        self.0
    }

    /// The magnitude carrying the sign of `reference`; non-negative maps to `+`
    pub fn with_sign_of(self, reference: f64) -> f64 {
        if reference < 0.0 {
            -self.0
        } else {
            self.0
        }
    }
}

impl Default for ZeroFree {
    fn default() -> Self {
        Self::EPSILON
    }
}

impl fmt::Display for ZeroFree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ε({:e})", self.0)
    }
}

impl From<ZeroFree> for f64 {
    fn from(value: ZeroFree) -> Self {
        value.0
    }
}

impl Add for ZeroFree {
    type Output = ZeroFree;

    fn add(self, rhs: ZeroFree) -> ZeroFree {
        ZeroFree::new(self.0 + rhs.0)
    }
}

impl Add<f64> for ZeroFree {
    type Output = f64;

    fn add(self, rhs: f64) -> f64 {
        self.0 + rhs
    }
}

impl Add<ZeroFree> for f64 {
    type Output = f64;

    fn add(self, rhs: ZeroFree) -> f64 {
        self + rhs.0
    }
}

impl Mul for ZeroFree {
    type Output = ZeroFree;

    fn mul(self, rhs: ZeroFree) -> ZeroFree {
        ZeroFree::new(self.0 * rhs.0)
    }
}

impl Mul<f64> for ZeroFree {
    type Output = f64;

    fn mul(self, rhs: f64) -> f64 {
        self.0 * rhs
    }
}

impl Mul<ZeroFree> for f64 {
    type Output = f64;

    fn mul(self, rhs: ZeroFree) -> f64 {
        self * rhs.0
    }
}

impl PartialOrd for ZeroFree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl PartialEq<f64> for ZeroFree {
    fn eq(&self, _other: &f64) -> bool {
        // A sentinel is never equal to an ordinary number
        false
    }
}

impl PartialOrd<f64> for ZeroFree {
    /// Smaller than every positive number, greater than zero and every
    /// negative number.
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        if other.is_nan() {
            None
        } else if *other > 0.0 {
            Some(Ordering::Less)
        } else {
            Some(Ordering::Greater)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_preserves_sign() {
        assert_eq!(floor(0.0), INFINITESIMAL);
        assert_eq!(floor(-3e-11), -INFINITESIMAL);
        assert_eq!(floor(3e-11), INFINITESIMAL);
        assert_eq!(floor(0.25), 0.25);
        assert_eq!(floor(-0.25), -0.25);
    }

    #[test]
    fn test_floor_sign_of_tiny_negative() {
        // Perturbation dominates values far below it
        assert_eq!(floor(-1e-20), INFINITESIMAL);
    }

    #[test]
    fn test_floor_substitutes_the_sentinel() {
        let eps = ZeroFree::EPSILON;
        assert_eq!(floor(0.0), eps.magnitude());
        assert_eq!(floor(-5e-11), -eps.magnitude());
        assert_eq!(floor(0.0), f64::from(ZeroFree::new(0.0)));
        assert_eq!(eps.with_sign_of(-2.0), -INFINITESIMAL);
        assert_eq!(eps.with_sign_of(0.0), INFINITESIMAL);
    }

    #[test]
    fn test_zero_free_arithmetic() {
        let a = ZeroFree::new(0.0);
        let b = ZeroFree::new(2.0);

        let sum: ZeroFree = a + b;
        assert!((sum.magnitude() - 2.0).abs() < 1e-9);

        let product: ZeroFree = a * a;
        assert_eq!(product, ZeroFree::EPSILON);

        let plain: f64 = b * 3.0;
        assert_eq!(plain, 6.0);
        let plain: f64 = 1.0 + b;
        assert_eq!(plain, 3.0);
    }

    #[test]
    fn test_ordering_against_reals() {
        let eps = ZeroFree::EPSILON;
        assert!(eps < 1e-300);
        assert!(eps < 5.0);
        assert!(eps > 0.0);
        assert!(eps > -1.0);
        assert_eq!(eps.partial_cmp(&f64::NAN), None);

        assert!(ZeroFree::new(1.0) > ZeroFree::new(0.5));
    }

    #[test]
    fn test_is_zero_free() {
        assert!(is_zero_free(floor(0.0)));
        assert!(is_zero_free(-INFINITESIMAL));
        assert!(!is_zero_free(0.0));
        assert!(!is_zero_free(1e-11));
    }
}
