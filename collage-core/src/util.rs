//! Utility types, used throughout the crate.

/// A float within the closed unit interval `[0, 1]`. Never NaN, never `-0.0`.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[repr(transparent)]
pub struct UnitF64(f64);
impl UnitF64 {
    pub const ZERO: Self = Self(0.0);
    pub const HALF: Self = Self(0.5);
    pub const ONE: Self = Self(1.0);
    /// # Errors
    /// `NaN`, infinities, and anything outside `[0, 1]` are rejected.
    pub fn new(val: f64) -> Result<Self, UnitF64Error> {
        if val.is_nan() {
            Err(UnitF64Error::NaN)
        } else if (0.0..=1.0).contains(&val) {
            // Adding positive zero turns -0.0 into 0.0 and leaves everything else alone.
            Ok(Self(val + 0.0))
        } else {
            Err(UnitF64Error::OutOfRange)
        }
    }
    /// Clamp `val` into the unit interval. NaN becomes zero.
    #[must_use]
    pub fn saturating(val: f64) -> Self {
        if val.is_nan() {
            Self::ZERO
        } else {
            Self(val.clamp(0.0, 1.0) + 0.0)
        }
    }
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for UnitF64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for UnitF64 {
    type Error = UnitF64Error;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<UnitF64> for f64 {
    fn from(value: UnitF64) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitF64Error {
    #[error("value is NaN")]
    NaN,
    #[error("value lies outside of [0, 1]")]
    OutOfRange,
}

// No NaN or -0.0 is ever stored, so PartialEq is total and agrees with `total_cmp`.
impl Eq for UnitF64 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for UnitF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl std::hash::Hash for UnitF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

#[cfg(test)]
mod test {
    use super::{UnitF64, UnitF64Error};
    use std::hash::BuildHasher;
    #[test]
    fn bounds() {
        assert_eq!(UnitF64::new(0.0), Ok(UnitF64::ZERO));
        assert_eq!(UnitF64::new(1.0), Ok(UnitF64::ONE));
        assert_eq!(UnitF64::new(1.0001), Err(UnitF64Error::OutOfRange));
        assert_eq!(UnitF64::new(-0.5), Err(UnitF64Error::OutOfRange));
        assert_eq!(UnitF64::new(f64::INFINITY), Err(UnitF64Error::OutOfRange));
        assert_eq!(UnitF64::new(f64::NAN), Err(UnitF64Error::NaN));
    }
    #[test]
    fn saturating() {
        assert_eq!(UnitF64::saturating(7.0), UnitF64::ONE);
        assert_eq!(UnitF64::saturating(-7.0), UnitF64::ZERO);
        assert_eq!(UnitF64::saturating(f64::NAN), UnitF64::ZERO);
        assert_eq!(UnitF64::saturating(0.25).get(), 0.25);
    }
    #[test]
    fn negative_zero_is_zero() {
        for val in [
            UnitF64::new(-0.0).unwrap(),
            UnitF64::saturating(-0.0),
            UnitF64::saturating(-1.0),
        ] {
            assert!(val.get().is_sign_positive());
            assert_eq!(val, UnitF64::ZERO);
            assert_eq!(val.cmp(&UnitF64::ZERO), std::cmp::Ordering::Equal);
            assert_eq!(val.max(UnitF64::ZERO), UnitF64::ZERO);
            let hasher = std::collections::hash_map::RandomState::new();
            assert_eq!(hasher.hash_one(val), hasher.hash_one(UnitF64::ZERO));
        }
    }
}
