//! # Price Range
//!
//! Closed-interval price bounds with optional ends.
//!
//! A missing bound imposes no restriction in that direction. On the wire the
//! upstream contract encodes "no bound" as the zero value, so
//! [`PriceRange::from_wire`] treats any non-positive (or non-finite) bound as
//! absent.
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::value_objects::PriceRange;
//!
//! let range = PriceRange::new(Some(15.0), Some(35.0)).unwrap();
//! assert!(range.contains(15.0));
//! assert!(range.contains(35.0));
//! assert!(!range.contains(40.0));
//!
//! assert!(PriceRange::unbounded().contains(1_000_000.0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive price bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceRange {
    /// Creates a range with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Creates a range from explicit optional bounds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if a bound is NaN, infinite or
    /// negative, and `DomainError::InvalidPriceRange` if both bounds are set
    /// and `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> DomainResult<Self> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Err(DomainError::invalid_price(format!(
                    "price bound must be a finite non-negative number, got {bound}"
                )));
            }
        }

        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(DomainError::InvalidPriceRange { min, max });
        }

        Ok(Self { min, max })
    }

    /// Creates a range from wire-encoded bounds where `0` means "unset".
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPriceRange` if both bounds are set and
    /// `min > max`.
    pub fn from_wire(min: f64, max: f64) -> DomainResult<Self> {
        Self::new(meaningful(min), meaningful(max))
    }

    /// Lower bound, if set.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Upper bound, if set.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Closed-interval membership: `min <= price <= max` for the bounds that
    /// are set.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    /// Wire encoding of the lower bound (`0` when unset).
    #[must_use]
    pub fn wire_min(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Wire encoding of the upper bound (`0` when unset).
    #[must_use]
    pub fn wire_max(&self) -> f64 {
        self.max.unwrap_or(0.0)
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => write!(f, "[*, *]"),
            (Some(min), None) => write!(f, "[{min}, *]"),
            (None, Some(max)) => write!(f, "[*, {max}]"),
            (Some(min), Some(max)) => write!(f, "[{min}, {max}]"),
        }
    }
}

fn meaningful(bound: f64) -> Option<f64> {
    (bound.is_finite() && bound > 0.0).then_some(bound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closed_interval_includes_both_ends() {
        let range = PriceRange::new(Some(15.0), Some(35.0)).unwrap();
        assert!(range.contains(15.0));
        assert!(range.contains(20.0));
        assert!(range.contains(35.0));
        assert!(!range.contains(14.99));
        assert!(!range.contains(35.01));
    }

    #[test]
    fn open_sides_do_not_restrict() {
        let at_least = PriceRange::new(Some(10.0), None).unwrap();
        assert!(at_least.contains(1e9));
        assert!(!at_least.contains(9.0));

        let at_most = PriceRange::new(None, Some(10.0)).unwrap();
        assert!(at_most.contains(0.0));
        assert!(!at_most.contains(11.0));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let err = PriceRange::new(Some(50.0), Some(10.0)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPriceRange { .. }));
    }

    #[test]
    fn negative_or_nan_bounds_rejected() {
        assert!(PriceRange::new(Some(-1.0), None).is_err());
        assert!(PriceRange::new(None, Some(f64::NAN)).is_err());
    }

    #[test]
    fn wire_zero_means_unset() {
        let range = PriceRange::from_wire(0.0, 0.0).unwrap();
        assert!(range.is_unbounded());

        let range = PriceRange::from_wire(0.0, 100.0).unwrap();
        assert_eq!(range.min(), None);
        assert_eq!(range.max(), Some(100.0));
        assert!((range.wire_min() - 0.0).abs() < f64::EPSILON);
        assert!((range.wire_max() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wire_inverted_bounds_rejected() {
        assert!(PriceRange::from_wire(100.0, 10.0).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(PriceRange::unbounded().to_string(), "[*, *]");
        assert_eq!(
            PriceRange::new(Some(1.5), Some(3.0)).unwrap().to_string(),
            "[1.5, 3]"
        );
    }
}
