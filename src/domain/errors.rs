//! # Domain Errors
//!
//! Validation failures raised while constructing domain values.

use thiserror::Error;

/// Error raised when a domain value violates one of its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A price was negative, NaN or infinite.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A price range whose lower bound exceeds its upper bound.
    #[error("invalid price range: min {min} is greater than max {max}")]
    InvalidPriceRange {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },

    /// An identifier was empty or otherwise unusable.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl DomainError {
    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(message: impl Into<String>) -> Self {
        Self::InvalidPrice(message.into())
    }

    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_price_range_display() {
        let err = DomainError::InvalidPriceRange {
            min: 50.0,
            max: 10.0,
        };
        let display = err.to_string();
        assert!(display.contains("50"));
        assert!(display.contains("10"));
    }

    #[test]
    fn invalid_identifier_display() {
        let err = DomainError::invalid_identifier("product id must not be empty");
        assert!(err.to_string().contains("must not be empty"));
    }
}
