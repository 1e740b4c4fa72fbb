//! # Application Errors
//!
//! Request-level error types.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Source(SourceError)        - A source failed (fail-fast) or the detail call failed
//! ├── Domain(DomainError)        - A request value violated an invariant
//! ├── AllSourcesFailed(..)       - Best-effort fan-out with no healthy source
//! ├── NoSourcesConfigured        - Empty source registry
//! ├── Timeout                    - Aggregation deadline exceeded
//! └── Internal(String)           - Anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use product_aggregator::application::error::ApplicationError;
//! use product_aggregator::domain::DomainError;
//!
//! let err: ApplicationError = DomainError::InvalidPriceRange { min: 50.0, max: 10.0 }.into();
//! assert!(err.is_validation());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::sources::error::SourceError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// An upstream source failed.
    #[error("upstream error: {0}")]
    Source(#[from] SourceError),

    /// A request value violated a domain invariant.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Every source failed under the best-effort policy.
    #[error("all {} sources failed: {}", .0.len(), join_errors(.0))]
    AllSourcesFailed(Vec<SourceError>),

    /// No sources are configured.
    #[error("no sources configured")]
    NoSourcesConfigured,

    /// The aggregation deadline elapsed before every source answered.
    #[error("aggregation timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller sent an invalid request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Returns the source error this failure originates from, if any.
    #[must_use]
    pub fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::Source(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if a retry might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Source(e) => e.is_retryable(),
            Self::AllSourcesFailed(errors) => errors.iter().any(SourceError::is_retryable),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Stable machine-readable name of this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Source(e) => e.kind().as_str(),
            Self::Domain(_) => "INVALID_REQUEST",
            Self::AllSourcesFailed(_) => "ALL_SOURCES_FAILED",
            Self::NoSourcesConfigured => "NO_SOURCES_CONFIGURED",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

fn join_errors(errors: &[SourceError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::SourceId;

    #[test]
    fn source_error_names_the_source() {
        let err: ApplicationError =
            SourceError::bad_status(SourceId::new("MYN"), 500, "oops").into();
        let display = err.to_string();
        assert!(display.starts_with("upstream error: source MYN"));
        assert_eq!(err.code(), "SOURCE_BAD_STATUS");
        assert!(err.source_error().is_some());
        assert!(err.is_retryable());
    }

    #[test]
    fn domain_error_is_validation() {
        let err: ApplicationError = DomainError::InvalidPriceRange {
            min: 5.0,
            max: 1.0,
        }
        .into();
        assert!(err.is_validation());
        assert_eq!(err.code(), "INVALID_REQUEST");
    }

    #[test]
    fn all_sources_failed_lists_every_source() {
        let err = ApplicationError::AllSourcesFailed(vec![
            SourceError::timeout(SourceId::new("AMZ"), 100),
            SourceError::decode(SourceId::new("FLP"), "bad json"),
        ]);
        let display = err.to_string();
        assert!(display.contains("all 2 sources failed"));
        assert!(display.contains("AMZ"));
        assert!(display.contains("FLP"));
        assert!(err.is_retryable());
    }

    #[test]
    fn timeout_display() {
        let err = ApplicationError::Timeout { timeout_ms: 750 };
        assert!(err.to_string().contains("750ms"));
        assert_eq!(err.code(), "TIMEOUT");
    }

    #[test]
    fn internal_is_not_retryable() {
        let err = ApplicationError::internal("task panicked");
        assert!(!err.is_retryable());
        assert!(!err.is_validation());
        assert!(err.source_error().is_none());
    }
}
