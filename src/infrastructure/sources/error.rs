//! # Source Errors
//!
//! Error types for calls to upstream product sources.
//!
//! Every error carries the identifier of the source it came from, so a
//! request-level failure can always name the offending company.
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::value_objects::SourceId;
//! use product_aggregator::infrastructure::sources::error::{SourceError, SourceErrorKind};
//!
//! let error = SourceError::bad_status(SourceId::new("FLP"), 503, "maintenance");
//! assert_eq!(error.kind(), SourceErrorKind::BadStatus);
//! assert_eq!(error.source_id().as_str(), "FLP");
//! assert!(error.is_retryable());
//! ```

use crate::domain::value_objects::SourceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Upper bound on how much of an error response body is kept.
pub const MAX_BODY_EXCERPT: usize = 256;

/// Coarse classification of a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceErrorKind {
    /// Transport failure or deadline expiry.
    Unavailable,
    /// Non-success response status.
    BadStatus,
    /// Body did not match the expected product shape.
    Decode,
}

impl SourceErrorKind {
    /// Stable name used in logs and error responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "SOURCE_UNAVAILABLE",
            Self::BadStatus => "SOURCE_BAD_STATUS",
            Self::Decode => "SOURCE_DECODE_ERROR",
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for upstream source calls.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The source could not be reached or did not answer in time.
    #[error("source {source_id} unavailable: {message}")]
    Unavailable {
        /// Source that failed.
        source_id: SourceId,
        /// Error message.
        message: String,
        /// True when the failure was a deadline expiry.
        timed_out: bool,
    },

    /// The source answered with a non-success status.
    #[error("source {source_id} returned status {status}: {body}")]
    BadStatus {
        /// Source that failed.
        source_id: SourceId,
        /// HTTP status code.
        status: u16,
        /// Excerpt of the response body.
        body: String,
    },

    /// The response body could not be decoded into products.
    #[error("source {source_id} sent an undecodable response: {message}")]
    Decode {
        /// Source that failed.
        source_id: SourceId,
        /// Decoder message.
        message: String,
    },
}

impl SourceError {
    /// Creates a transport failure.
    #[must_use]
    pub fn unavailable(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::Unavailable {
            source_id,
            message: message.into(),
            timed_out: false,
        }
    }

    /// Creates a deadline expiry failure.
    #[must_use]
    pub fn timeout(source_id: SourceId, timeout_ms: u64) -> Self {
        Self::Unavailable {
            source_id,
            message: format!("request timed out after {timeout_ms}ms"),
            timed_out: true,
        }
    }

    /// Creates a bad status failure, keeping at most a short body excerpt.
    #[must_use]
    pub fn bad_status(source_id: SourceId, status: u16, body: impl Into<String>) -> Self {
        Self::BadStatus {
            source_id,
            status,
            body: excerpt(body.into()),
        }
    }

    /// Creates a decode failure.
    #[must_use]
    pub fn decode(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::Decode {
            source_id,
            message: message.into(),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            Self::Unavailable { .. } => SourceErrorKind::Unavailable,
            Self::BadStatus { .. } => SourceErrorKind::BadStatus,
            Self::Decode { .. } => SourceErrorKind::Decode,
        }
    }

    /// Returns the source this error came from.
    #[must_use]
    pub fn source_id(&self) -> &SourceId {
        match self {
            Self::Unavailable { source_id, .. }
            | Self::BadStatus { source_id, .. }
            | Self::Decode { source_id, .. } => source_id,
        }
    }

    /// Returns true if the failure was a deadline expiry.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Unavailable { timed_out: true, .. })
    }

    /// Returns true if this error is transient.
    ///
    /// Nothing in this crate retries; the flag is informational for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { .. } => true,
            Self::BadStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } => false,
        }
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

fn excerpt(mut body: String) -> String {
    if body.len() > MAX_BODY_EXCERPT {
        let mut cut = MAX_BODY_EXCERPT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amz() -> SourceId {
        SourceId::new("AMZ")
    }

    #[test]
    fn unavailable_is_retryable() {
        let error = SourceError::unavailable(amz(), "connection refused");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.is_retryable());
        assert!(!error.is_timeout());
    }

    #[test]
    fn timeout_is_unavailable() {
        let error = SourceError::timeout(amz(), 250);
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.is_timeout());
        assert!(error.to_string().contains("250ms"));
    }

    #[test]
    fn client_status_not_retryable() {
        let error = SourceError::bad_status(amz(), 404, "not found");
        assert_eq!(error.kind(), SourceErrorKind::BadStatus);
        assert!(!error.is_retryable());
    }

    #[test]
    fn server_status_retryable() {
        assert!(SourceError::bad_status(amz(), 502, "").is_retryable());
        assert!(SourceError::bad_status(amz(), 429, "").is_retryable());
    }

    #[test]
    fn decode_not_retryable() {
        let error = SourceError::decode(amz(), "expected array");
        assert_eq!(error.kind(), SourceErrorKind::Decode);
        assert!(!error.is_retryable());
    }

    #[test]
    fn display_names_source() {
        let error = SourceError::bad_status(SourceId::new("SNP"), 500, "boom");
        let display = error.to_string();
        assert!(display.contains("SNP"));
        assert!(display.contains("500"));
        assert!(display.contains("boom"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let error = SourceError::bad_status(amz(), 500, "é".repeat(400));
        let SourceError::BadStatus { body, .. } = error else {
            unreachable!("constructed as BadStatus");
        };
        assert!(body.len() <= MAX_BODY_EXCERPT + 3);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn kind_names() {
        assert_eq!(SourceErrorKind::BadStatus.to_string(), "SOURCE_BAD_STATUS");
        assert_eq!(SourceErrorKind::Decode.as_str(), "SOURCE_DECODE_ERROR");
    }
}
