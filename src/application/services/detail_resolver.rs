//! # Detail Resolver
//!
//! Resolves the full record of one product from the detail source.
//!
//! The detail source is a single upstream, independent of the company
//! sources used for listings. A resolution is one call under one deadline;
//! its failure is reported to the caller unchanged, as a [`SourceError`].

use crate::application::error::ApplicationResult;
use crate::domain::entities::Product;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{Category, ProductId};
use crate::infrastructure::sources::error::SourceError;
use crate::infrastructure::sources::traits::ProductDetailSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Resolves single products by identifier.
#[derive(Debug, Clone)]
pub struct DetailResolver {
    source: Arc<dyn ProductDetailSource>,
    timeout_ms: u64,
}

impl DetailResolver {
    /// Creates a resolver over `source` with a per-call deadline.
    #[must_use]
    pub fn new(source: Arc<dyn ProductDetailSource>, timeout_ms: u64) -> Self {
        Self { source, timeout_ms }
    }

    /// Returns the per-call deadline in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Fetches the product `product_id` in `category`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` for a product id that cannot name a
    /// single path segment (empty, `.` or `..`), or `ApplicationError::Source`
    /// when the detail source fails, answers with a non-success status, sends
    /// an undecodable body, or misses the deadline.
    pub async fn resolve(
        &self,
        category: &Category,
        product_id: &ProductId,
    ) -> ApplicationResult<Product> {
        check_product_id(product_id)?;

        let source_id = self.source.source_id().clone();
        let deadline = Duration::from_millis(self.timeout_ms);

        let result = match timeout(deadline, self.source.fetch_details(category, product_id)).await
        {
            Ok(result) => result,
            Err(_) => Err(SourceError::timeout(source_id, self.timeout_ms)),
        };

        match result {
            Ok(product) => {
                debug!(%category, %product_id, "resolved product details");
                Ok(product)
            }
            Err(error) => {
                warn!(
                    %category,
                    %product_id,
                    kind = %error.kind(),
                    error = %error,
                    "detail lookup failed"
                );
                Err(error.into())
            }
        }
    }
}

/// Rejects ids that would not reach `<endpoint>/<productId>/details` as one
/// segment: URL path normalization drops `.` and `..`.
fn check_product_id(product_id: &ProductId) -> Result<(), DomainError> {
    match product_id.as_str() {
        "" => Err(DomainError::invalid_identifier("productId must not be empty")),
        "." | ".." => Err(DomainError::invalid_identifier(format!(
            "productId '{product_id}' is not a valid path segment"
        ))),
        _ => Ok(()),
    }
}
