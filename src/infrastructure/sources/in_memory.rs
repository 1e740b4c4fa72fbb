//! # In-Memory Source
//!
//! Deterministic implementation of the source ports for tests and local runs.
//!
//! A [`StaticProductSource`] serves a fixed catalog. It deliberately ignores
//! the price bounds and limit it is sent, the way an untrusted upstream might,
//! and can be configured to fail or to answer slowly.

use crate::domain::entities::Product;
use crate::domain::value_objects::{Category, ProductId, SourceId, TopProductsQuery};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::traits::{ProductDetailSource, ProductSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A source serving a fixed product list.
#[derive(Debug)]
pub struct StaticProductSource {
    source_id: SourceId,
    products: Vec<Product>,
    failure: Option<SourceError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticProductSource {
    /// Creates a healthy source serving `products`.
    #[must_use]
    pub fn new(source_id: impl Into<SourceId>, products: Vec<Product>) -> Self {
        Self {
            source_id: source_id.into(),
            products,
            failure: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a source that fails every call with `error`.
    #[must_use]
    pub fn failing(source_id: impl Into<SourceId>, error: SourceError) -> Self {
        Self::new(source_id, Vec::new()).with_failure(error)
    }

    /// Makes every call fail with `error`.
    #[must_use]
    pub fn with_failure(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Delays every answer by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of calls made, including ones cancelled mid-flight.
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    async fn answer(&self) -> SourceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductSource for StaticProductSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch_products(&self, query: &TopProductsQuery) -> SourceResult<Vec<Product>> {
        self.answer().await?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.category().is_empty() || p.category() == query.category())
            .cloned()
            .map(|p| p.or_company(&self.source_id))
            .collect())
    }
}

#[async_trait]
impl ProductDetailSource for StaticProductSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch_details(
        &self,
        _category: &Category,
        product_id: &ProductId,
    ) -> SourceResult<Product> {
        self.answer().await?;
        self.products
            .iter()
            .find(|p| p.id() == product_id)
            .cloned()
            .ok_or_else(|| {
                SourceError::bad_status(
                    self.source_id.clone(),
                    404,
                    format!("product {product_id} not found"),
                )
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::sources::error::SourceErrorKind;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Laptop 1", 10.0).unwrap().with_category("Laptop"),
            Product::new("p2", "Phone 1", 20.0).unwrap().with_category("Phone"),
        ]
    }

    #[tokio::test]
    async fn serves_matching_category_only() {
        let source = StaticProductSource::new("AMZ", catalog());
        let products = source
            .fetch_products(&TopProductsQuery::new(Category::new("Laptop")))
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().company().as_str(), "AMZ");
    }

    #[tokio::test]
    async fn failing_source_returns_configured_error() {
        let source = StaticProductSource::failing(
            "FLP",
            SourceError::bad_status(SourceId::new("FLP"), 500, "boom"),
        );
        let err = source
            .fetch_products(&TopProductsQuery::new(Category::new("Laptop")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), SourceErrorKind::BadStatus);
        assert_eq!(source.call_counter().load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn details_lookup_by_id() {
        let source = StaticProductSource::new("detail", catalog());
        let product = source
            .fetch_details(&Category::new("Phone"), &ProductId::new("p2"))
            .await
            .unwrap();
        assert_eq!(product.name(), "Phone 1");

        let err = source
            .fetch_details(&Category::new("Phone"), &ProductId::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), SourceErrorKind::BadStatus);
    }
}
