//! # Source Traits
//!
//! Port definitions for upstream product sources.
//!
//! - [`ProductSource`]: one company's catalog slice for a category
//! - [`ProductDetailSource`]: a single product's full record
//!
//! Each call is a single round trip: implementations do not retry and do not
//! cache.
//!
//! # Examples
//!
//! ```ignore
//! use product_aggregator::infrastructure::sources::traits::ProductSource;
//!
//! #[derive(Debug)]
//! struct MySource { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl ProductSource for MySource {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::Product;
use crate::domain::value_objects::{Category, ProductId, SourceId, TopProductsQuery};
use crate::infrastructure::sources::error::SourceResult;
use async_trait::async_trait;
use std::fmt;

/// An upstream source of product listings.
#[async_trait]
pub trait ProductSource: Send + Sync + fmt::Debug {
    /// Returns the identifier of this source.
    fn source_id(&self) -> &SourceId;

    /// Fetches this source's products for the query's category.
    ///
    /// The query's limit and price bounds are forwarded upstream, but callers
    /// must not rely on the source honouring them.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` tagged with [`ProductSource::source_id`] on
    /// transport failure, non-success status or an undecodable body.
    async fn fetch_products(&self, query: &TopProductsQuery) -> SourceResult<Vec<Product>>;
}

/// An upstream endpoint resolving single products.
#[async_trait]
pub trait ProductDetailSource: Send + Sync + fmt::Debug {
    /// Returns the identifier used to tag errors from this endpoint.
    fn source_id(&self) -> &SourceId;

    /// Fetches the full record of one product.
    ///
    /// `category` is part of the caller's request but the upstream endpoint is
    /// keyed by product identifier alone.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` on transport failure, non-success status or an
    /// undecodable body.
    async fn fetch_details(
        &self,
        category: &Category,
        product_id: &ProductId,
    ) -> SourceResult<Product>;
}
