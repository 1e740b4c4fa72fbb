//! # Source Registry
//!
//! The fixed set of sources an aggregation fans out to.
//!
//! Built once at startup and read-only afterwards; the registry is shared
//! between requests behind an `Arc` without locking.

use crate::config::SourceConfig;
use crate::domain::value_objects::SourceId;
use crate::infrastructure::sources::error::SourceResult;
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::http_source::HttpProductSource;
use crate::infrastructure::sources::traits::ProductSource;
use std::sync::Arc;

/// Ordered, immutable list of product sources.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn ProductSource>>,
}

impl SourceRegistry {
    /// Creates a registry from already-built sources. Order is preserved and
    /// determines merge order.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn ProductSource>>) -> Self {
        Self { sources }
    }

    /// Builds one [`HttpProductSource`] per configured company, all sharing
    /// `client`.
    ///
    /// # Errors
    ///
    /// Returns the first `SourceError` raised for an unusable endpoint.
    pub fn from_config(configs: &[SourceConfig], client: &HttpClient) -> SourceResult<Self> {
        let sources = configs
            .iter()
            .map(|config| {
                HttpProductSource::new(
                    SourceId::new(config.id.as_str()),
                    &config.endpoint,
                    client.clone(),
                )
                .map(|source| Arc::new(source) as Arc<dyn ProductSource>)
            })
            .collect::<SourceResult<Vec<_>>>()?;

        Ok(Self::new(sources))
    }

    /// All sources, in configuration order.
    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn ProductSource>] {
        &self.sources
    }

    /// Identifiers of all sources, in configuration order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.source_id().clone()).collect()
    }

    /// Number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
