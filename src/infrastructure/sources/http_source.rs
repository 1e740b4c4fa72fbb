//! # HTTP Sources
//!
//! reqwest-backed implementations of the source ports.
//!
//! ## Listing contract
//!
//! ```text
//! GET <endpoint>?company=<id>&category=<c>&minPrice=<f>&maxPrice=<f>&n=<n>
//!   200 -> JSON array of products
//! ```
//!
//! Unset price bounds are sent as `0`, the upstream "no bound" value.
//!
//! ## Detail contract
//!
//! ```text
//! GET <endpoint>/<productId>/details
//!   200 -> JSON product object
//! ```

use crate::domain::entities::Product;
use crate::domain::value_objects::{Category, ProductId, SourceId, TopProductsQuery};
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::traits::{ProductDetailSource, ProductSource};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

/// Query string sent to a listing endpoint.
#[derive(Debug, Serialize)]
struct ListingParams<'a> {
    company: &'a str,
    category: &'a str,
    #[serde(rename = "minPrice")]
    min_price: String,
    #[serde(rename = "maxPrice")]
    max_price: String,
    n: usize,
}

/// One company's catalog reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    source_id: SourceId,
    endpoint: Url,
    client: HttpClient,
}

impl HttpProductSource {
    /// Creates a source for `source_id` served at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if `endpoint` is not an absolute URL.
    pub fn new(source_id: SourceId, endpoint: &str, client: HttpClient) -> SourceResult<Self> {
        let endpoint = parse_endpoint(&source_id, endpoint)?;
        Ok(Self {
            source_id,
            endpoint,
            client,
        })
    }

    /// The listing endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch_products(&self, query: &TopProductsQuery) -> SourceResult<Vec<Product>> {
        let params = ListingParams {
            company: self.source_id.as_str(),
            category: query.category().as_str(),
            min_price: query.price_range().wire_min().to_string(),
            max_price: query.price_range().wire_max().to_string(),
            n: query.limit(),
        };

        let products: Vec<Product> = self
            .client
            .get_with_params(&self.source_id, self.endpoint.clone(), &params)
            .await?;

        debug!(
            source_id = %self.source_id,
            category = %query.category(),
            count = products.len(),
            "fetched products"
        );

        Ok(products
            .into_iter()
            .map(|product| product.or_company(&self.source_id))
            .collect())
    }
}

/// Single-product detail endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDetailSource {
    source_id: SourceId,
    endpoint: Url,
    client: HttpClient,
}

impl HttpDetailSource {
    /// Creates a detail source rooted at `endpoint`. Errors are tagged with
    /// `source_id`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if `endpoint` is not an absolute URL
    /// that can carry path segments.
    pub fn new(source_id: SourceId, endpoint: &str, client: HttpClient) -> SourceResult<Self> {
        let endpoint = parse_endpoint(&source_id, endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(SourceError::unavailable(
                source_id,
                format!("detail endpoint cannot carry a path: {endpoint}"),
            ));
        }
        Ok(Self {
            source_id,
            endpoint,
            client,
        })
    }

    /// Builds `<endpoint>/<productId>/details` with the id percent-encoded as
    /// one path segment.
    fn detail_url(&self, product_id: &ProductId) -> SourceResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SourceError::unavailable(self.source_id.clone(), "detail endpoint has no path")
            })?
            .pop_if_empty()
            .push(product_id.as_str())
            .push("details");
        Ok(url)
    }
}

#[async_trait]
impl ProductDetailSource for HttpDetailSource {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch_details(
        &self,
        category: &Category,
        product_id: &ProductId,
    ) -> SourceResult<Product> {
        let url = self.detail_url(product_id)?;
        debug!(%category, %product_id, %url, "fetching product details");
        self.client.get(&self.source_id, url).await
    }
}

fn parse_endpoint(source_id: &SourceId, endpoint: &str) -> SourceResult<Url> {
    Url::parse(endpoint).map_err(|e| {
        SourceError::unavailable(
            source_id.clone(),
            format!("invalid endpoint '{endpoint}': {e}"),
        )
    })
}
