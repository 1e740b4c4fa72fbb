//! # REST Handlers
//!
//! Request handlers, wire types and error mapping for the REST API.
//!
//! Query parameters are parsed leniently: a parameter that is absent or does
//! not parse falls back to its default instead of rejecting the request. The
//! only request a caller can get wrong is a price window whose lower bound
//! exceeds its upper bound.

use crate::application::error::ApplicationError;
use crate::application::services::{AggregationResult, DetailResolver, ProductAggregationEngine};
use crate::domain::entities::Product;
use crate::domain::value_objects::{
    Category, DEFAULT_LIMIT, PriceRange, ProductId, SortKey, SortOrder, TopProductsQuery,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Response header listing sources that failed under the best-effort policy.
pub const SOURCE_FAILURES_HEADER: HeaderName = HeaderName::from_static("x-source-failures");

// ============================================================================
// Application State
// ============================================================================

/// Shared state of the REST API.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Top-N aggregation across sources.
    pub engine: Arc<ProductAggregationEngine>,
    /// Single-product lookups.
    pub resolver: Arc<DetailResolver>,
}

// ============================================================================
// Request Types
// ============================================================================

/// Raw query parameters of the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopProductsParams {
    /// Number of products to return.
    pub n: Option<String>,
    /// Lower price bound.
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    /// Upper price bound.
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    /// Field to order by.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` for ascending, anything else for descending.
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl TopProductsParams {
    /// Translates the raw parameters into a typed query for `category`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if both price bounds are set and
    /// the lower exceeds the upper. Non-finite bounds read as unrestricted.
    pub fn into_query(self, category: Category) -> Result<TopProductsQuery, ApplicationError> {
        let limit = self
            .n
            .as_deref()
            .and_then(|n| n.trim().parse::<i64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIMIT);

        let price_range = PriceRange::from_wire(
            parse_price(self.min_price.as_deref()),
            parse_price(self.max_price.as_deref()),
        )?;

        let sort_key = self
            .sort_by
            .as_deref()
            .map(SortKey::from_token)
            .unwrap_or_default();
        let sort_order = self
            .sort_order
            .as_deref()
            .map(SortOrder::from_token)
            .unwrap_or_default();

        Ok(TopProductsQuery::new(category)
            .with_limit(limit)
            .with_price_range(price_range)
            .with_sort(sort_key, sort_order))
    }
}

/// Unparsable bounds read as the wire zero value, meaning unrestricted.
fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|p| p.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ============================================================================
// Response Types
// ============================================================================

/// Body of the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProductsResponse {
    /// Ranked products.
    pub products: Vec<Product>,
}

/// Body of the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetailsResponse {
    /// The resolved product.
    pub product: Product,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Configured source identifiers, in fan-out order.
    pub sources: Vec<String>,
    /// Configured fan-out policy.
    pub fan_out_policy: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable cause.
    pub message: String,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// An [`ApplicationError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                code = self.0.code(),
                retryable = self.0.is_retryable(),
                error = %self.0,
                "request failed"
            );
        }
        let body = ErrorResponse {
            error: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /categories/{category}/products`
///
/// # Errors
///
/// `400` for an inverted price window, `500` for any source failure.
pub async fn top_products(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<TopProductsParams>,
) -> Result<(HeaderMap, Json<TopProductsResponse>), ApiError> {
    let query = params.into_query(Category::new(category))?;
    let result = state.engine.aggregate(&query).await?;

    let headers = failure_headers(&result);
    Ok((
        headers,
        Json(TopProductsResponse {
            products: result.products,
        }),
    ))
}

fn failure_headers(result: &AggregationResult) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let failed = result.failed_sources();
    if failed.is_empty() {
        return headers;
    }

    let joined = failed
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",");
    warn!(failed_sources = %joined, "returning partial results");

    if let Ok(value) = HeaderValue::from_str(&joined) {
        headers.insert(SOURCE_FAILURES_HEADER, value);
    }
    headers
}

/// `GET /categories/{category}/products/{productId}`
///
/// # Errors
///
/// `400` for an empty product id, `500` when the detail source fails.
pub async fn product_details(
    State(state): State<Arc<AppState>>,
    Path((category, product_id)): Path<(String, String)>,
) -> Result<Json<ProductDetailsResponse>, ApiError> {
    let product = state
        .resolver
        .resolve(&Category::new(category), &ProductId::new(product_id))
        .await?;
    Ok(Json(ProductDetailsResponse { product }))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sources: state
            .engine
            .source_ids()
            .iter()
            .map(ToString::to_string)
            .collect(),
        fan_out_policy: state.engine.config().policy.to_string(),
    })
}
