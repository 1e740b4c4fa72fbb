//! # REST API
//!
//! HTTP front end of the aggregator, built on axum.
//!
//! # Endpoints
//!
//! - `GET /categories/{category}/products` - Top-N products across sources.
//!   Query parameters: `n`, `minPrice`, `maxPrice`, `sortBy`, `sortOrder`.
//! - `GET /categories/{category}/products/{productId}` - Product details
//! - `GET /health` - Health check endpoint
//!
//! Failures answer with `{"error": "<code>", "message": "<cause>"}`: `400` for
//! an invalid request, `500` for anything an upstream source caused.
//!
//! # Usage
//!
//! ```ignore
//! use product_aggregator::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState {
//!     engine: /* ... */,
//!     resolver: /* ... */,
//! });
//!
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ErrorResponse, HealthResponse, ProductDetailsResponse,
    SOURCE_FAILURES_HEADER, TopProductsParams, TopProductsResponse,
};
pub use routes::create_router;
