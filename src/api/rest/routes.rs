//! # REST Routes
//!
//! Router construction for the REST API.

use crate::api::rest::handlers::{AppState, health, product_details, top_products};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the REST router over `state`.
///
/// # Routes
///
/// - `GET /categories/{category}/products`
/// - `GET /categories/{category}/products/{product_id}`
/// - `GET /health`
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories/{category}/products", get(top_products))
        .route(
            "/categories/{category}/products/{product_id}",
            get(product_details),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
