//! # Product Aggregator
//!
//! Aggregates product listings from several e-commerce company sources and
//! serves ranked top-N results over HTTP.
//!
//! A request names a category, an optional price window, a sort key and
//! order, and a result count. The aggregator asks every configured source
//! concurrently, merges what they return, keeps products inside the price
//! window, orders them and returns the first `n`. Single products are
//! resolved through a separate detail endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  api::rest        axum routes, query parsing    │
//! ├─────────────────────────────────────────────────┤
//! │  application      aggregation engine, ranking,  │
//! │                   price filter, detail resolver │
//! ├─────────────────────────────────────────────────┤
//! │  domain           Product, PriceRange, query    │
//! ├─────────────────────────────────────────────────┤
//! │  infrastructure   HTTP and in-memory sources    │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::value_objects::{Category, SortKey, SortOrder, TopProductsQuery};
//!
//! let query = TopProductsQuery::new(Category::new("Laptop"))
//!     .with_limit(3)
//!     .with_sort(SortKey::Rating, SortOrder::Descending);
//! assert_eq!(query.limit(), 3);
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
