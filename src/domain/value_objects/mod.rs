//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`SourceId`], [`ProductId`], [`Category`]: String-based identifiers
//!
//! ## Request Types
//!
//! - [`PriceRange`]: Closed-interval price bounds
//! - [`TopProductsQuery`]: Parameters of an aggregation request
//!
//! ## Domain Enums
//!
//! - [`SortKey`]: Field a ranking orders by
//! - [`SortOrder`]: Ascending or descending

pub mod enums;
pub mod ids;
pub mod price_range;
pub mod product_query;

pub use enums::{ParseEnumError, SortKey, SortOrder};
pub use ids::{Category, ProductId, SourceId};
pub use price_range::PriceRange;
pub use product_query::{DEFAULT_LIMIT, TopProductsQuery};
