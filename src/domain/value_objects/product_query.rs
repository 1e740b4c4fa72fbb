//! # Top Products Query
//!
//! Typed parameters of one aggregation request.
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::value_objects::{
//!     Category, PriceRange, SortKey, SortOrder, TopProductsQuery,
//! };
//!
//! let query = TopProductsQuery::new(Category::new("Laptop"))
//!     .with_limit(5)
//!     .with_sort(SortKey::Price, SortOrder::Ascending);
//!
//! assert_eq!(query.limit(), 5);
//! assert_eq!(query.sort_key(), SortKey::Price);
//! assert!(query.price_range().is_unbounded());
//! ```

use crate::domain::value_objects::enums::{SortKey, SortOrder};
use crate::domain::value_objects::ids::Category;
use crate::domain::value_objects::price_range::PriceRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result count used when the caller does not supply a positive `n`.
pub const DEFAULT_LIMIT: usize = 10;

/// Parameters of a top-N aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProductsQuery {
    category: Category,
    limit: usize,
    price_range: PriceRange,
    sort_key: SortKey,
    sort_order: SortOrder,
}

impl TopProductsQuery {
    /// Creates a query for `category` with every other parameter defaulted:
    /// limit 10, unbounded price, sorted by name descending.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category,
            limit: DEFAULT_LIMIT,
            price_range: PriceRange::unbounded(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }

    /// Sets the result count. Zero falls back to [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self
    }

    /// Sets the price bounds.
    #[must_use]
    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = price_range;
        self
    }

    /// Sets the sort key and direction.
    #[must_use]
    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_key = key;
        self.sort_order = order;
        self
    }

    /// The requested category.
    #[inline]
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Maximum number of products to return. Always positive.
    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Price bounds applied to the merged collection.
    #[inline]
    #[must_use]
    pub fn price_range(&self) -> &PriceRange {
        &self.price_range
    }

    /// Field to rank by.
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Ranking direction.
    #[inline]
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

impl fmt::Display for TopProductsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TopProducts(category={} n={} price={} sort={} {})",
            self.category, self.limit, self.price_range, self.sort_key, self.sort_order
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let query = TopProductsQuery::new(Category::new("Phone"));
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.sort_key(), SortKey::Name);
        assert_eq!(query.sort_order(), SortOrder::Descending);
        assert!(query.price_range().is_unbounded());
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        let query = TopProductsQuery::new(Category::new("Phone")).with_limit(0);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn display_mentions_parameters() {
        let query = TopProductsQuery::new(Category::new("TV"))
            .with_limit(3)
            .with_sort(SortKey::Rating, SortOrder::Ascending);
        let display = query.to_string();
        assert!(display.contains("category=TV"));
        assert!(display.contains("n=3"));
        assert!(display.contains("rating asc"));
    }
}
