//! # Ranking Strategy
//!
//! Strategies for ordering a merged product collection.
//!
//! A ranking orders by exactly one caller-selected [`SortKey`] in one
//! [`SortOrder`]: lexicographic for name and company, numeric for price,
//! rating and discount. What differs between strategies is how products with
//! equal keys are ordered:
//!
//! - [`StableRanking`]: ties keep their input order
//! - [`ProductIdRanking`]: ties are ordered by ascending product id
//!
//! [`top_n`] then takes at most `n` products, saturating at the collection
//! length.

use crate::domain::entities::Product;
use crate::domain::value_objects::{SortKey, SortOrder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Trait for ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Orders `products` by `key` in `order`, returning the sorted collection.
    fn rank(&self, products: Vec<Product>, key: SortKey, order: SortOrder) -> Vec<Product>;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;
}

/// Ordering of products with equal sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep merge order.
    #[default]
    Stable,
    /// Ascending product identifier, regardless of sort order.
    ProductId,
}

impl TieBreak {
    /// Builds the strategy implementing this tie-break.
    #[must_use]
    pub fn strategy(self) -> Arc<dyn RankingStrategy> {
        match self {
            Self::Stable => Arc::new(StableRanking::new()),
            Self::ProductId => Arc::new(ProductIdRanking::new()),
        }
    }
}

/// Compares two products on `key`, ascending.
///
/// Numeric fields use IEEE total ordering, so the comparison is total even
/// for values a decoder should never produce.
#[must_use]
pub fn compare_by_key(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name().cmp(b.name()),
        SortKey::Company => a.company().cmp(b.company()),
        SortKey::Price => a.price().total_cmp(&b.price()),
        SortKey::Rating => a.rating().total_cmp(&b.rating()),
        SortKey::Discount => a.discount().total_cmp(&b.discount()),
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    if order.is_ascending() {
        ordering
    } else {
        ordering.reverse()
    }
}

/// Ranks by the selected key only; ties keep their input order.
#[derive(Debug, Clone, Default)]
pub struct StableRanking;

impl StableRanking {
    /// Creates a new stable ranking.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RankingStrategy for StableRanking {
    fn rank(&self, mut products: Vec<Product>, key: SortKey, order: SortOrder) -> Vec<Product> {
        products.sort_by(|a, b| directed(compare_by_key(a, b, key), order));
        products
    }

    fn name(&self) -> &'static str {
        "Stable"
    }
}

/// Ranks by the selected key, then by ascending product id.
#[derive(Debug, Clone, Default)]
pub struct ProductIdRanking;

impl ProductIdRanking {
    /// Creates a new product-id tie-break ranking.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RankingStrategy for ProductIdRanking {
    fn rank(&self, mut products: Vec<Product>, key: SortKey, order: SortOrder) -> Vec<Product> {
        products.sort_by(|a, b| {
            directed(compare_by_key(a, b, key), order).then_with(|| a.id().cmp(b.id()))
        });
        products
    }

    fn name(&self) -> &'static str {
        "ProductId"
    }
}

/// Keeps the first `min(n, len)` products.
#[must_use]
pub fn top_n(mut products: Vec<Product>, n: usize) -> Vec<Product> {
    products.truncate(n);
    products
}
