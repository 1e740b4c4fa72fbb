//! # Price Filter
//!
//! Closed-interval price filtering of merged source results.
//!
//! Sources are sent the caller's bounds but are not trusted to honour them,
//! so the merged collection is filtered again here.

use crate::domain::entities::Product;
use crate::domain::value_objects::PriceRange;

/// Outcome of filtering a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Products within the range, in input order.
    pub retained: Vec<Product>,
    /// Number of products removed.
    pub removed: usize,
}

/// Keeps products whose price lies in `range`, preserving order.
#[must_use]
pub fn filter_by_price(products: Vec<Product>, range: &PriceRange) -> FilterOutcome {
    if range.is_unbounded() {
        return FilterOutcome {
            retained: products,
            removed: 0,
        };
    }

    let before = products.len();
    let retained: Vec<Product> = products
        .into_iter()
        .filter(|p| range.contains(p.price()))
        .collect();

    FilterOutcome {
        removed: before - retained.len(),
        retained,
    }
}
