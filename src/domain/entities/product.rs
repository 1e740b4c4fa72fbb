//! # Product Entity
//!
//! A product listing retrieved from an upstream source.
//!
//! Products are immutable once retrieved and live only for the request that
//! fetched them. The JSON shape matches the upstream sources:
//!
//! ```json
//! {"id":"p1","name":"Laptop 1","price":2236.0,"company":"AMZ",
//!  "category":"Laptop","rating":4.7,"discount":63.0}
//! ```
//!
//! `id`, `name` and `price` are required; the remaining fields default to an
//! empty string or `0.0`.
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::entities::Product;
//!
//! let product = Product::new("p1", "Laptop 1", 2236.0)
//!     .unwrap()
//!     .with_company("AMZ")
//!     .with_rating(4.7);
//!
//! assert_eq!(product.company().as_str(), "AMZ");
//! assert!(Product::new("p2", "Broken", -1.0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Category, ProductId, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A product listing from one upstream source.
///
/// # Invariants
///
/// - `price` is finite and non-negative
/// - `rating` and `discount` are finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    company: SourceId,
    category: Category,
    rating: f64,
    discount: f64,
}

impl Product {
    /// Creates a product with the required fields; company and category are
    /// empty and rating and discount are zero.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if `price` is negative or not finite.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
    ) -> DomainResult<Self> {
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::invalid_price(format!(
                "product price must be a finite non-negative number, got {price}"
            )));
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            price,
            company: SourceId::default(),
            category: Category::default(),
            rating: 0.0,
            discount: 0.0,
        })
    }

    /// Sets the owning company.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<SourceId>) -> Self {
        self.company = company.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the rating. Non-finite values are stored as zero.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = finite_or_zero(rating);
        self
    }

    /// Sets the discount. Non-finite values are stored as zero.
    #[must_use]
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = finite_or_zero(discount);
        self
    }

    /// Fills in the owning company when the source left it empty.
    #[must_use]
    pub fn or_company(mut self, source_id: &SourceId) -> Self {
        if self.company.is_empty() {
            self.company = source_id.clone();
        }
        self
    }

    /// Product identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price, finite and non-negative.
    #[inline]
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Owning company / source code.
    #[inline]
    #[must_use]
    pub fn company(&self) -> &SourceId {
        &self.company
    }

    /// Category.
    #[inline]
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Rating on the source's scale.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Discount on the source's scale, usually a percentage.
    #[inline]
    #[must_use]
    pub fn discount(&self) -> f64 {
        self.discount
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product({} '{}' {} @ {} from {})",
            self.id, self.name, self.category, self.price, self.company
        )
    }
}

/// Wire shape of a product, validated into [`Product`] on deserialization.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: f64,
    #[serde(default)]
    company: SourceId,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    discount: f64,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Product::new(record.id, record.name, record.price)?
            .with_company(record.company)
            .with_category(record.category)
            .with_rating(record.rating)
            .with_discount(record.discount))
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
