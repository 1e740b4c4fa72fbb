//! # Identifiers
//!
//! String-based identifiers for sources, products and categories.
//!
//! All three are opaque to this service: they are compared and forwarded
//! upstream verbatim, never interpreted.
//!
//! # Examples
//!
//! ```
//! use product_aggregator::domain::value_objects::{Category, ProductId, SourceId};
//!
//! let source = SourceId::new("AMZ");
//! let category = Category::new("Laptop");
//! let product = ProductId::new("p-42");
//!
//! assert_eq!(source.as_str(), "AMZ");
//! assert_eq!(category.to_string(), "Laptop");
//! assert_eq!(product.as_str(), "p-42");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Short company code identifying an upstream source (e.g. `AMZ`).
    SourceId
);

string_id!(
    /// Product identifier, unique within a category.
    ProductId
);

string_id!(
    /// Caller-supplied grouping key scoping aggregation and detail lookups.
    Category
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![ProductId::new("p-3"), ProductId::new("p-1"), ProductId::new("p-2")];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(ProductId::as_str).collect();
        assert_eq!(sorted, vec!["p-1", "p-2", "p-3"]);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&SourceId::new("FLP")).ok();
        assert_eq!(json.as_deref(), Some("\"FLP\""));
    }

    #[test]
    fn empty_check() {
        assert!(Category::default().is_empty());
        assert!(!Category::new("Phone").is_empty());
    }
}
