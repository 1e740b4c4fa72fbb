//! # Domain Enums
//!
//! Enumeration types for ranking requests.
//!
//! - [`SortKey`] - Product field a result set is ordered by
//! - [`SortOrder`] - Ascending or descending direction
//!
//! Both enums implement `Display`, a strict `FromStr`, and a lenient
//! `from_token` used when translating caller query strings, where unknown
//! values fall back to the default instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product field used to order an aggregated result set.
///
/// # Examples
///
/// ```
/// use product_aggregator::domain::value_objects::enums::SortKey;
///
/// assert_eq!(SortKey::from_token("price"), SortKey::Price);
/// assert_eq!(SortKey::from_token("popularity"), SortKey::Name);
/// assert_eq!(SortKey::default(), SortKey::Name);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Lexicographic on the display name.
    #[default]
    Name,
    /// Numeric on the rating.
    Rating,
    /// Numeric on the price.
    Price,
    /// Lexicographic on the owning company code.
    Company,
    /// Numeric on the discount.
    Discount,
}

impl SortKey {
    /// All sort keys, in declaration order.
    pub const ALL: [SortKey; 5] = [
        Self::Name,
        Self::Rating,
        Self::Price,
        Self::Company,
        Self::Discount,
    ];

    /// Parses a query token, falling back to [`SortKey::Name`] for anything
    /// that is not an exact key name.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }

    /// Returns the wire name of this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Price => "price",
            Self::Company => "company",
            Self::Discount => "discount",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "price" => Ok(Self::Price),
            "company" => Ok(Self::Company),
            "discount" => Ok(Self::Discount),
            _ => Err(ParseEnumError::InvalidValue("SortKey", s.to_string())),
        }
    }
}

/// Direction of a ranking.
///
/// Only the literal token `asc` selects ascending order. Every other token,
/// including a misspelling or an absent parameter, selects descending.
///
/// # Examples
///
/// ```
/// use product_aggregator::domain::value_objects::enums::SortOrder;
///
/// assert_eq!(SortOrder::from_token("asc"), SortOrder::Ascending);
/// assert_eq!(SortOrder::from_token("ASC"), SortOrder::Descending);
/// assert_eq!(SortOrder::from_token("ascending"), SortOrder::Descending);
/// assert_eq!(SortOrder::default(), SortOrder::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smaller or lexicographically earlier values first.
    Ascending,
    /// Larger or lexicographically later values first.
    #[default]
    Descending,
}

impl SortOrder {
    /// Literal query token selecting ascending order.
    pub const ASCENDING_TOKEN: &'static str = "asc";

    /// Parses a query token; anything other than `asc` is descending.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == Self::ASCENDING_TOKEN {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Returns true for ascending order.
    #[inline]
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// Returns the wire token of this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            _ => Err(ParseEnumError::InvalidValue("SortOrder", s.to_string())),
        }
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
