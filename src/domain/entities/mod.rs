//! # Domain Entities
//!
//! - [`Product`]: A product listing retrieved from an upstream source

pub mod product;

pub use product::Product;
