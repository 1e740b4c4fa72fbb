//! # Application Layer
//!
//! Use cases built on the domain and the source ports: top-N aggregation
//! across sources and single-product resolution.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
