//! # Domain Layer
//!
//! Products, request parameters and their invariants. Nothing in this layer
//! performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
