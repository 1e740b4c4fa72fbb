//! # API Layer
//!
//! External interfaces of the aggregator.

pub mod rest;
