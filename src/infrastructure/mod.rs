//! # Infrastructure Layer
//!
//! Adapters to the outside world: the upstream product sources.

pub mod sources;
