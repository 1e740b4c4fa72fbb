//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`ProductAggregationEngine`]: Concurrent product collection and ranking
//! - [`DetailResolver`]: Single-product lookups
//! - [`RankingStrategy`]: Strategies for ordering products

pub mod detail_resolver;
pub mod price_filter;
pub mod product_aggregation;
pub mod ranking;

pub use detail_resolver::DetailResolver;
pub use price_filter::{FilterOutcome, filter_by_price};
pub use product_aggregation::{
    AggregationConfig, AggregationResult, FanOutPolicy, ProductAggregationEngine, SourceOutcome,
    SourceReport,
};
pub use ranking::{ProductIdRanking, RankingStrategy, StableRanking, TieBreak, top_n};
