//! # Product Aggregation Engine
//!
//! Fans out to every configured source, merges, filters, ranks and truncates.
//!
//! ```text
//! query ──► source 1 ─┐
//!       ──► source 2 ─┼─► merge (config order) ─► price filter ─► rank ─► top n
//!       ──► source N ─┘
//! ```
//!
//! Each source call runs as its own task with its own deadline; the whole
//! fan-out runs under an overall deadline. Tasks live in a
//! [`tokio::task::JoinSet`], so dropping the request future (client gone,
//! deadline hit, or a fail-fast abort) cancels every call still in flight.
//!
//! What happens when a source fails is set by [`FanOutPolicy`].

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::price_filter::filter_by_price;
use crate::application::services::ranking::{RankingStrategy, StableRanking, top_n};
use crate::domain::entities::Product;
use crate::domain::value_objects::{SourceId, TopProductsQuery};
use crate::infrastructure::sources::error::SourceError;
use crate::infrastructure::sources::registry::SourceRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Behaviour of an aggregation when a source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutPolicy {
    /// The first failure fails the request and cancels the other calls.
    #[default]
    FailFast,
    /// Failures are reported per source; healthy sources still contribute.
    BestEffort,
}

impl FanOutPolicy {
    /// Configuration name of this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::BestEffort => "best_effort",
        }
    }
}

impl fmt::Display for FanOutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for product aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Overall timeout for one aggregation in milliseconds.
    pub timeout_ms: u64,
    /// Per-source timeout in milliseconds.
    pub per_source_timeout_ms: u64,
    /// Failure policy.
    pub policy: FanOutPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            per_source_timeout_ms: 2000,
            policy: FanOutPolicy::FailFast,
        }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the per-source timeout.
    #[must_use]
    pub fn with_per_source_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_source_timeout_ms = timeout_ms;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FanOutPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// What happened to one source during an aggregation.
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    /// The source answered.
    Succeeded {
        /// Number of products it returned.
        products: usize,
    },
    /// The source failed; only recorded under [`FanOutPolicy::BestEffort`].
    Failed(SourceError),
}

/// Per-source status of an aggregation.
#[derive(Debug, Clone)]
pub struct SourceReport {
    /// The source.
    pub source_id: SourceId,
    /// Its outcome.
    pub outcome: SourceOutcome,
    /// Time until it answered or failed.
    pub elapsed: Duration,
}

impl SourceReport {
    /// Returns true if the source answered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Succeeded { .. })
    }
}

/// Result of an aggregation.
#[derive(Debug)]
pub struct AggregationResult {
    /// Ranked products, at most `n`.
    pub products: Vec<Product>,
    /// Products returned by all sources before filtering.
    pub total_collected: usize,
    /// Products removed by the price filter.
    pub filtered_count: usize,
    /// One report per source, in configuration order.
    pub source_reports: Vec<SourceReport>,
}

impl AggregationResult {
    /// Identifiers of the sources that failed.
    #[must_use]
    pub fn failed_sources(&self) -> Vec<&SourceId> {
        self.source_reports
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| &r.source_id)
            .collect()
    }

    /// Returns true if some source failed and the result is partial.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.source_reports.iter().any(|r| !r.is_success())
    }
}

type SourceAnswer = (usize, Duration, Result<Vec<Product>, SourceError>);

/// Engine producing ranked top-N product lists across all sources.
#[derive(Debug)]
pub struct ProductAggregationEngine {
    registry: Arc<SourceRegistry>,
    ranking_strategy: Arc<dyn RankingStrategy>,
    config: AggregationConfig,
}

impl ProductAggregationEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new(
        registry: Arc<SourceRegistry>,
        ranking_strategy: Arc<dyn RankingStrategy>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            registry,
            ranking_strategy,
            config,
        }
    }

    /// Creates an engine with stable ranking and default configuration.
    #[must_use]
    pub fn with_defaults(registry: Arc<SourceRegistry>) -> Self {
        Self::new(
            registry,
            Arc::new(StableRanking::new()),
            AggregationConfig::default(),
        )
    }

    /// Aggregates the query's category across all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sources are configured
    /// - The overall deadline elapses
    /// - A source fails under [`FanOutPolicy::FailFast`]
    /// - Every source fails under [`FanOutPolicy::BestEffort`]
    pub async fn aggregate(
        &self,
        query: &TopProductsQuery,
    ) -> ApplicationResult<AggregationResult> {
        if self.registry.is_empty() {
            return Err(ApplicationError::NoSourcesConfigured);
        }

        let started = Instant::now();
        let overall_timeout = Duration::from_millis(self.config.timeout_ms);
        let (batches, source_reports) = timeout(overall_timeout, self.collect_from_sources(query))
            .await
            .map_err(|_| ApplicationError::Timeout {
                timeout_ms: self.config.timeout_ms,
            })??;

        if source_reports.iter().all(|r| !r.is_success()) {
            let errors = source_reports
                .into_iter()
                .filter_map(|r| match r.outcome {
                    SourceOutcome::Failed(e) => Some(e),
                    SourceOutcome::Succeeded { .. } => None,
                })
                .collect();
            return Err(ApplicationError::AllSourcesFailed(errors));
        }

        let merged: Vec<Product> = batches.into_iter().flatten().collect();
        let total_collected = merged.len();

        let filtered = filter_by_price(merged, query.price_range());
        let ranked = self.ranking_strategy.rank(
            filtered.retained,
            query.sort_key(),
            query.sort_order(),
        );
        let products = top_n(ranked, query.limit());

        info!(
            category = %query.category(),
            collected = total_collected,
            filtered = filtered.removed,
            returned = products.len(),
            failed_sources = source_reports.iter().filter(|r| !r.is_success()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregated products"
        );

        Ok(AggregationResult {
            products,
            total_collected,
            filtered_count: filtered.removed,
            source_reports,
        })
    }

    /// Calls every source concurrently, returning each source's products in
    /// configuration order.
    async fn collect_from_sources(
        &self,
        query: &TopProductsQuery,
    ) -> ApplicationResult<(Vec<Vec<Product>>, Vec<SourceReport>)> {
        let per_source_timeout_ms = self.config.per_source_timeout_ms;
        let per_source_timeout = Duration::from_millis(per_source_timeout_ms);
        let mut tasks: JoinSet<SourceAnswer> = JoinSet::new();

        for (index, source) in self.registry.sources().iter().enumerate() {
            let source = Arc::clone(source);
            let query = query.clone();

            tasks.spawn(async move {
                let started = Instant::now();
                let result = match timeout(per_source_timeout, source.fetch_products(&query)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::timeout(
                        source.source_id().clone(),
                        per_source_timeout_ms,
                    )),
                };
                (index, started.elapsed(), result)
            });
        }

        let source_count = self.registry.len();
        let source_ids = self.registry.source_ids();
        let mut batches: Vec<Vec<Product>> = vec![Vec::new(); source_count];
        let mut outcomes: Vec<Option<(SourceOutcome, Duration)>> = vec![None; source_count];

        while let Some(joined) = tasks.join_next().await {
            let (index, elapsed, result) = joined.map_err(|e| {
                ApplicationError::internal(format!("source task did not complete: {e}"))
            })?;

            let outcome = match result {
                Ok(products) => {
                    debug!(
                        source_id = ?source_ids.get(index),
                        count = products.len(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "source answered"
                    );
                    let count = products.len();
                    if let Some(batch) = batches.get_mut(index) {
                        *batch = products;
                    }
                    SourceOutcome::Succeeded { products: count }
                }
                Err(error) => {
                    warn!(
                        source_id = %error.source_id(),
                        kind = %error.kind(),
                        error = %error,
                        policy = %self.config.policy,
                        "source failed"
                    );
                    match self.config.policy {
                        FanOutPolicy::FailFast => return Err(error.into()),
                        FanOutPolicy::BestEffort => SourceOutcome::Failed(error),
                    }
                }
            };

            if let Some(slot) = outcomes.get_mut(index) {
                *slot = Some((outcome, elapsed));
            }
        }

        let reports = source_ids
            .into_iter()
            .zip(outcomes)
            .map(|(source_id, outcome)| {
                let (outcome, elapsed) = outcome.unwrap_or_else(|| {
                    (
                        SourceOutcome::Failed(SourceError::unavailable(
                            source_id.clone(),
                            "source produced no answer",
                        )),
                        Duration::ZERO,
                    )
                });
                SourceReport {
                    source_id,
                    outcome,
                    elapsed,
                }
            })
            .collect();

        Ok((batches, reports))
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the ranking strategy name.
    #[must_use]
    pub fn ranking_strategy_name(&self) -> &'static str {
        self.ranking_strategy.name()
    }

    /// Identifiers of the sources this engine fans out to.
    #[must_use]
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.registry.source_ids()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::ranking::ProductIdRanking;
    use crate::domain::value_objects::{Category, PriceRange, SortKey, SortOrder};
    use crate::infrastructure::sources::error::SourceErrorKind;
    use crate::infrastructure::sources::in_memory::StaticProductSource;
    use crate::infrastructure::sources::traits::ProductSource;

    fn product(id: &str, name: &str, price: f64) -> Product {
        Product::new(id, name, price).unwrap().with_category("p")
    }

    fn five_priced(company: &str) -> Vec<Product> {
        [10.0, 20.0, 30.0, 40.0, 50.0]
            .iter()
            .enumerate()
            .map(|(i, price)| {
                product(
                    &format!("{company}-{i}"),
                    &format!("{company} item {i}"),
                    *price,
                )
            })
            .collect()
    }

    fn engine(
        sources: Vec<Arc<dyn ProductSource>>,
        config: AggregationConfig,
    ) -> ProductAggregationEngine {
        ProductAggregationEngine::new(
            Arc::new(SourceRegistry::new(sources)),
            Arc::new(StableRanking::new()),
            config,
        )
    }

    fn query() -> TopProductsQuery {
        TopProductsQuery::new(Category::new("p"))
    }

    fn failing(id: &str) -> Arc<dyn ProductSource> {
        Arc::new(StaticProductSource::failing(
            id,
            SourceError::bad_status(SourceId::new(id), 500, "internal"),
        ))
    }

    #[tokio::test]
    async fn merges_all_sources() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(StaticProductSource::new("FLP", five_priced("FLP"))),
        ];
        let result = engine(sources, AggregationConfig::default())
            .aggregate(&query().with_limit(100))
            .await
            .unwrap();

        assert_eq!(result.total_collected, 10);
        assert_eq!(result.products.len(), 10);
        assert!(!result.is_partial());
        assert_eq!(result.source_reports.len(), 2);
    }

    #[tokio::test]
    async fn price_window_scenario() {
        let sources: Vec<Arc<dyn ProductSource>> =
            vec![Arc::new(StaticProductSource::new("A", five_priced("A")))];
        let query = query().with_price_range(PriceRange::new(Some(15.0), Some(35.0)).unwrap());

        let result = engine(sources, AggregationConfig::default())
            .aggregate(&query)
            .await
            .unwrap();

        let prices: Vec<f64> = result.products.iter().map(Product::price).collect();
        // Default ordering is name descending: "A item 2" before "A item 1".
        assert_eq!(prices, vec![30.0, 20.0]);
        assert_eq!(result.filtered_count, 3);
    }

    #[tokio::test]
    async fn n_larger_than_collection_returns_everything() {
        let sources: Vec<Arc<dyn ProductSource>> =
            vec![Arc::new(StaticProductSource::new("A", five_priced("A")))];
        let result = engine(sources, AggregationConfig::default())
            .aggregate(&query().with_limit(100))
            .await
            .unwrap();
        assert_eq!(result.products.len(), 5);
    }

    #[tokio::test]
    async fn truncates_to_n() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(StaticProductSource::new("FLP", five_priced("FLP"))),
        ];
        let query = query()
            .with_limit(3)
            .with_sort(SortKey::Price, SortOrder::Descending);
        let result = engine(sources, AggregationConfig::default())
            .aggregate(&query)
            .await
            .unwrap();

        let prices: Vec<f64> = result.products.iter().map(Product::price).collect();
        assert_eq!(prices, vec![50.0, 50.0, 40.0]);
    }

    #[tokio::test]
    async fn ties_follow_source_configuration_order() {
        let slow_first: Arc<dyn ProductSource> = Arc::new(
            StaticProductSource::new("AMZ", vec![product("amz", "Same", 1.0)])
                .with_delay(Duration::from_millis(30)),
        );
        let fast_second: Arc<dyn ProductSource> =
            Arc::new(StaticProductSource::new("FLP", vec![product("flp", "Same", 1.0)]));

        let result = engine(vec![slow_first, fast_second], AggregationConfig::default())
            .aggregate(&query())
            .await
            .unwrap();

        let ids: Vec<&str> = result.products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["amz", "flp"]);
    }

    #[tokio::test]
    async fn fail_fast_names_failing_source() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(StaticProductSource::new("FLP", five_priced("FLP"))),
            failing("SNP"),
            Arc::new(StaticProductSource::new("MYN", five_priced("MYN"))),
            Arc::new(StaticProductSource::new("AZO", five_priced("AZO"))),
        ];
        let err = engine(sources, AggregationConfig::default())
            .aggregate(&query())
            .await
            .unwrap_err();

        let source_error = err.source_error().unwrap();
        assert_eq!(source_error.kind(), SourceErrorKind::BadStatus);
        assert_eq!(source_error.source_id().as_str(), "SNP");
        assert!(err.to_string().contains("SNP"));
    }

    #[tokio::test]
    async fn best_effort_returns_healthy_sources() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(StaticProductSource::new("FLP", five_priced("FLP"))),
            failing("SNP"),
            Arc::new(StaticProductSource::new("MYN", five_priced("MYN"))),
            Arc::new(StaticProductSource::new("AZO", five_priced("AZO"))),
        ];
        let config = AggregationConfig::default().with_policy(FanOutPolicy::BestEffort);
        let result = engine(sources, config)
            .aggregate(&query().with_limit(100))
            .await
            .unwrap();

        assert_eq!(result.products.len(), 20);
        assert!(result.is_partial());
        let failed: Vec<&str> = result.failed_sources().iter().map(|s| s.as_str()).collect();
        assert_eq!(failed, vec!["SNP"]);
        assert!(result.products.iter().all(|p| p.company().as_str() != "SNP"));
    }

    #[tokio::test]
    async fn best_effort_all_failed() {
        let config = AggregationConfig::default().with_policy(FanOutPolicy::BestEffort);
        let err = engine(vec![failing("AMZ"), failing("FLP")], config)
            .aggregate(&query())
            .await
            .unwrap_err();

        match err {
            ApplicationError::AllSourcesFailed(errors) => assert_eq!(errors.len(), 2),
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn no_sources() {
        let err = engine(vec![], AggregationConfig::default())
            .aggregate(&query())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NoSourcesConfigured));
    }

    #[tokio::test]
    async fn slow_source_hits_per_source_deadline() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(
                StaticProductSource::new("FLP", five_priced("FLP"))
                    .with_delay(Duration::from_millis(500)),
            ),
        ];
        let config = AggregationConfig::with_timeout(5000)
            .with_per_source_timeout(50)
            .with_policy(FanOutPolicy::BestEffort);
        let result = engine(sources, config).aggregate(&query()).await.unwrap();

        let report = &result.source_reports[1];
        assert_eq!(report.source_id.as_str(), "FLP");
        match &report.outcome {
            SourceOutcome::Failed(e) => assert!(e.is_timeout()),
            SourceOutcome::Succeeded { .. } => unreachable!("slow source must time out"),
        }
    }

    #[tokio::test]
    async fn overall_deadline() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![Arc::new(
            StaticProductSource::new("AMZ", five_priced("AMZ"))
                .with_delay(Duration::from_millis(500)),
        )];
        let config = AggregationConfig::with_timeout(50).with_per_source_timeout(5000);
        let err = engine(sources, config).aggregate(&query()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Timeout { timeout_ms: 50 }));
    }

    #[tokio::test]
    async fn abandoned_request_cancels_source_calls() {
        let slow = Arc::new(
            StaticProductSource::new("AMZ", five_priced("AMZ")).with_delay(Duration::from_secs(5)),
        );
        let sources: Vec<Arc<dyn ProductSource>> = vec![slow.clone() as Arc<dyn ProductSource>];
        let config = AggregationConfig::with_timeout(50).with_per_source_timeout(10_000);
        let engine = engine(sources, config);

        assert!(engine.aggregate(&query()).await.is_err());
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Only the test and the registry still hold the source.
        assert_eq!(Arc::strong_count(&slow), 2);
    }

    #[tokio::test]
    async fn fail_fast_cancels_remaining_calls() {
        let slow = Arc::new(
            StaticProductSource::new("AMZ", five_priced("AMZ")).with_delay(Duration::from_secs(5)),
        );
        let sources: Vec<Arc<dyn ProductSource>> =
            vec![slow.clone() as Arc<dyn ProductSource>, failing("FLP")];
        let engine = engine(sources, AggregationConfig::default());

        let started = Instant::now();
        assert!(engine.aggregate(&query()).await.is_err());
        assert!(started.elapsed() < Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(Arc::strong_count(&slow), 2);
    }

    #[tokio::test]
    async fn repeated_requests_are_idempotent() {
        let sources: Vec<Arc<dyn ProductSource>> = vec![
            Arc::new(StaticProductSource::new("AMZ", five_priced("AMZ"))),
            Arc::new(StaticProductSource::new("FLP", five_priced("FLP"))),
        ];
        let engine = ProductAggregationEngine::new(
            Arc::new(SourceRegistry::new(sources)),
            Arc::new(ProductIdRanking::new()),
            AggregationConfig::default(),
        );
        let query = query().with_sort(SortKey::Price, SortOrder::Ascending);

        let first = engine.aggregate(&query).await.unwrap().products;
        let second = engine.aggregate(&query).await.unwrap().products;
        assert_eq!(first, second);
    }

    #[test]
    fn aggregation_config_builder() {
        let config = AggregationConfig::with_timeout(3000)
            .with_per_source_timeout(1000)
            .with_policy(FanOutPolicy::BestEffort);

        assert_eq!(config.timeout_ms, 3000);
        assert_eq!(config.per_source_timeout_ms, 1000);
        assert_eq!(config.policy, FanOutPolicy::BestEffort);
    }

    #[test]
    fn engine_accessors() {
        let sources: Vec<Arc<dyn ProductSource>> =
            vec![Arc::new(StaticProductSource::new("AMZ", vec![]))];
        let engine =
            ProductAggregationEngine::with_defaults(Arc::new(SourceRegistry::new(sources)));
        assert_eq!(engine.ranking_strategy_name(), "Stable");
        assert_eq!(engine.config().policy, FanOutPolicy::FailFast);
        assert_eq!(engine.source_ids(), vec![SourceId::new("AMZ")]);
    }

    #[test]
    fn policy_names() {
        assert_eq!(FanOutPolicy::FailFast.to_string(), "fail_fast");
        assert_eq!(FanOutPolicy::BestEffort.as_str(), "best_effort");
    }
}
