//! Product aggregator server.
//!
//! Loads configuration, wires the HTTP sources into the aggregation engine
//! and serves the REST API until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use product_aggregator::api::rest::{AppState, create_router};
use product_aggregator::application::services::{DetailResolver, ProductAggregationEngine};
use product_aggregator::config::AppConfig;
use product_aggregator::domain::value_objects::SourceId;
use product_aggregator::infrastructure::sources::{
    HttpClient, HttpDetailSource, SourceRegistry,
};
use product_aggregator::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Identifier tagging errors raised by the detail endpoint.
const DETAIL_SOURCE_ID: &str = "detail";

#[derive(Parser, Debug)]
#[command(name = "product-aggregator")]
#[command(about = "Aggregates product listings from multiple company sources and serves ranked top-N results")]
struct Args {
    /// Configuration file; a missing file leaves defaults and environment in effect
    #[arg(short, long, default_value = "config/product-aggregator.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(Some(args.config.as_path()))
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    telemetry::init_tracing(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let source_client = HttpClient::new(config.aggregation.per_source_timeout_ms)
        .context("building source HTTP client")?;
    let registry = SourceRegistry::from_config(&config.sources, &source_client)
        .context("building source registry")?;

    let engine = ProductAggregationEngine::new(
        Arc::new(registry),
        config.aggregation.tie_break.strategy(),
        config.aggregation.engine_config(),
    );

    let detail_client =
        HttpClient::new(config.detail.timeout_ms).context("building detail HTTP client")?;
    let detail_source = HttpDetailSource::new(
        SourceId::new(DETAIL_SOURCE_ID),
        &config.detail.endpoint,
        detail_client,
    )
    .context("building detail source")?;
    let resolver = DetailResolver::new(Arc::new(detail_source), config.detail.timeout_ms);

    info!(
        sources = ?engine.source_ids(),
        fan_out_policy = %config.aggregation.fan_out_policy,
        tie_break = engine.ranking_strategy_name(),
        timeout_ms = config.aggregation.timeout_ms,
        per_source_timeout_ms = config.aggregation.per_source_timeout_ms,
        "aggregation engine ready"
    );

    let state = Arc::new(AppState {
        engine: Arc::new(engine),
        resolver: Arc::new(resolver),
    });
    let router = create_router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("received shutdown signal, draining");
}
