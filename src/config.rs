//! # Configuration
//!
//! Layered service configuration.
//!
//! Sources are applied in order, later ones overriding earlier ones:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. An optional TOML file
//! 3. Environment variables prefixed with `PRODUCT_AGG__`, using `__` as
//!    the section separator (e.g. `PRODUCT_AGG__SERVER__PORT=9090`)
//!
//! # Examples
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [aggregation]
//! timeout_ms = 5000
//! per_source_timeout_ms = 2000
//! fan_out_policy = "best_effort"
//! tie_break = "product_id"
//!
//! [[sources]]
//! id = "AMZ"
//! endpoint = "http://test-server.com/products"
//!
//! [detail]
//! endpoint = "http://test-server.com/products"
//! timeout_ms = 2000
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use crate::application::services::product_aggregation::{AggregationConfig, FanOutPolicy};
use crate::application::services::ranking::TieBreak;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "PRODUCT_AGG";

/// Companies queried when no source list is configured.
pub const DEFAULT_COMPANIES: [&str; 5] = ["AMZ", "FLP", "SNP", "MYN", "AZO"];

/// Upstream endpoint shared by the default companies.
pub const DEFAULT_SOURCE_ENDPOINT: &str = "http://test-server.com/products";

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration was read but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Fan-out and ranking settings, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Deadline for a whole aggregation request in milliseconds.
    pub timeout_ms: u64,
    /// Deadline for each source call in milliseconds.
    pub per_source_timeout_ms: u64,
    /// Behaviour when a source fails.
    pub fan_out_policy: FanOutPolicy,
    /// Ordering among products with equal sort keys.
    pub tie_break: TieBreak,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        let defaults = AggregationConfig::default();
        Self {
            timeout_ms: defaults.timeout_ms,
            per_source_timeout_ms: defaults.per_source_timeout_ms,
            fan_out_policy: defaults.policy,
            tie_break: TieBreak::default(),
        }
    }
}

impl AggregationSettings {
    /// Converts to the engine configuration.
    #[must_use]
    pub fn engine_config(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.timeout_ms)
            .with_per_source_timeout(self.per_source_timeout_ms)
            .with_policy(self.fan_out_policy)
    }
}

/// One upstream company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Company code, sent upstream as the `company` parameter.
    pub id: String,
    /// Listing endpoint.
    #[serde(default = "default_source_endpoint")]
    pub endpoint: String,
}

impl SourceConfig {
    /// Creates a source entry.
    #[must_use]
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Product detail endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// Base URL; requests go to `<endpoint>/<productId>/details`.
    pub endpoint: String,
    /// Deadline for a detail call in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SOURCE_ENDPOINT.to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Fan-out and ranking.
    pub aggregation: AggregationSettings,
    /// Upstream companies, queried in this order.
    pub sources: Vec<SourceConfig>,
    /// Product detail endpoint.
    pub detail: DetailConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            aggregation: AggregationSettings::default(),
            sources: DEFAULT_COMPANIES
                .iter()
                .map(|id| SourceConfig::new(*id, DEFAULT_SOURCE_ENDPOINT))
                .collect(),
            detail: DetailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, an optional file and the
    /// environment, then validates it.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be parsed and
    /// `ConfigError::Invalid` if validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layers(path, environment())
    }

    fn load_layers(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config: Self = builder.add_source(environment).build()?.try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if there are no sources, a source id is
    /// empty or repeated, a timeout is zero, or an endpoint is not an absolute
    /// URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("at least one source is required".into()));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(ConfigError::Invalid("source id must not be empty".into()));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source id '{}'",
                    source.id
                )));
            }
            check_url(&format!("sources.{}.endpoint", source.id), &source.endpoint)?;
        }
        check_url("detail.endpoint", &self.detail.endpoint)?;

        for (name, value) in [
            ("aggregation.timeout_ms", self.aggregation.timeout_ms),
            (
                "aggregation.per_source_timeout_ms",
                self.aggregation.per_source_timeout_ms,
            ),
            ("detail.timeout_ms", self.detail.timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }

        Ok(())
    }
}

/// Environment layer: `PRODUCT_AGG__SECTION__KEY`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn default_source_endpoint() -> String {
    DEFAULT_SOURCE_ENDPOINT.to_string()
}

fn check_url(name: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("{name} '{value}' is not a valid URL: {e}")))
}
