//! Configuration for market data lookups

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stock_utils::{env_parse, env_string};

/// History ranges the Yahoo client understands
pub const HISTORY_RANGES: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Configuration for the lookup service and its provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Exchange suffix appended when a bare symbol yields no price
    pub regional_suffix: String,

    /// Price history window fetched with each snapshot
    pub history_range: String,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// How long fetched data stays cached
    pub cache_ttl: Duration,

    /// Provider request budget
    pub requests_per_minute: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            regional_suffix: ".SA".to_string(),
            history_range: "3mo".to_string(),
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(60),
            requests_per_minute: 30,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Apply `STOCK_PANEL_*` environment overrides
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(suffix) = env_string("STOCK_PANEL_REGIONAL_SUFFIX") {
            self.regional_suffix = suffix;
        }
        if let Some(range) = env_string("STOCK_PANEL_HISTORY_RANGE") {
            self.history_range = range;
        }
        if let Some(secs) = env_parse::<u64>("STOCK_PANEL_TIMEOUT_SECS")? {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("STOCK_PANEL_CACHE_TTL_SECS")? {
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(limit) = env_parse::<u32>("STOCK_PANEL_RATE_LIMIT")? {
            self.requests_per_minute = limit;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.regional_suffix.starts_with('.') || self.regional_suffix.len() < 2 {
            return Err(DataError::Config(format!(
                "regional suffix must look like '.SA', got '{}'",
                self.regional_suffix
            )));
        }

        if !HISTORY_RANGES.contains(&self.history_range.as_str()) {
            return Err(DataError::Config(format!(
                "unsupported history range '{}' (expected one of {})",
                self.history_range,
                HISTORY_RANGES.join(", ")
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(DataError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(DataError::Config(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `symbol` already carries the regional suffix
    pub fn has_regional_suffix(&self, symbol: &str) -> bool {
        symbol
            .to_uppercase()
            .ends_with(&self.regional_suffix.to_uppercase())
    }
}

/// Builder for AnalyzerConfig
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    regional_suffix: Option<String>,
    history_range: Option<String>,
    request_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    requests_per_minute: Option<u32>,
}

impl AnalyzerConfigBuilder {
    /// Set the regional suffix used on retry
    pub fn regional_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.regional_suffix = Some(suffix.into());
        self
    }

    /// Set the history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set the request budget per minute
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalyzerConfig> {
        let defaults = AnalyzerConfig::default();

        let config = AnalyzerConfig {
            regional_suffix: self.regional_suffix.unwrap_or(defaults.regional_suffix),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            requests_per_minute: self
                .requests_per_minute
                .unwrap_or(defaults.requests_per_minute),
        };

        config.validate()?;
        Ok(config)
    }
}
