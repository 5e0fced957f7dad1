//! Lookup service: resolve, fetch with regional retry, score

use crate::cache::SnapshotCache;
use crate::config::AnalyzerConfig;
use crate::error::{DataError, Result};
use crate::provider::{MarketData, MarketDataProvider};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use stock_core::{ScoreResult, resolve, score};

/// A scored lookup, ready for presentation
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Text the user typed, trimmed
    pub query: String,
    pub data: MarketData,
    pub result: ScoreResult,
    pub generated_at: DateTime<Utc>,
}

impl Analysis {
    /// Symbol the data was fetched under (may carry the regional suffix)
    pub fn symbol(&self) -> &str {
        &self.data.symbol
    }
}

/// Resolves free text to a symbol, fetches its data and scores it
pub struct StockAnalyzer<P> {
    provider: P,
    cache: SnapshotCache,
    config: Arc<AnalyzerConfig>,
}

impl<P: MarketDataProvider> StockAnalyzer<P> {
    pub fn new(provider: P, config: AnalyzerConfig) -> Self {
        Self {
            provider,
            cache: SnapshotCache::new(config.cache_ttl),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Fetch `symbol`, mapping "nothing usable" to `None`
    async fn fetch_usable(&self, symbol: &str) -> Result<Option<MarketData>> {
        let fetched = self
            .cache
            .get_or_fetch(symbol, || self.provider.fetch(symbol))
            .await;

        match fetched {
            Ok(data) if data.is_usable() => Ok(Some(data)),
            Ok(_) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve `input` and fetch usable market data for it.
    ///
    /// When the resolved symbol has no price and lacks the regional suffix,
    /// one more attempt is made with the suffix appended.
    pub async fn lookup(&self, input: &str) -> Result<MarketData> {
        let query = input.trim();
        if query.is_empty() {
            return Err(DataError::not_found(query));
        }

        let symbol = resolve(query);
        tracing::info!(query, %symbol, provider = self.provider.name(), "Looking up symbol");

        if let Some(data) = self.fetch_usable(&symbol).await? {
            return Ok(data);
        }

        if !self.config.has_regional_suffix(&symbol) {
            let regional = format!("{symbol}{}", self.config.regional_suffix);
            tracing::info!(%symbol, %regional, "No price returned, retrying with regional suffix");

            if let Some(data) = self.fetch_usable(&regional).await? {
                return Ok(data);
            }
        }

        tracing::warn!(query, %symbol, "No usable market data");
        Err(DataError::not_found(query))
    }

    /// Look up `input` and score it
    pub async fn analyze(&self, input: &str) -> Result<Analysis> {
        let data = self.lookup(input).await?;
        let result = score(&data.snapshot)?;

        tracing::info!(
            symbol = %data.symbol,
            tier = %result.tier,
            score = result.score,
            "Analysis complete"
        );

        Ok(Analysis {
            query: input.trim().to_string(),
            data,
            result,
            generated_at: Utc::now(),
        })
    }
}
