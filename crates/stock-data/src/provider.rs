//! Market-data provider abstraction

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stock_core::QuoteSnapshot;

/// One closing price of the history series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: u64,
}

/// Everything a provider returns for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: String,
    pub snapshot: QuoteSnapshot,
    /// Oldest first; may be empty
    pub history: Vec<PricePoint>,
}

impl MarketData {
    /// Data with nothing in it, used for unknown symbols
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            snapshot: QuoteSnapshot::default(),
            history: Vec::new(),
        }
    }

    /// Whether the snapshot has a price to score against
    pub fn is_usable(&self) -> bool {
        self.snapshot.has_price()
    }

    /// Close-to-close change over the history, in percent
    pub fn history_change_percent(&self) -> Option<f64> {
        let first = self.history.first()?.close;
        let last = self.history.last()?.close;
        if self.history.len() < 2 || first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

/// Source of quote snapshots and price history.
///
/// An unknown symbol should come back as [`MarketData::empty`] (or
/// `DataError::NotFound`) so the caller can apply its retry policy;
/// transport failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Fetch snapshot and history for one symbol
    async fn fetch(&self, symbol: &str) -> Result<MarketData>;
}
