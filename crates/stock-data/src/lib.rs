//! Market data access for stock-panel
//!
//! This crate sits between the pure scoring core and the presentation layer:
//!
//! - [`MarketDataProvider`]: the seam to a quote/fundamentals source, with
//!   [`YahooFinanceClient`] as the production implementation
//! - [`SnapshotCache`]: short-lived in-memory cache of fetched data
//! - [`StockAnalyzer`]: resolves free text to a symbol, fetches (retrying
//!   once with the regional suffix when nothing usable comes back) and scores
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_data::{AnalyzerConfig, StockAnalyzer, YahooFinanceClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AnalyzerConfig::default().with_env()?;
//!     let client = YahooFinanceClient::new(&config)?;
//!     let analyzer = StockAnalyzer::new(client, config);
//!
//!     let analysis = analyzer.analyze("petrobras").await?;
//!     println!("{} {} {:.0}/100", analysis.symbol(), analysis.result.tier, analysis.result.score);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use analyzer::{Analysis, StockAnalyzer};
pub use api::YahooFinanceClient;
pub use cache::SnapshotCache;
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, HISTORY_RANGES};
pub use error::{DataError, Result};
pub use provider::{MarketData, MarketDataProvider, PricePoint};
