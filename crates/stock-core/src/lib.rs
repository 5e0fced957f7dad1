//! Core decision logic for stock-panel
//!
//! Two pure components live here:
//!
//! - [`resolver`]: maps a free-text company name to a ticker symbol using a
//!   fixed, ordered alias table, falling back to the input as a literal ticker.
//! - [`scoring`]: turns a [`QuoteSnapshot`] into a [`ScoreResult`] with a
//!   clamped 0-100 score, a [`Tier`] and the list of contributing factors.
//!
//! Neither component performs I/O. Fetching snapshots and rendering results
//! belong to `stock-data` and `stock-cli`.
//!
//! # Example
//!
//! ```rust
//! use stock_core::{QuoteSnapshot, Tier, resolve, score};
//!
//! assert_eq!(resolve(" apple "), "AAPL");
//!
//! let snapshot = QuoteSnapshot {
//!     trailing_pe: Some(50.0),
//!     revenue_growth: Some(-0.05),
//!     profit_margins: Some(-0.10),
//!     ..Default::default()
//! };
//! let result = score(&snapshot)?;
//! assert_eq!(result.tier, Tier::Avoid);
//! # Ok::<(), stock_core::CoreError>(())
//! ```

pub mod error;
pub mod resolver;
pub mod scoring;
pub mod snapshot;

pub use error::{CoreError, Result};
pub use resolver::{known_symbols, resolve};
pub use scoring::{Factor, FactorKind, ScoreResult, Signal, Tier, score};
pub use snapshot::QuoteSnapshot;
