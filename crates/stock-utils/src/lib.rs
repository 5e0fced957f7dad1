//! Shared utilities for stock-panel
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-variable configuration helpers.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_parse, env_string};
pub use logging::init_tracing;
