//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum DataError {
    /// No usable snapshot for the query, even after the suffix retry
    #[error("No market data found for '{query}'")]
    NotFound { query: String },

    /// The provider answered with something unusable
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot failed validation
    #[error(transparent)]
    Core(#[from] stock_core::CoreError),
}

impl DataError {
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<stock_utils::EnvError> for DataError {
    fn from(err: stock_utils::EnvError) -> Self {
        DataError::Config(err.to_string())
    }
}

/// Result type alias for market data operations
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::not_found("xyz");
        assert_eq!(err.to_string(), "No market data found for 'xyz'");
        assert!(err.is_not_found());

        let err = DataError::Config("bad suffix".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad suffix");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_conversion() {
        let core = stock_core::QuoteSnapshot {
            fifty_two_week_low: Some(-1.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        let err: DataError = core.into();
        assert!(err.to_string().contains("fiftyTwoWeekLow"));

        let env = stock_utils::EnvError {
            name: "STOCK_PANEL_RATE_LIMIT".to_string(),
            value: "many".to_string(),
        };
        let err: DataError = env.into();
        assert!(matches!(err, DataError::Config(msg) if msg.contains("STOCK_PANEL_RATE_LIMIT")));
    }
}
