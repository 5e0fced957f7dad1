//! Error types for the scoring core

use thiserror::Error;

/// Errors raised while validating snapshot data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A numeric field is non-numeric or outside its domain
    #[error("Invalid field {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Validation { field, .. } => field,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("fiftyTwoWeekHigh", "must not be negative, got -3");
        assert_eq!(
            err.to_string(),
            "Invalid field fiftyTwoWeekHigh: must not be negative, got -3"
        );
        assert_eq!(err.field(), "fiftyTwoWeekHigh");
    }
}
