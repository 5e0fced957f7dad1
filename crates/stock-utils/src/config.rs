//! Environment-variable configuration helpers

use std::str::FromStr;
use thiserror::Error;

/// Error raised when an environment variable holds an unparsable value
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {name}: {value:?}")]
pub struct EnvError {
    pub name: String,
    pub value: String,
}

/// Read a non-empty, trimmed string variable
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable; unset or empty yields `Ok(None)`
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, EnvError> {
    match env_string(name) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| EnvError {
            name: name.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_missing_is_none() {
        let parsed: Result<Option<u64>, _> = env_parse("STOCK_UTILS_TEST_SURELY_UNSET_VAR");
        assert_eq!(parsed, Ok(None));
        assert!(env_string("STOCK_UTILS_TEST_SURELY_UNSET_VAR").is_none());
    }

    #[test]
    fn test_env_error_display() {
        let err = EnvError {
            name: "STOCK_PANEL_TIMEOUT_SECS".to_string(),
            value: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for STOCK_PANEL_TIMEOUT_SECS: \"soon\""
        );
    }
}
