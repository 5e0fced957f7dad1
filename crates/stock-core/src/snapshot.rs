//! Normalised quote and fundamentals snapshot

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quote and fundamentals data for one symbol.
///
/// Every field is optional; providers routinely omit some of them. Fractions
/// (`dividend_yield`, `revenue_growth`, `profit_margins`) are not percents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    // Scoring inputs
    #[serde(default, rename = "trailingPE", skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,
    #[serde(default, rename = "forwardPE", skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_market_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margins: Option<f64>,

    // Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_time_employees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_business_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_market_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_market_change_percent: Option<f64>,
}

/// Treat zero like a missing value
fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Read a numeric key, unwrapping Yahoo's `{ "raw": .., "fmt": .. }` objects.
fn number(info: &Value, key: &'static str) -> Result<Option<f64>> {
    let value = match info.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(wrapper)) if wrapper.is_empty() => return Ok(None),
        Some(Value::Object(wrapper)) => match wrapper.get("raw") {
            Some(Value::Null) => return Ok(None),
            Some(raw) => raw,
            None => return Err(CoreError::validation(key, "object without a raw value")),
        },
        Some(other) => other,
    };

    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| CoreError::validation(key, format!("not representable as f64: {n}"))),
        other => Err(CoreError::validation(
            key,
            format!("expected a number, got {other}"),
        )),
    }
}

/// Read a text key; non-string values are rendered as text
fn text(info: &Value, key: &str) -> Option<String> {
    match info.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(wrapper) => wrapper
            .get("fmt")
            .or_else(|| wrapper.get("raw"))
            .and_then(|v| v.as_str().map(str::to_string)),
        other => Some(other.to_string()),
    }
}

impl QuoteSnapshot {
    /// Build a snapshot from a flat, camelCase info map.
    ///
    /// Absent keys and `null` become `None`. A numeric key holding anything
    /// other than a number fails with a validation error naming that key.
    pub fn from_info(info: &Value) -> Result<Self> {
        if !info.is_object() && !info.is_null() {
            return Err(CoreError::validation("info", "expected a JSON object"));
        }

        Ok(Self {
            trailing_pe: number(info, "trailingPE")?,
            forward_pe: number(info, "forwardPE")?,
            fifty_two_week_low: number(info, "fiftyTwoWeekLow")?,
            fifty_two_week_high: number(info, "fiftyTwoWeekHigh")?,
            current_price: number(info, "currentPrice")?,
            regular_market_price: number(info, "regularMarketPrice")?,
            dividend_yield: number(info, "dividendYield")?,
            revenue_growth: number(info, "revenueGrowth")?,
            profit_margins: number(info, "profitMargins")?,
            long_name: text(info, "longName"),
            short_name: text(info, "shortName"),
            sector: text(info, "sector"),
            industry: text(info, "industry"),
            country: text(info, "country"),
            currency: text(info, "currency"),
            full_time_employees: number(info, "fullTimeEmployees")?,
            website: text(info, "website"),
            long_business_summary: text(info, "longBusinessSummary"),
            market_cap: number(info, "marketCap")?,
            regular_market_volume: number(info, "regularMarketVolume")?,
            regular_market_change_percent: number(info, "regularMarketChangePercent")?,
        })
    }

    /// Current price, falling back to the regular market price
    pub fn price(&self) -> Option<f64> {
        non_zero(self.current_price).or_else(|| non_zero(self.regular_market_price))
    }

    /// Whether the snapshot carries a usable price
    pub fn has_price(&self) -> bool {
        self.price().is_some()
    }

    /// Trailing P/E, falling back to forward P/E
    pub fn pe_ratio(&self) -> Option<f64> {
        non_zero(self.trailing_pe).or_else(|| non_zero(self.forward_pe))
    }

    /// Company name for display, falling back to the symbol
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or(symbol)
    }

    /// Check that every present numeric field is finite and in its domain
    pub fn validate(&self) -> Result<()> {
        let signed = [
            ("trailingPE", self.trailing_pe),
            ("forwardPE", self.forward_pe),
            ("dividendYield", self.dividend_yield),
            ("revenueGrowth", self.revenue_growth),
            ("profitMargins", self.profit_margins),
            ("regularMarketChangePercent", self.regular_market_change_percent),
        ];
        let non_negative = [
            ("fiftyTwoWeekLow", self.fifty_two_week_low),
            ("fiftyTwoWeekHigh", self.fifty_two_week_high),
            ("currentPrice", self.current_price),
            ("regularMarketPrice", self.regular_market_price),
            ("marketCap", self.market_cap),
            ("regularMarketVolume", self.regular_market_volume),
            ("fullTimeEmployees", self.full_time_employees),
        ];

        for (field, value) in signed.into_iter().chain(non_negative) {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CoreError::validation(field, format!("not a finite number: {v}")));
                }
            }
        }

        for (field, value) in non_negative {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(CoreError::validation(
                        field,
                        format!("must not be negative, got {v}"),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_info_reads_flat_map() {
        let info = json!({
            "trailingPE": 12.5,
            "fiftyTwoWeekLow": 100,
            "fiftyTwoWeekHigh": 200.0,
            "currentPrice": 150.0,
            "dividendYield": 0.031,
            "longName": "Petróleo Brasileiro S.A.",
            "currency": "BRL",
            "fullTimeEmployees": 41000,
            "website": null
        });

        let snapshot = QuoteSnapshot::from_info(&info).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(12.5));
        assert_eq!(snapshot.fifty_two_week_low, Some(100.0));
        assert_eq!(snapshot.price(), Some(150.0));
        assert_eq!(snapshot.currency.as_deref(), Some("BRL"));
        assert_eq!(snapshot.full_time_employees, Some(41000.0));
        assert!(snapshot.website.is_none());
        assert!(snapshot.forward_pe.is_none());
    }

    #[test]
    fn test_from_info_unwraps_raw_objects() {
        let info = json!({
            "trailingPE": { "raw": 31.2, "fmt": "31.20" },
            "profitMargins": { "raw": 0.24, "fmt": "24.00%" },
            "forwardPE": {},
            "sector": "Technology"
        });

        let snapshot = QuoteSnapshot::from_info(&info).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(31.2));
        assert_eq!(snapshot.profit_margins, Some(0.24));
        assert!(snapshot.forward_pe.is_none());
        assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn test_from_info_rejects_non_numeric_field() {
        let err = QuoteSnapshot::from_info(&json!({ "trailingPE": "abc" })).unwrap_err();
        assert_eq!(err.field(), "trailingPE");

        let err = QuoteSnapshot::from_info(&json!({ "revenueGrowth": true })).unwrap_err();
        assert_eq!(err.field(), "revenueGrowth");

        let err =
            QuoteSnapshot::from_info(&json!({ "marketCap": { "fmt": "2.1T" } })).unwrap_err();
        assert_eq!(err.field(), "marketCap");
    }

    #[test]
    fn test_from_info_accepts_null_document() {
        let snapshot = QuoteSnapshot::from_info(&Value::Null).unwrap();
        assert_eq!(snapshot, QuoteSnapshot::default());
        assert!(QuoteSnapshot::from_info(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_price_and_pe_fallbacks() {
        let snapshot = QuoteSnapshot {
            current_price: Some(0.0),
            regular_market_price: Some(42.0),
            trailing_pe: None,
            forward_pe: Some(18.0),
            ..Default::default()
        };
        assert_eq!(snapshot.price(), Some(42.0));
        assert_eq!(snapshot.pe_ratio(), Some(18.0));
        assert!(snapshot.has_price());
        assert!(!QuoteSnapshot::default().has_price());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut snapshot = QuoteSnapshot::default();
        assert_eq!(snapshot.display_name("AAPL"), "AAPL");
        snapshot.short_name = Some("Apple".to_string());
        assert_eq!(snapshot.display_name("AAPL"), "Apple");
        snapshot.long_name = Some("Apple Inc.".to_string());
        assert_eq!(snapshot.display_name("AAPL"), "Apple Inc.");
    }

    #[test]
    fn test_validate_rejects_out_of_domain_values() {
        let snapshot = QuoteSnapshot {
            fifty_two_week_high: Some(-3.0),
            ..Default::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.field(), "fiftyTwoWeekHigh");

        let snapshot = QuoteSnapshot {
            trailing_pe: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(snapshot.validate().unwrap_err().field(), "trailingPE");

        let snapshot = QuoteSnapshot {
            trailing_pe: Some(-8.0),
            revenue_growth: Some(-0.3),
            ..Default::default()
        };
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_serde_uses_camel_case_and_skips_none() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(10.0),
            fifty_two_week_low: Some(1.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, json!({ "trailingPE": 10.0, "fiftyTwoWeekLow": 1.0 }));
    }
}
