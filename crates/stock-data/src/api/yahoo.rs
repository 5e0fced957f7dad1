//! Yahoo Finance API client

use crate::config::AnalyzerConfig;
use crate::error::{DataError, Result};
use crate::provider::{MarketData, MarketDataProvider, PricePoint};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use stock_core::QuoteSnapshot;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// quoteSummary modules, in the order their fields take precedence
const MODULES: &[&str] = &[
    "financialData",
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "assetProfile",
];

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    rate_limiter: SharedRateLimiter,
    crumb: Arc<RwLock<Option<String>>>,
    history_range: String,
}

impl YahooFinanceClient {
    /// Create a client honouring the configured timeout, rate limit and history range
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client,
            rate_limiter,
            crumb: Arc::new(RwLock::new(None)),
            history_range: config.history_range.clone(),
        })
    }

    /// Session crumb required by quoteSummary; `None` when Yahoo refuses one
    async fn crumb(&self) -> Option<String> {
        if let Some(crumb) = self.crumb.read().await.clone() {
            return Some(crumb);
        }

        // The cookie endpoint answers 404 but still sets the session cookie.
        if let Err(e) = self.client.get(COOKIE_URL).send().await {
            tracing::warn!("Failed to obtain Yahoo session cookie: {e}");
        }

        let crumb = match self.client.get(CRUMB_URL).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await.ok(),
            Ok(resp) => {
                tracing::warn!("Yahoo crumb request failed: HTTP {}", resp.status());
                None
            }
            Err(e) => {
                tracing::warn!("Yahoo crumb request failed: {e}");
                None
            }
        }
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && !c.contains('<'));

        if let Some(ref c) = crumb {
            *self.crumb.write().await = Some(c.clone());
        }
        crumb
    }

    /// Fetch the flat info map for a symbol.
    ///
    /// Unknown symbols yield `Value::Null` rather than an error.
    pub async fn get_info(&self, symbol: &str) -> Result<Value> {
        let crumb = self.crumb().await;

        self.rate_limiter.until_ready().await;

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let modules = MODULES.join(",");
        let mut request = self.client.get(&url).query(&[("modules", modules.as_str())]);
        if let Some(ref c) = crumb {
            request = request.query(&[("crumb", c.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(symbol, "Yahoo has no quote for symbol");
            return Ok(Value::Null);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Stale crumb; the next call negotiates a new one.
            *self.crumb.write().await = None;
            return Err(DataError::Provider(format!(
                "Yahoo Finance rejected the request for {symbol} (HTTP 401)"
            )));
        }

        if !status.is_success() {
            return Err(DataError::Provider(format!("HTTP error: {status}")));
        }

        let body: Value = response.json().await?;
        flatten_quote_summary(&body)
    }

    /// Get historical closes over the configured range
    pub async fn get_history(&self, symbol: &str) -> Result<Vec<PricePoint>> {
        let end = Utc::now();
        let start = range_start(&self.history_range, end)?;

        let provider =
            yahoo::YahooConnector::new().map_err(|e| DataError::Provider(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::Provider(format!("Invalid end timestamp: {e}")))?;

        self.rate_limiter.until_ready().await;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| DataError::Provider(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::Provider(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| PricePoint {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "Yahoo Finance"
    }

    async fn fetch(&self, symbol: &str) -> Result<MarketData> {
        let info = self.get_info(symbol).await?;
        let snapshot = QuoteSnapshot::from_info(&info)?;

        if !snapshot.has_price() {
            return Ok(MarketData {
                symbol: symbol.to_string(),
                snapshot,
                history: Vec::new(),
            });
        }

        let history = match self.get_history(symbol).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(symbol, "Price history unavailable: {e}");
                Vec::new()
            }
        };

        Ok(MarketData {
            symbol: symbol.to_string(),
            snapshot,
            history,
        })
    }
}

/// Merge the quoteSummary modules into one flat, camelCase info map.
///
/// Earlier modules in [`MODULES`] win on duplicate keys. A Yahoo error
/// object (unknown ticker) yields `Value::Null`.
fn flatten_quote_summary(body: &Value) -> Result<Value> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| DataError::Provider("response has no quoteSummary".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        tracing::debug!("quoteSummary error: {error}");
        return Ok(Value::Null);
    }

    let Some(result) = summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
    else {
        return Ok(Value::Null);
    };

    let mut info = Map::new();
    for module in MODULES {
        if let Some(Value::Object(fields)) = result.get(*module) {
            for (key, value) in fields {
                info.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    // The price module reports the daily change as a fraction.
    if let Some(change) = info.get_mut("regularMarketChangePercent") {
        scale_number(change, 100.0);
    }

    Ok(Value::Object(info))
}

fn scale_number(value: &mut Value, factor: f64) {
    let target = match value {
        Value::Object(wrapper) => match wrapper.get_mut("raw") {
            Some(raw) => raw,
            None => return,
        },
        other => other,
    };
    if let Some(scaled) = target
        .as_f64()
        .and_then(|v| serde_json::Number::from_f64(v * factor))
    {
        *target = Value::Number(scaled);
    }
}

/// Start of a history window ending at `end`
fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match range {
        "1d" => end - chrono::Duration::days(1),
        "5d" => end - chrono::Duration::days(5),
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "5y" => end - chrono::Duration::days(1825),
        "10y" => end - chrono::Duration::days(3650),
        "ytd" => chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .ok_or_else(|| DataError::Config("Invalid year start".to_string()))?,
        "max" => end - chrono::Duration::days(36500), // ~100 years
        _ => return Err(DataError::Config(format!("Invalid range: {range}"))),
    };
    Ok(start)
}
