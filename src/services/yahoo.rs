//! Yahoo Finance client: daily bar history and market capitalization.
//!
//! Two public endpoints are used:
//! - `/v8/finance/chart/{symbol}?range={n}d&interval=1d` for OHLCV bars
//! - `/v7/finance/quote?symbols={symbol}` for capitalization
//!
//! Both return JSON whose shape drifts over time, so responses are walked
//! as `serde_json::Value` and individual null entries are skipped instead
//! of failing the whole series.

use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::models::{normalize_series, Bar};
use crate::services::providers::{MarketCapProvider, PriceHistoryProvider};
use chrono::DateTime;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";

#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    chart_url: String,
    quote_url: String,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            chart_url: DEFAULT_CHART_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "Fetching");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Network(format!(
                "Request failed with status {}: {}",
                status, url
            )));
        }
        let json: Value = response.json().await?;
        Ok(json)
    }

    async fn fetch_chart(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/{}?range={}d&interval=1d",
            self.chart_url, symbol, lookback_days
        );
        let json = self.fetch_json(&url).await?;
        parse_chart(symbol, &json)
    }

    async fn fetch_market_cap(&self, symbol: &str) -> Result<u64> {
        let url = format!("{}?symbols={}", self.quote_url, symbol);
        let json = self.fetch_json(&url).await?;
        parse_market_cap(&json)
    }
}

impl PriceHistoryProvider for YahooClient {
    async fn get_bars(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>> {
        self.fetch_chart(symbol, lookback_days).await
    }
}

impl MarketCapProvider for YahooClient {
    async fn market_cap(&self, symbol: &str) -> Result<u64> {
        self.fetch_market_cap(symbol).await
    }
}

/// Extract a bar series from a chart response. Entries with any null
/// field (halted sessions, partial rows) are skipped.
fn parse_chart(symbol: &str, json: &Value) -> Result<Vec<Bar>> {
    let result = json
        .pointer("/chart/result/0")
        .ok_or_else(|| AppError::NoData(format!("No chart result for {}", symbol)))?;

    let timestamps = result
        .pointer("/timestamp")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::NoData(format!("No timestamps for {}", symbol)))?;

    let quote = result
        .pointer("/indicators/quote/0")
        .ok_or_else(|| AppError::Parse(format!("No quote block for {}", symbol)))?;

    let opens = quote_field(quote, "open")?;
    let highs = quote_field(quote, "high")?;
    let lows = quote_field(quote, "low")?;
    let closes = quote_field(quote, "close")?;
    let volumes = quote_field(quote, "volume")?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let (Some(ts), Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            ts.as_i64(),
            opens.get(i).and_then(Value::as_f64),
            highs.get(i).and_then(Value::as_f64),
            lows.get(i).and_then(Value::as_f64),
            closes.get(i).and_then(Value::as_f64),
            volumes.get(i).and_then(Value::as_u64),
        ) else {
            continue;
        };

        let Some(datetime) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        bars.push(Bar::new(datetime.date_naive(), open, high, low, close, volume));
    }

    if bars.is_empty() {
        return Err(AppError::NoData(format!("Empty bar series for {}", symbol)));
    }
    Ok(normalize_series(bars))
}

fn quote_field<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    quote
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Parse(format!("Missing quote field {}", name)))
}

/// Market cap from a quote response; zero when the field is absent.
fn parse_market_cap(json: &Value) -> Result<u64> {
    let result = json
        .pointer("/quoteResponse/result/0")
        .ok_or_else(|| AppError::NoData("Empty quote response".to_string()))?;
    Ok(result
        .get("marketCap")
        .and_then(Value::as_u64)
        .unwrap_or(0))
}
