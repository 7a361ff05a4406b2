//! Provider seams for the scan engine.
//!
//! The engine is generic over these traits so the pipeline can be
//! exercised with in-memory fakes. Production implementations live in the
//! sibling modules. Empty data and per-symbol failures are expected
//! outcomes for the history and market-cap providers; the engine absorbs
//! them at the symbol boundary.

use crate::error::Result;
use crate::models::{Bar, Universe};
use std::future::Future;

/// Historical daily bars for one symbol.
pub trait PriceHistoryProvider {
    fn get_bars(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> impl Future<Output = Result<Vec<Bar>>> + Send;
}

/// Market capitalization lookup. Zero means unknown.
pub trait MarketCapProvider {
    fn market_cap(&self, symbol: &str) -> impl Future<Output = Result<u64>> + Send;
}

/// The scan universe: all items plus the curated favorites subset.
pub trait UniverseProvider {
    fn list_universe(&self) -> impl Future<Output = Result<Universe>> + Send;
}

/// Delivery of the rendered report to the operator.
pub trait NotificationSink {
    fn send_text(&self, message: &str) -> impl Future<Output = Result<()>> + Send;

    fn send_text_with_image(
        &self,
        message: &str,
        image: &[u8],
    ) -> impl Future<Output = Result<()>> + Send;
}
