//! One scan pass: universe in, notification out.
//!
//! Per-symbol work (fetch, indicator computation, condition evaluation) is
//! pure and independent, so symbols are evaluated in small concurrent
//! groups. Every per-symbol failure is absorbed at one boundary and
//! becomes "no signal for this symbol this run"; only universe and
//! configuration failures surface as run-level errors.

use crate::config::ScanConfig;
use crate::constants::{CONCURRENT_FETCHES, MIN_BARS_FOR_SIGNALS};
use crate::error::Result;
use crate::models::{Bar, SignalHit, UniverseItem};
use crate::report;
use crate::scanner::conditions::{self, EvalParams};
use crate::scanner::indicators;
use crate::scanner::ranker;
use crate::services::providers::{
    MarketCapProvider, NotificationSink, PriceHistoryProvider, UniverseProvider,
};
use crate::state::AlertStore;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Outcome of one scan pass.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// Symbols in the universe.
    pub scanned: usize,
    /// Symbols whose provider calls failed (treated as no signal).
    pub failed: usize,
    /// Symbols with at least one satisfied condition before dedup.
    pub hits: usize,
    /// Hits suppressed because they were already alerted today.
    pub suppressed: usize,
    /// Symbols that made it into the delivered report.
    pub notified: Vec<String>,
    /// Whether the report reached the notification sink.
    pub delivered: bool,
    /// The rendered report text.
    pub report: String,
}

/// Run-scoped memo for market-cap lookups. Injected per scan so runs stay
/// independently testable; errors are memoized too, to avoid hammering a
/// failing provider inside one pass.
#[derive(Debug, Default)]
struct RunCache {
    caps: HashMap<String, Option<u64>>,
}

pub struct ScanEngine<P, M, U, N> {
    price: P,
    caps: M,
    universe: U,
    sink: N,
    config: ScanConfig,
}

impl<P, M, U, N> ScanEngine<P, M, U, N>
where
    P: PriceHistoryProvider,
    M: MarketCapProvider,
    U: UniverseProvider,
    N: NotificationSink,
{
    pub fn new(price: P, caps: M, universe: U, sink: N, config: ScanConfig) -> Self {
        Self {
            price,
            caps,
            universe,
            sink,
            config,
        }
    }

    /// Run one scan pass. On a run-level failure a short failure notice is
    /// sent best-effort before the error is returned.
    pub async fn run(&self, force: bool, now: DateTime<Utc>) -> Result<ScanSummary> {
        match self.run_inner(force, now).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                error!(error = %e, "Scan failed");
                let notice = format!("🚨 Scan failed: {}", e);
                if let Err(send_err) = self.sink.send_text(&notice).await {
                    error!(error = %send_err, "Could not deliver failure notice");
                }
                Err(e)
            }
        }
    }

    async fn run_inner(&self, force: bool, now: DateTime<Utc>) -> Result<ScanSummary> {
        let universe = self.universe.list_universe().await?;
        info!(
            symbols = universe.len(),
            favorites = universe.favorites().len(),
            force,
            "Starting scan"
        );

        let mut store = AlertStore::open(&self.config.state_path, now.date_naive());

        // Evaluate the whole universe in small concurrent groups.
        let mut hits: Vec<SignalHit> = Vec::new();
        let mut failed = 0usize;
        for group in universe.items().chunks(CONCURRENT_FETCHES) {
            let results = join_all(
                group
                    .iter()
                    .map(|item| self.evaluate_symbol(item, universe.is_favorite(&item.symbol))),
            )
            .await;

            for (item, result) in group.iter().zip(results) {
                match result {
                    Ok(Some(hit)) => hits.push(hit),
                    Ok(None) => {}
                    Err(e) => {
                        failed += 1;
                        debug!(symbol = %item.symbol, error = %e, "Symbol skipped");
                    }
                }
            }
        }
        let hit_count = hits.len();
        info!(hits = hit_count, failed, "Evaluation finished");

        // Drop symbols already alerted today. A forced run bypasses the
        // store entirely, reads and writes both.
        let before = hits.len();
        if !force {
            hits.retain(|h| store.should_alert(&h.symbol));
        }
        let suppressed = before - hits.len();

        // Capitalization enrichment through a run-scoped cache.
        let mut cache = RunCache::default();
        for hit in &mut hits {
            hit.market_cap = self.lookup_cap(&mut cache, &hit.symbol).await;
        }

        let ranked = ranker::rank(&hits, self.config.top_n);
        let notified = ranked.reported_symbols();
        let report = report::format_report(now, &ranked);

        let delivered = match self.sink.send_text(&report).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Report delivery failed");
                false
            }
        };

        if delivered && !force {
            for symbol in &notified {
                store.mark_alerted(symbol);
            }
            if let Err(e) = store.save() {
                warn!(error = %e, "Could not persist alert state");
            }
        }

        Ok(ScanSummary {
            scanned: universe.len(),
            failed,
            hits: hit_count,
            suppressed,
            notified,
            delivered,
            report,
        })
    }

    /// The per-symbol boundary: everything that can fail for one symbol is
    /// contained here and surfaces as `Err`, which the caller counts and
    /// drops. `Ok(None)` means no data or no signal.
    async fn evaluate_symbol(
        &self,
        item: &UniverseItem,
        is_favorite: bool,
    ) -> Result<Option<SignalHit>> {
        let bars = self
            .price
            .get_bars(&item.symbol, self.config.lookback_days)
            .await?;

        if bars.len() < MIN_BARS_FOR_SIGNALS {
            debug!(symbol = %item.symbol, bars = bars.len(), "Insufficient history");
            return Ok(None);
        }

        let frame = indicators::compute(&bars);
        let params = EvalParams {
            volume_multiplier: self.config.volume_multiplier,
        };
        let satisfied = conditions::evaluate(&frame, &params);
        if satisfied.is_empty() {
            return Ok(None);
        }

        Ok(Some(SignalHit {
            symbol: item.symbol.clone(),
            name: item.name.clone(),
            sector: item.sector.clone(),
            conditions: satisfied,
            market_cap: None,
            change_pct: change_percent(&bars),
            is_favorite,
        }))
    }

    async fn lookup_cap(&self, cache: &mut RunCache, symbol: &str) -> Option<u64> {
        if let Some(cached) = cache.caps.get(symbol) {
            return *cached;
        }
        let cap = match self.caps.market_cap(symbol).await {
            Ok(cap) => Some(cap),
            Err(e) => {
                debug!(symbol = %symbol, error = %e, "Market cap unavailable");
                None
            }
        };
        cache.caps.insert(symbol.to_string(), cap);
        cap
    }
}

/// Close-over-close change of the newest bar, in percent.
fn change_percent(bars: &[Bar]) -> Option<f64> {
    let n = bars.len();
    if n < 2 {
        return None;
    }
    let prev = bars[n - 2].close;
    if prev <= 0.0 {
        return None;
    }
    Some((bars[n - 1].close - prev) / prev * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Universe, UniverseItem};
    use chrono::NaiveDate;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakePrices {
        series: HashMap<String, Vec<Bar>>,
    }

    impl PriceHistoryProvider for FakePrices {
        async fn get_bars(&self, symbol: &str, _lookback_days: u32) -> Result<Vec<Bar>> {
            self.series
                .get(symbol)
                .cloned()
                .ok_or_else(|| AppError::NoData(format!("no series for {}", symbol)))
        }
    }

    #[derive(Clone, Default)]
    struct FakeCaps {
        caps: HashMap<String, u64>,
    }

    impl MarketCapProvider for FakeCaps {
        async fn market_cap(&self, symbol: &str) -> Result<u64> {
            Ok(*self.caps.get(symbol).unwrap_or(&0))
        }
    }

    #[derive(Clone)]
    struct FakeUniverse {
        universe: Universe,
    }

    impl UniverseProvider for FakeUniverse {
        async fn list_universe(&self) -> Result<Universe> {
            Ok(self.universe.clone())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl NotificationSink for RecordingSink {
        async fn send_text(&self, message: &str) -> Result<()> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }

        async fn send_text_with_image(&self, message: &str, _image: &[u8]) -> Result<()> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(i as i64)
    }

    /// Flat series ending in a canonical lower-band rebound.
    fn rebound_series() -> Vec<Bar> {
        let mut bars: Vec<Bar> = (0..24)
            .map(|i| Bar::new(date(i), 100.0, 100.0, 100.0, 100.0, 1000))
            .collect();
        bars.push(Bar::new(date(24), 100.2, 101.5, 100.0, 101.0, 1000));
        bars
    }

    /// Gently declining series that triggers nothing: the close never
    /// exceeds the prior rolling high and stays above the lower band.
    fn quiet_series() -> Vec<Bar> {
        (0..30)
            .map(|i| {
                let close = 100.0 - i as f64 * 0.1;
                Bar::new(date(i), close, close + 0.2, close - 0.05, close, 1000)
            })
            .collect()
    }

    fn universe_of(items: Vec<UniverseItem>, favorites: &[&str]) -> FakeUniverse {
        FakeUniverse {
            universe: Universe::from_items(
                items,
                favorites.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            ),
        }
    }

    fn config_with_state(dir: &tempfile::TempDir) -> ScanConfig {
        ScanConfig {
            state_path: dir.path().join("alert_state.json"),
            ..ScanConfig::default()
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-07T13:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_zero_hits_sends_exactly_one_message() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::default();
        let sent = sink.sent.clone();

        let engine = ScanEngine::new(
            FakePrices {
                series: HashMap::from([("AAPL".to_string(), quiet_series())]),
            },
            FakeCaps::default(),
            universe_of(vec![UniverseItem::new("AAPL", "Apple", "TECH")], &[]),
            sink,
            config_with_state(&dir),
        );

        let summary = engine.run(false, now()).await.unwrap();
        assert_eq!(summary.hits, 0);
        assert!(summary.delivered);

        let messages = sent.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("No symbols matched"));
    }

    #[tokio::test]
    async fn test_zero_cap_favorite_is_reported_and_marked() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::default();
        let sent = sink.sent.clone();
        let config = config_with_state(&dir);
        let state_path = config.state_path.clone();

        let engine = ScanEngine::new(
            FakePrices {
                series: HashMap::from([("GDXU".to_string(), rebound_series())]),
            },
            FakeCaps::default(), // every cap resolves to 0 = unknown
            universe_of(
                vec![UniverseItem::new("GDXU", "GDXU", "COMMODITY_GOLD")],
                &["GDXU"],
            ),
            sink,
            config,
        );

        let summary = engine.run(false, now()).await.unwrap();
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.notified, vec!["GDXU"]);

        let messages = sent.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("⭐ Favorites"));
        assert!(messages[0].contains("GDXU"));

        // The store remembers the notification for the rest of the day.
        let store = AlertStore::open(&state_path, now().date_naive());
        assert!(!store.should_alert("GDXU"));
    }

    #[tokio::test]
    async fn test_already_alerted_symbol_is_suppressed_until_forced() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_state(&dir);

        let mut store = AlertStore::open(&config.state_path, now().date_naive());
        store.mark_alerted("NVDA");
        store.save().unwrap();

        let sink = RecordingSink::default();
        let sent = sink.sent.clone();
        let engine = ScanEngine::new(
            FakePrices {
                series: HashMap::from([("NVDA".to_string(), rebound_series())]),
            },
            FakeCaps {
                caps: HashMap::from([("NVDA".to_string(), 1_000_000u64)]),
            },
            universe_of(
                vec![UniverseItem::new("NVDA", "NVIDIA", "SEMICONDUCTOR_FABLESS")],
                &[],
            ),
            sink,
            config,
        );

        let summary = engine.run(false, now()).await.unwrap();
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.suppressed, 1);
        assert!(summary.notified.is_empty());
        assert!(sent.lock().unwrap()[0].contains("No symbols matched"));

        // A forced run bypasses the store and reports the symbol again.
        let summary = engine.run(true, now()).await.unwrap();
        assert_eq!(summary.suppressed, 0);
        assert_eq!(summary.notified, vec!["NVDA"]);
        assert!(sent.lock().unwrap()[1].contains("NVDA"));
    }

    #[tokio::test]
    async fn test_provider_failure_does_not_abort_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::default();
        let sent = sink.sent.clone();

        let engine = ScanEngine::new(
            // BROKEN has no series, so its fetch errors.
            FakePrices {
                series: HashMap::from([("NVDA".to_string(), rebound_series())]),
            },
            FakeCaps {
                caps: HashMap::from([("NVDA".to_string(), 1_000_000u64)]),
            },
            universe_of(
                vec![
                    UniverseItem::new("BROKEN", "Broken", "TECH"),
                    UniverseItem::new("NVDA", "NVIDIA", "SEMICONDUCTOR_FABLESS"),
                ],
                &[],
            ),
            sink,
            config_with_state(&dir),
        );

        let summary = engine.run(false, now()).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.notified, vec!["NVDA"]);
        assert!(sent.lock().unwrap()[0].contains("NVDA"));
    }

    #[test]
    fn test_change_percent() {
        let bars = rebound_series();
        let pct = change_percent(&bars).unwrap();
        assert!((pct - 1.0).abs() < 1e-9);
        assert_eq!(change_percent(&bars[..1]), None);
    }
}
