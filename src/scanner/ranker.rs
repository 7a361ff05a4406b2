//! Sector grouping and market-cap ranking of scan hits.
//!
//! Sector buckets are capped at `top_n` entries ordered by capitalization
//! descending (ties broken by symbol ascending, so ranking is
//! deterministic). Symbols with unknown or zero capitalization cannot be
//! meaningfully ranked and are dropped from sector buckets, but the
//! favorites track keeps them: a curated watchlist is never silently
//! trimmed by a capitalization cutoff.

use crate::models::SignalHit;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ranked scan output: sector buckets plus the uncapped favorites track.
#[derive(Debug, Clone, Default)]
pub struct RankedResults {
    pub sectors: BTreeMap<String, Vec<SignalHit>>,
    pub favorites: Vec<SignalHit>,
}

impl RankedResults {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty() && self.favorites.is_empty()
    }

    /// Symbols appearing anywhere in the report, deduplicated.
    pub fn reported_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .sectors
            .values()
            .flatten()
            .chain(self.favorites.iter())
            .map(|h| h.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

/// Group hits by sector and cap each bucket at `top_n`.
pub fn rank(hits: &[SignalHit], top_n: usize) -> RankedResults {
    let mut sectors: BTreeMap<String, Vec<SignalHit>> = BTreeMap::new();

    for hit in hits {
        if hit.conditions.is_empty() {
            continue;
        }
        if hit.cap_for_ranking() == 0 {
            continue;
        }
        sectors.entry(hit.sector.clone()).or_default().push(hit.clone());
    }

    for bucket in sectors.values_mut() {
        bucket.sort_by(compare_for_ranking);
        bucket.truncate(top_n);
    }

    let mut favorites: Vec<SignalHit> = hits
        .iter()
        .filter(|h| h.is_favorite && !h.conditions.is_empty())
        .cloned()
        .collect();
    favorites.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    RankedResults { sectors, favorites }
}

/// Capitalization descending, symbol ascending on ties.
fn compare_for_ranking(a: &SignalHit, b: &SignalHit) -> Ordering {
    b.cap_for_ranking()
        .cmp(&a.cap_for_ranking())
        .then_with(|| a.symbol.cmp(&b.symbol))
}
