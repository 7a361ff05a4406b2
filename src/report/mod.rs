//! Human-readable report rendering.
//!
//! The rendered text is never empty: a scan with zero hits still produces
//! an explicit no-matches message, because the operator reads message
//! receipt as a liveness signal for the whole pipeline.

use crate::models::SignalHit;
use crate::scanner::ranker::RankedResults;
use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use std::fmt::Write;

/// Render the full scan report.
pub fn format_report(now: DateTime<Utc>, ranked: &RankedResults) -> String {
    let mut out = String::new();
    let local = now.with_timezone(&New_York);
    let _ = writeln!(
        out,
        "📡 Signal scan {} UTC ({} New York)",
        now.format("%Y-%m-%d %H:%M"),
        local.format("%H:%M")
    );

    if ranked.is_empty() {
        out.push('\n');
        out.push_str("✅ No symbols matched today's conditions.");
        return out;
    }

    for (sector, hits) in &ranked.sectors {
        let _ = writeln!(out, "\n🏭 {}", sector);
        for hit in hits {
            push_hit_lines(&mut out, hit);
        }
    }

    if !ranked.favorites.is_empty() {
        let _ = writeln!(out, "\n⭐ Favorites");
        for hit in &ranked.favorites {
            push_hit_lines(&mut out, hit);
        }
    }

    out.trim_end().to_string()
}

fn push_hit_lines(out: &mut String, hit: &SignalHit) {
    let _ = writeln!(
        out,
        "  • {}  {}  {}",
        hit.symbol,
        hit.name,
        format_change(hit.change_pct)
    );
    let labels: Vec<String> = hit
        .conditions
        .iter()
        .map(|c| format!("{} {}", c.code(), c.label()))
        .collect();
    if !labels.is_empty() {
        let _ = writeln!(out, "    ↳ {}", labels.join(", "));
    }
}

fn format_change(change_pct: Option<f64>) -> String {
    match change_pct {
        Some(pct) => format!("{:+.1}%", pct),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;
    use crate::scanner::ranker::RankedResults;
    use std::collections::{BTreeMap, BTreeSet};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-07T13:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn hit(symbol: &str, sector: &str, favorite: bool) -> SignalHit {
        SignalHit {
            symbol: symbol.to_string(),
            name: format!("{} Name", symbol),
            sector: sector.to_string(),
            conditions: BTreeSet::from([Condition::Touch, Condition::Rebound]),
            market_cap: Some(1_000_000),
            change_pct: Some(1.234),
            is_favorite: favorite,
        }
    }

    #[test]
    fn test_zero_hits_still_produces_a_message() {
        let report = format_report(now(), &RankedResults::default());
        assert!(!report.is_empty());
        assert!(report.contains("No symbols matched"));
    }

    #[test]
    fn test_sector_blocks_and_condition_labels() {
        let mut sectors = BTreeMap::new();
        sectors.insert("TECH".to_string(), vec![hit("NVDA", "TECH", false)]);
        let ranked = RankedResults {
            sectors,
            favorites: vec![],
        };
        let report = format_report(now(), &ranked);
        assert!(report.contains("🏭 TECH"));
        assert!(report.contains("NVDA"));
        assert!(report.contains("+1.2%"));
        assert!(report.contains("C1 Bollinger rebound"));
        assert!(!report.contains("No symbols matched"));
    }

    #[test]
    fn test_favorites_block_is_distinct() {
        let ranked = RankedResults {
            sectors: BTreeMap::new(),
            favorites: vec![hit("AAPL", "TECH", true)],
        };
        let report = format_report(now(), &ranked);
        assert!(report.contains("⭐ Favorites"));
        assert!(report.contains("AAPL"));
    }

    #[test]
    fn test_unknown_change_renders_as_na() {
        let mut favorite = hit("GLD", "COMMODITY_GOLD", true);
        favorite.change_pct = None;
        let ranked = RankedResults {
            sectors: BTreeMap::new(),
            favorites: vec![favorite],
        };
        let report = format_report(now(), &ranked);
        assert!(report.contains("n/a"));
    }
}
