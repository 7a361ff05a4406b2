use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named trigger conditions. The ordering (and the stable `code`) follows
/// signal strength: a touch is the weakest signal, the rebound family
/// requires a touch-and-recover on consecutive bars, breakout is
/// independent of the band logic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Condition {
    /// Most recent bar's low at or below the lower Bollinger band.
    Touch,
    /// Previous close at or below its lower band, current close back above
    /// both the previous close and the current lower band.
    Rebound,
    /// Rebound with volume at or above the prior volume MA times the surge
    /// multiplier.
    ReboundVolume,
    /// Rebound with the close inside the 38.2%-61.8% retracement band of
    /// the trailing high/low range.
    ReboundFibonacci,
    /// Close above the prior rolling 90-bar close high.
    Breakout,
}

impl Condition {
    /// Stable short code used in logs and the report.
    pub fn code(&self) -> &'static str {
        match self {
            Condition::Touch => "C0",
            Condition::Rebound => "C1",
            Condition::ReboundVolume => "C2",
            Condition::ReboundFibonacci => "C3",
            Condition::Breakout => "C4",
        }
    }

    /// Human-readable label for the report.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Touch => "lower-band touch",
            Condition::Rebound => "Bollinger rebound",
            Condition::ReboundVolume => "rebound + volume surge",
            Condition::ReboundFibonacci => "rebound + Fibonacci band",
            Condition::Breakout => "90-bar breakout",
        }
    }
}

/// One symbol's outcome for a single scan run. Produced fresh each run and
/// never persisted; only the symbol name reaches the dedup store.
#[derive(Debug, Clone)]
pub struct SignalHit {
    pub symbol: String,

    /// Display name (cleaned company name, or the symbol when unknown).
    pub name: String,

    /// Sector/theme bucket the symbol was assigned to for this run.
    pub sector: String,

    /// Satisfied conditions, ordered by code.
    pub conditions: BTreeSet<Condition>,

    /// Market capitalization. `None` or zero means unknown and ranks last.
    pub market_cap: Option<u64>,

    /// Close-over-close change of the most recent bar, in percent.
    pub change_pct: Option<f64>,

    /// Whether the symbol belongs to the operator's curated watchlist.
    pub is_favorite: bool,
}

impl SignalHit {
    /// Capitalization used for ranking; unknown ranks lowest.
    pub fn cap_for_ranking(&self) -> u64 {
        self.market_cap.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_codes_are_stable() {
        assert_eq!(Condition::Touch.code(), "C0");
        assert_eq!(Condition::Rebound.code(), "C1");
        assert_eq!(Condition::ReboundVolume.code(), "C2");
        assert_eq!(Condition::ReboundFibonacci.code(), "C3");
        assert_eq!(Condition::Breakout.code(), "C4");
    }

    #[test]
    fn test_condition_set_orders_by_code() {
        let mut set = BTreeSet::new();
        set.insert(Condition::Breakout);
        set.insert(Condition::Touch);
        set.insert(Condition::Rebound);
        let codes: Vec<&str> = set.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["C0", "C1", "C4"]);
    }
}
