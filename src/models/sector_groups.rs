use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Curated watchlist grouped by sector/theme label.
///
/// The built-in table mirrors the operator's semiconductor-heavy watchlist;
/// a JSON file of `{"GROUP": ["SYM", ...]}` can replace it entirely via
/// `SECTOR_GROUPS_FILE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorGroups {
    #[serde(flatten)]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl SectorGroups {
    /// Load sector groups from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!(
                "Cannot read sector groups file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let groups: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
        Ok(Self { groups })
    }

    /// The built-in watchlist. Semiconductor sub-groups are kept separate
    /// on purpose; they rank independently in the report.
    pub fn defaults() -> Self {
        let mut groups = BTreeMap::new();

        groups.insert(
            "SEMICONDUCTOR_EQUIPMENT".to_string(),
            symbols(&[
                "ASML", "AMAT", "LRCX", "KLAC", "TER", "ONTO", "ACLS", "VECO", "MKSI", "ENTG",
            ]),
        );
        groups.insert(
            "SEMICONDUCTOR_FABLESS".to_string(),
            symbols(&[
                "NVDA", "AMD", "AVGO", "QCOM", "MRVL", "NXPI", "ADI", "TXN", "MPWR", "ON",
            ]),
        );
        groups.insert(
            "SEMICONDUCTOR_FOUNDRY".to_string(),
            symbols(&["TSM", "UMC", "GFS"]),
        );
        groups.insert(
            "SEMICONDUCTOR_IDM".to_string(),
            symbols(&["INTC", "MU", "STM", "WDC"]),
        );
        groups.insert(
            "TECHNOLOGY".to_string(),
            symbols(&[
                "AAPL", "MSFT", "ORCL", "CRM", "ADBE", "CSCO", "IBM", "NOW", "INTU", "PANW",
            ]),
        );
        groups.insert(
            "COMMUNICATION".to_string(),
            symbols(&[
                "GOOGL", "GOOG", "META", "NFLX", "DIS", "TMUS", "VZ", "T", "CMCSA", "EA",
            ]),
        );
        groups.insert(
            "CONSUMER_DISCRETIONARY".to_string(),
            symbols(&[
                "AMZN", "TSLA", "HD", "MCD", "NKE", "LOW", "SBUX", "BKNG", "TJX", "MAR",
            ]),
        );
        groups.insert(
            "FINANCIALS".to_string(),
            symbols(&[
                "BRK-B", "JPM", "V", "MA", "BAC", "WFC", "GS", "MS", "C", "AXP",
            ]),
        );
        groups.insert(
            "HEALTHCARE".to_string(),
            symbols(&[
                "LLY", "JNJ", "UNH", "ABBV", "PFE", "MRK", "TMO", "ABT", "DHR", "AMGN",
            ]),
        );
        groups.insert(
            "INDUSTRIALS".to_string(),
            symbols(&[
                "CAT", "RTX", "HON", "UPS", "BA", "LMT", "GE", "DE", "ETN", "UNP",
            ]),
        );
        groups.insert(
            "ENERGY".to_string(),
            symbols(&["XOM", "CVX", "COP", "SLB", "EOG", "PSX", "MPC", "OXY"]),
        );
        groups.insert("AI_SOFTWARE".to_string(), symbols(&["PLTR"]));
        groups.insert("INDEX_ETF".to_string(), symbols(&["SPY", "QQQ"]));
        groups.insert("DIVIDEND_ETF".to_string(), symbols(&["SCHD", "JEPQ"]));
        groups.insert(
            "COMMODITY_GOLD".to_string(),
            symbols(&["GLD", "GDXU", "UGL"]),
        );

        Self { groups }
    }

    /// All symbols across all groups, sorted and deduplicated.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.groups.values().flatten().cloned().collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }

    /// Symbols for a specific group.
    pub fn get_group(&self, group_name: &str) -> Option<&Vec<String>> {
        self.groups.get(group_name)
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
