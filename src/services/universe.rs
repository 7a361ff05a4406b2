//! Universe assembly: curated sector groups plus index constituents.
//!
//! Curated groups come first so their sector labels win for overlapping
//! symbols; the S&P 500 constituent list (symbol, name, sector columns)
//! widens the universe beyond the watchlist. A failed constituent fetch
//! degrades to the curated universe with a warning instead of failing the
//! run; the scan must keep working through upstream outages.

use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::models::{SectorGroups, Universe, UniverseItem};
use crate::services::providers::UniverseProvider;
use crate::services::sanitize::resolve_symbol;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{info, warn};

const CONSTITUENTS_URL: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500/master/data/constituents.csv";

pub struct UniverseClient {
    client: reqwest::Client,
    groups: SectorGroups,
    constituents_url: String,
}

impl UniverseClient {
    pub fn new(groups: SectorGroups) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            groups,
            constituents_url: CONSTITUENTS_URL.to_string(),
        })
    }

    /// Curated watchlist entries. Display names default to the symbol;
    /// the constituent list supplies real names where it overlaps.
    fn curated_items(&self) -> Vec<UniverseItem> {
        let mut items = Vec::new();
        for (sector, symbols) in &self.groups.groups {
            for raw in symbols {
                let symbol = resolve_symbol(raw);
                items.push(UniverseItem::new(symbol.clone(), symbol, sector.clone()));
            }
        }
        items
    }

    async fn fetch_constituents(&self) -> Result<Vec<UniverseItem>> {
        let response = self.client.get(&self.constituents_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Constituents request failed with status {}",
                response.status()
            )));
        }
        let body = response.text().await?;
        parse_constituents_csv(&body)
    }
}

impl UniverseProvider for UniverseClient {
    async fn list_universe(&self) -> Result<Universe> {
        let curated = self.curated_items();
        let favorites: BTreeSet<String> =
            curated.iter().map(|item| item.symbol.clone()).collect();

        let mut candidates = curated;
        match self.fetch_constituents().await {
            Ok(constituents) => {
                info!(count = constituents.len(), "Loaded index constituents");
                candidates.extend(constituents);
            }
            Err(e) => {
                warn!(error = %e, "Constituent fetch failed, scanning curated universe only");
            }
        }

        let universe = Universe::from_items(candidates, favorites);
        if universe.is_empty() {
            return Err(AppError::Config("Universe is empty".to_string()));
        }
        Ok(universe)
    }
}

/// Parse a constituents CSV with `Symbol`, `Name` and `Sector` columns.
/// Display names are cleaned of legal suffixes for the report.
fn parse_constituents_csv(body: &str) -> Result<Vec<UniverseItem>> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::Parse(format!("Constituents CSV missing column {}", name)))
    };
    let symbol_col = col("Symbol")?;
    let name_col = col("Name")?;
    let sector_col = col("Sector")?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        let symbol = resolve_symbol(record.get(symbol_col).unwrap_or(""));
        if symbol.is_empty() {
            continue;
        }
        let name = clean_company_name(record.get(name_col).unwrap_or(&symbol));
        let sector = record.get(sector_col).unwrap_or("UNCLASSIFIED").trim();
        let sector = if sector.is_empty() { "UNCLASSIFIED" } else { sector };
        items.push(UniverseItem::new(symbol, name, sector));
    }
    Ok(items)
}

/// Strip legal suffixes and share-class qualifiers from a company name so
/// report lines stay short.
pub fn clean_company_name(raw: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "Inc.",
        "Inc",
        "Incorporated",
        "Corporation",
        "Corp.",
        "Corp",
        "Company",
        "Co.",
        "Ltd.",
        "Ltd",
        "Limited",
        "Holdings",
        "Holding",
        "PLC",
        "plc",
        "N.V.",
        "S.A.",
        "Class A",
        "Class B",
        "Class C",
        "(The)",
    ];

    let mut name = raw.trim().to_string();
    loop {
        let before = name.len();
        for suffix in SUFFIXES {
            if let Some(stripped) = name.strip_suffix(suffix) {
                name = stripped.trim_end_matches([' ', ',', '&']).trim().to_string();
            }
        }
        if name.len() == before {
            break;
        }
    }
    if name.is_empty() {
        raw.trim().to_string()
    } else {
        name
    }
}
