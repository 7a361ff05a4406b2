//! Per-day alert memory.
//!
//! One JSON record keyed by calendar day holds the symbols already
//! notified, so repeated scheduled runs within a day stay quiet about the
//! same symbol. The record resets implicitly on date rollover and is
//! rebuilt from scratch when unreadable: availability of the scan wins
//! over strict dedup guarantees.

use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persisted record: the day and the symbols alerted on that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub date: NaiveDate,
    pub symbols: BTreeSet<String>,
}

impl AlertState {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            symbols: BTreeSet::new(),
        }
    }
}

/// File-backed store for the per-day alert record.
///
/// Opened, mutated, and saved within a single scan; last writer wins,
/// which is acceptable with one scheduled run at a time.
pub struct AlertStore {
    path: PathBuf,
    state: AlertState,
}

impl AlertStore {
    /// Open the store for `today`. A missing, unreadable, or stale record
    /// (a different stored date) yields a fresh empty day.
    pub fn open(path: impl Into<PathBuf>, today: NaiveDate) -> Self {
        let path = path.into();
        let state = match Self::load(&path) {
            Ok(Some(stored)) if stored.date == today => stored,
            Ok(Some(stored)) => {
                debug!(stored_date = %stored.date, today = %today, "Alert state rolled over");
                AlertState::fresh(today)
            }
            Ok(None) => AlertState::fresh(today),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable alert state, starting fresh");
                AlertState::fresh(today)
            }
        };
        Self { path, state }
    }

    fn load(path: &Path) -> Result<Option<AlertState>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let state: AlertState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// True when the symbol has not been alerted yet today.
    pub fn should_alert(&self, symbol: &str) -> bool {
        !self.state.symbols.contains(symbol)
    }

    /// Record the symbol as alerted today. Idempotent.
    pub fn mark_alerted(&mut self, symbol: &str) {
        self.state.symbols.insert(symbol.to_string());
    }

    /// Persist the record: write to a sibling temp file, then rename over
    /// the target so readers never observe a partial record.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::Io(format!(
                "Cannot replace alert state {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }
}
