//! Environment-driven scan configuration.
//!
//! Delivery credentials (`TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`) are
//! validated by the Telegram client itself; everything here is optional
//! with a sensible default. Unparsable values fall back to the default with
//! a warning rather than aborting the run.

use crate::constants::{
    DEFAULT_ALERT_STATE_PATH, DEFAULT_LOOKBACK_DAYS, DEFAULT_TOP_N,
    DEFAULT_VOLUME_SURGE_MULTIPLIER,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Days of daily history requested per symbol.
    pub lookback_days: u32,

    /// Per-sector result cap in the ranked report.
    pub top_n: usize,

    /// Multiplier applied to the prior volume MA for the volume-surge
    /// condition.
    pub volume_multiplier: f64,

    /// Path of the persisted per-day alert record.
    pub state_path: PathBuf,

    /// Send the summary and skip the dedup store even when every hit was
    /// already alerted today. Used for manual/debug invocations.
    pub force_send: bool,

    /// Optional JSON file overriding the built-in sector groups.
    pub sector_groups_file: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            top_n: DEFAULT_TOP_N,
            volume_multiplier: DEFAULT_VOLUME_SURGE_MULTIPLIER,
            state_path: PathBuf::from(DEFAULT_ALERT_STATE_PATH),
            force_send: false,
            sector_groups_file: None,
        }
    }
}

impl ScanConfig {
    /// Load the configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            lookback_days: env_parsed("SCAN_LOOKBACK_DAYS", DEFAULT_LOOKBACK_DAYS),
            top_n: env_parsed("SCAN_TOP_N", DEFAULT_TOP_N),
            volume_multiplier: env_parsed(
                "VOLUME_SURGE_MULTIPLIER",
                DEFAULT_VOLUME_SURGE_MULTIPLIER,
            ),
            state_path: std::env::var("ALERT_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ALERT_STATE_PATH)),
            force_send: env_flag("FORCE_SEND"),
            sector_groups_file: std::env::var("SECTOR_GROUPS_FILE").ok().map(PathBuf::from),
        }
    }
}

fn env_parsed<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(var = name, value = %raw, default = %default, "Unparsable value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => false,
    }
}
