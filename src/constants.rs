//! Indicator windows and signal thresholds.
//!
//! Every window size and multiplier used by the scanner lives here so the
//! condition logic stays free of magic numbers. Values an operator may want
//! to tune per deployment (lookback, top-N, volume multiplier) also have
//! environment overrides in `config`.

/// Window for the simple moving average and Bollinger mid-band.
pub const MA_WINDOW: usize = 20;

/// Bollinger band width in standard deviations.
pub const BOLLINGER_WIDTH: f64 = 2.0;

/// Window for the volume moving average.
pub const VOLUME_MA_WINDOW: usize = 20;

/// Window for the Money Flow Index (number of typical-price deltas).
pub const MFI_WINDOW: usize = 14;

/// Trailing window for the rolling close high used by the breakout signal.
pub const BREAKOUT_WINDOW: usize = 90;

/// Trailing window for the Fibonacci retracement range.
pub const FIB_WINDOW: usize = 50;

/// Shallow retracement ratio (38.2%).
pub const FIB_RETRACE_SHALLOW: f64 = 0.382;

/// Deep retracement ratio (61.8%).
pub const FIB_RETRACE_DEEP: f64 = 0.618;

/// Default multiplier applied to the prior volume MA for the volume-surge
/// condition. Override with `VOLUME_SURGE_MULTIPLIER`.
pub const DEFAULT_VOLUME_SURGE_MULTIPLIER: f64 = 1.1;

/// Minimum bars before any derived indicator value is defined for the
/// newest bar. Shorter series produce an entirely undefined frame.
pub const MIN_BARS_FOR_SIGNALS: usize = MA_WINDOW + 1;

/// Default days of daily history requested per symbol.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 120;

/// Default per-sector result cap in the ranked report.
pub const DEFAULT_TOP_N: usize = 10;

/// Symbols evaluated concurrently per group. Kept small to respect the
/// price-history provider's rate limits.
pub const CONCURRENT_FETCHES: usize = 4;

/// Delivery attempts before a notification is given up on.
pub const MAX_SEND_ATTEMPTS: u32 = 3;

/// Seconds between delivery retries.
pub const SEND_RETRY_DELAY_SECS: u64 = 2;

/// HTTP timeout for provider requests, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default path of the persisted per-day alert record.
pub const DEFAULT_ALERT_STATE_PATH: &str = "alert_state.json";
