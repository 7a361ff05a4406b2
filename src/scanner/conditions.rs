//! Trigger condition evaluation over an indicator frame.
//!
//! All checks look at the two most recent bars. Any undefined indicator
//! value makes the affected condition false; insufficient history is an
//! abstention, never an error. The rebound family is a partial order:
//! `ReboundVolume` and `ReboundFibonacci` can only hold when `Rebound`
//! holds.

use crate::constants::{
    DEFAULT_VOLUME_SURGE_MULTIPLIER, FIB_RETRACE_DEEP, FIB_RETRACE_SHALLOW, FIB_WINDOW,
};
use crate::models::{Bar, Condition, IndicatorFrame};
use std::collections::BTreeSet;

/// Tunable evaluation parameters. Window sizes are fixed in `constants`;
/// only operator-tunable thresholds live here.
#[derive(Debug, Clone)]
pub struct EvalParams {
    /// Multiplier applied to the prior volume MA for the volume-surge
    /// condition.
    pub volume_multiplier: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            volume_multiplier: DEFAULT_VOLUME_SURGE_MULTIPLIER,
        }
    }
}

/// Evaluate all conditions for the most recent bar of `frame`.
pub fn evaluate(frame: &IndicatorFrame, params: &EvalParams) -> BTreeSet<Condition> {
    let mut satisfied = BTreeSet::new();

    let n = frame.len();
    if n < 2 {
        return satisfied;
    }
    let (last_bar, last_row) = match frame.get(n - 1) {
        Some(pair) => pair,
        None => return satisfied,
    };
    let (prev_bar, prev_row) = match frame.get(n - 2) {
        Some(pair) => pair,
        None => return satisfied,
    };

    // Touch: the newest bar dipped to or below the lower band.
    if let Some(lower) = last_row.boll_lower {
        if last_bar.low <= lower {
            satisfied.insert(Condition::Touch);
        }
    }

    // Rebound: previous close at or below its band, current close
    // recovering above both the previous close and the current band.
    let rebound = match (prev_row.boll_lower, last_row.boll_lower) {
        (Some(prev_lower), Some(lower)) => {
            prev_bar.close <= prev_lower
                && last_bar.close > prev_bar.close
                && last_bar.close > lower
        }
        _ => false,
    };

    if rebound {
        satisfied.insert(Condition::Rebound);

        // Volume surge relative to the volume MA one bar prior.
        if let Some(volume_ma) = prev_row.volume_ma20 {
            if last_bar.volume as f64 >= volume_ma * params.volume_multiplier {
                satisfied.insert(Condition::ReboundVolume);
            }
        }

        // Close inside the retracement band of the trailing range.
        if let Some((fib_deep, fib_shallow)) = fibonacci_band(&frame.bars) {
            if last_bar.close >= fib_deep && last_bar.close <= fib_shallow {
                satisfied.insert(Condition::ReboundFibonacci);
            }
        }
    }

    // Breakout: close above the rolling close high as of one bar prior.
    if let Some(prior_high) = prev_row.high90 {
        if last_bar.close > prior_high {
            satisfied.insert(Condition::Breakout);
        }
    }

    satisfied
}

/// Retracement band over the trailing `FIB_WINDOW` bars: returns
/// `(deep, shallow)` where deep is the 61.8% level and shallow the 38.2%
/// level below the window high. `None` when the window has not filled.
fn fibonacci_band(bars: &[Bar]) -> Option<(f64, f64)> {
    if bars.len() < FIB_WINDOW {
        return None;
    }
    let window = &bars[bars.len() - FIB_WINDOW..];
    let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range = high - low;
    if range <= 0.0 {
        return None;
    }
    let shallow = high - FIB_RETRACE_SHALLOW * range;
    let deep = high - FIB_RETRACE_DEEP * range;
    Some((deep, shallow))
}
