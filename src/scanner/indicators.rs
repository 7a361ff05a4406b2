//! Indicator computation over a raw bar series.
//!
//! Pure and deterministic: the frame is a function of the input series
//! only, so recomputation is idempotent and symbols can be processed in
//! parallel. A series shorter than `MIN_BARS_FOR_SIGNALS` yields a frame
//! whose derived fields are entirely undefined; callers treat that as
//! "insufficient data", not as zeros.

use crate::constants::{
    BOLLINGER_WIDTH, BREAKOUT_WINDOW, MA_WINDOW, MFI_WINDOW, MIN_BARS_FOR_SIGNALS,
    VOLUME_MA_WINDOW,
};
use crate::models::{Bar, IndicatorFrame, IndicatorRow};

/// Compute the indicator frame for a bar series.
pub fn compute(bars: &[Bar]) -> IndicatorFrame {
    let n = bars.len();
    let mut rows = vec![IndicatorRow::default(); n];

    if n < MIN_BARS_FOR_SIGNALS {
        return IndicatorFrame {
            bars: bars.to_vec(),
            rows,
        };
    }

    fill_bollinger(bars, &mut rows);
    fill_volume_ma(bars, &mut rows);
    fill_mfi(bars, &mut rows);
    fill_rolling_high(bars, &mut rows);

    IndicatorFrame {
        bars: bars.to_vec(),
        rows,
    }
}

/// Rolling mean and population standard deviation of close, plus the
/// Bollinger envelope at mean +/- width * stddev.
fn fill_bollinger(bars: &[Bar], rows: &mut [IndicatorRow]) {
    for i in (MA_WINDOW - 1)..bars.len() {
        let window = &bars[i + 1 - MA_WINDOW..=i];
        let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / MA_WINDOW as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / MA_WINDOW as f64;
        let stddev = variance.sqrt();

        rows[i].ma20 = Some(mean);
        rows[i].stddev20 = Some(stddev);
        rows[i].boll_upper = Some(mean + BOLLINGER_WIDTH * stddev);
        rows[i].boll_lower = Some(mean - BOLLINGER_WIDTH * stddev);
    }
}

fn fill_volume_ma(bars: &[Bar], rows: &mut [IndicatorRow]) {
    for i in (VOLUME_MA_WINDOW - 1)..bars.len() {
        let window = &bars[i + 1 - VOLUME_MA_WINDOW..=i];
        let mean = window.iter().map(|b| b.volume as f64).sum::<f64>() / VOLUME_MA_WINDOW as f64;
        rows[i].volume_ma20 = Some(mean);
    }
}

/// Money Flow Index over typical-price deltas.
///
/// Defined once `MFI_WINDOW` deltas exist. A window with zero negative
/// flow has an infinite flow ratio and saturates at 100.
fn fill_mfi(bars: &[Bar], rows: &mut [IndicatorRow]) {
    let typical: Vec<f64> = bars.iter().map(|b| (b.high + b.low + b.close) / 3.0).collect();

    for i in MFI_WINDOW..bars.len() {
        let mut positive = 0.0;
        let mut negative = 0.0;
        for j in (i + 1 - MFI_WINDOW)..=i {
            let flow = typical[j] * bars[j].volume as f64;
            if typical[j] > typical[j - 1] {
                positive += flow;
            } else if typical[j] < typical[j - 1] {
                negative += flow;
            }
        }

        let mfi = if negative == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + positive / negative)
        };
        rows[i].mfi14 = Some(mfi);
    }
}

/// Highest close over the trailing breakout window. The window saturates
/// at the start of the series rather than staying undefined, matching the
/// breakout check which compares against the value one bar prior.
fn fill_rolling_high(bars: &[Bar], rows: &mut [IndicatorRow]) {
    for i in 0..bars.len() {
        let start = i.saturating_sub(BREAKOUT_WINDOW - 1);
        let high = bars[start..=i]
            .iter()
            .map(|b| b.close)
            .fold(f64::NEG_INFINITY, f64::max);
        rows[i].high90 = Some(high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                Bar::new(date, close, close, close, close, 1000)
            })
            .collect()
    }

    #[test]
    fn test_short_series_is_entirely_undefined() {
        let bars = make_bars(&[100.0; 20]);
        let frame = compute(&bars);
        assert_eq!(frame.len(), 20);
        for row in &frame.rows {
            assert_eq!(*row, IndicatorRow::default());
        }
    }

    #[test]
    fn test_warmup_rows_are_undefined() {
        let bars = make_bars(&[100.0; 25]);
        let frame = compute(&bars);
        assert!(frame.rows[MA_WINDOW - 2].ma20.is_none());
        assert!(frame.rows[MA_WINDOW - 1].ma20.is_some());
        assert!(frame.rows[MFI_WINDOW - 1].mfi14.is_none());
        assert!(frame.rows[MFI_WINDOW].mfi14.is_some());
    }

    #[test]
    fn test_flat_series_bands_collapse_to_mean() {
        let bars = make_bars(&[50.0; 30]);
        let frame = compute(&bars);
        let row = &frame.rows[29];
        assert_eq!(row.ma20, Some(50.0));
        assert_eq!(row.stddev20, Some(0.0));
        assert_eq!(row.boll_upper, Some(50.0));
        assert_eq!(row.boll_lower, Some(50.0));
    }

    #[test]
    fn test_moving_average_value() {
        // 21 bars: twenty 1.0 closes then a 21.0 close. MA over the last
        // window = (19 * 1.0 + 21.0) / 20 = 2.0.
        let mut closes = vec![1.0; 20];
        closes.push(21.0);
        let bars = make_bars(&closes);
        let frame = compute(&bars);
        let ma = frame.rows[20].ma20.unwrap();
        assert!((ma - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mfi_saturates_at_100_when_no_negative_flow() {
        let closes: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let bars = make_bars(&closes);
        let frame = compute(&bars);
        assert_eq!(frame.rows[29].mfi14, Some(100.0));
    }

    #[test]
    fn test_mfi_is_zero_when_no_positive_flow() {
        let closes: Vec<f64> = (1..=30).rev().map(|i| i as f64 + 100.0).collect();
        let bars = make_bars(&closes);
        let frame = compute(&bars);
        assert_eq!(frame.rows[29].mfi14, Some(0.0));
    }

    #[test]
    fn test_mfi_stays_in_bounds() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + if i % 3 == 0 { 5.0 } else { -2.0 })
            .collect();
        let bars = make_bars(&closes);
        let frame = compute(&bars);
        for row in &frame.rows {
            if let Some(mfi) = row.mfi14 {
                assert!((0.0..=100.0).contains(&mfi));
            }
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0).collect();
        let bars = make_bars(&closes);
        let first = compute(&bars);
        let second = compute(&bars);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rolling_high_tracks_maximum_close() {
        let mut closes = vec![10.0; 25];
        closes[5] = 42.0;
        let bars = make_bars(&closes);
        let frame = compute(&bars);
        assert_eq!(frame.rows[24].high90, Some(42.0));
    }
}
