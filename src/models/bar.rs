use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Calendar date of the bar. Unique and ascending within a series.
    pub date: NaiveDate,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume (number of shares)
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Sort a raw bar series ascending by date and drop duplicate dates,
/// keeping the most recent occurrence of each date. Providers occasionally
/// return a partial bar twice; downstream code relies on the
/// unique-ascending invariant.
pub fn normalize_series(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.date);
    bars.reverse();
    bars.dedup_by_key(|b| b.date);
    bars.reverse();
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn bar(day: u32, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        Bar::new(date, close, close, close, close, 1000)
    }

    #[test]
    fn test_normalize_sorts_ascending() {
        let series = normalize_series(vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);
        let dates: Vec<u32> = series.iter().map(|b| b.date.day()).collect();
        assert_eq!(dates, vec![1, 2, 3]);
    }

    #[test]
    fn test_normalize_keeps_latest_duplicate() {
        let series = normalize_series(vec![bar(1, 1.0), bar(2, 2.0), bar(2, 2.5)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].close, 2.5);
    }
}
