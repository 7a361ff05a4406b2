use super::Bar;

/// Derived indicator values for one bar. `None` means undefined: the
/// trailing window has not filled yet. Condition checks must treat an
/// undefined value as "no signal", never as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorRow {
    /// Simple moving average of close over the MA window.
    pub ma20: Option<f64>,

    /// Population standard deviation of close over the MA window.
    pub stddev20: Option<f64>,

    /// Upper Bollinger band: ma20 + width * stddev20.
    pub boll_upper: Option<f64>,

    /// Lower Bollinger band: ma20 - width * stddev20.
    pub boll_lower: Option<f64>,

    /// Moving average of volume over the volume window.
    pub volume_ma20: Option<f64>,

    /// Money Flow Index, bounded [0, 100].
    pub mfi14: Option<f64>,

    /// Highest close over the trailing breakout window (up to 90 bars).
    pub high90: Option<f64>,
}

/// A bar series augmented with per-bar derived indicators.
///
/// `rows` always has the same length as `bars`; a series too short for any
/// window yields rows that are entirely undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub bars: Vec<Bar>,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar and indicator row at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<(&Bar, &IndicatorRow)> {
        Some((self.bars.get(index)?, self.rows.get(index)?))
    }

    /// The most recent bar and its indicator row.
    pub fn last(&self) -> Option<(&Bar, &IndicatorRow)> {
        if self.is_empty() {
            None
        } else {
            self.get(self.len() - 1)
        }
    }
}
