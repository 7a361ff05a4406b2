mod bar;
mod frame;
mod sector_groups;
mod signal;
mod universe;

pub use bar::{normalize_series, Bar};
pub use frame::{IndicatorFrame, IndicatorRow};
pub use sector_groups::SectorGroups;
pub use signal::{Condition, SignalHit};
pub use universe::{Universe, UniverseItem};

/// Time series of daily bars for a single symbol.
pub type Series = Vec<Bar>;
