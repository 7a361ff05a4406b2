pub mod conditions;
pub mod engine;
pub mod indicators;
pub mod ranker;

pub use conditions::{evaluate, EvalParams};
pub use engine::{ScanEngine, ScanSummary};
pub use indicators::compute;
pub use ranker::{rank, RankedResults};
