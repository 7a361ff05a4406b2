mod alert_store;

pub use alert_store::{AlertState, AlertStore};
