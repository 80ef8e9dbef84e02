//! Multi-page workbooks: per-page settings and aggregation.

mod config;
mod manager;

pub use config::{PageConfig, DEFAULT_START_CELL};
pub use manager::{Aggregation, PageManager, PatternOutcome};
