//! Header location and data-range extraction.
//!
//! One [`Resolver`] serves both callers: a single sheet read straight into a
//! [`SourceTable`](crate::SourceTable), and the multi-page aggregator which
//! runs it once per approved page.

mod header;
mod resolver;

pub use header::{HeaderPolicy, HEADER_LOOKBACK, START_ROW_OFFSET, TEXT_LENGTH_THRESHOLD};
pub use resolver::{ExtractedRange, Resolver};
