//! Class histogram over heap instances.
//!
//! This module turns a stream of instances into:
//! - Per-class instance counts and shallow byte totals
//! - Ranked rows (bytes, then count, then class)
//! - Text and JSON reports

pub mod aggregator;
pub mod feed;
pub mod report;
pub mod stats;

// Re-export main types and functions
pub use aggregator::HeapHistogram;
pub use feed::{accumulate_partitioned, accumulate_with_policy, ErrorPolicy, FeedOutcome};
pub use report::{render_text, HistogramReport, ReportRow, RowLimit};
pub use stats::{ClassIdentity, ClassStats};
