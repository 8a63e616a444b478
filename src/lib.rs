//! Heap Histo
//!
//! Class histograms over heap snapshot instances: instance count and
//! total shallow bytes per class, ranked and rendered as a report.
//!
//! This crate provides the core implementation for the
//! `heap-histo` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! heap-histo histo -d heap.instances --top 20
//! ```
//!
//! Library use:
//!
//! ```
//! use heap_histo::histogram::{HeapHistogram, RowLimit};
//! use heap_histo::source::InstanceRecord;
//!
//! let mut histogram = HeapHistogram::new();
//! histogram.accumulate(&InstanceRecord::new("java.lang.String", 24)).unwrap();
//! println!("{}", histogram.format_top(RowLimit::Top(10)));
//! ```

pub mod commands;
pub mod histogram;
pub mod output;
pub mod source;
pub mod utils;
