use crate::histogram::{ErrorPolicy, RowLimit};
use crate::output::ReportFormat;
use crate::source::SourceFormat;
use std::path::PathBuf;

/// Arguments for the histo command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct HistoArgs {
    /// Instance listing extracted from a heap dump
    pub dump_path: PathBuf,

    /// Listing format (auto = by extension)
    pub input_format: SourceFormat,

    /// Number of classes to render
    pub limit: RowLimit,

    /// Report format
    pub report_format: ReportFormat,

    /// Output file (None = stdout)
    pub output: Option<PathBuf>,

    /// What to do with instances that cannot be accumulated
    pub error_policy: ErrorPolicy,

    /// Parallel partitions (1 = sequential)
    pub partitions: usize,
}

impl Default for HistoArgs {
    fn default() -> Self {
        Self {
            dump_path: PathBuf::new(),
            input_format: SourceFormat::Auto,
            limit: RowLimit::Unbounded,
            report_format: ReportFormat::Text,
            output: None,
            error_policy: ErrorPolicy::Abort,
            partitions: 1,
        }
    }
}
