//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Column widths for the text histogram (jmap style)
pub const RANK_WIDTH: usize = 4;
pub const COUNT_WIDTH: usize = 14;
pub const BYTES_WIDTH: usize = 14;

/// Label printed in front of the grand totals line
pub const TOTAL_LABEL: &str = "Total";

/// File extensions read as JSON instance streams when the format is `auto`
pub const JSON_EXTENSIONS: &[&str] = &["json", "ndjson", "jsonl"];

/// Marker for a class or size the heap source could not resolve
pub const UNRESOLVED_MARKER: &str = "?";

/// Outer context attached to every histo command failure
pub const HISTO_FAILURE_CONTEXT: &str = "Heap dump processing error";

/// Records buffered per batch when accumulating across partitions
pub const PARTITION_BATCH_SIZE: usize = 64 * 1024;
