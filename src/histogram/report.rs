//! Ranked report rows and their text / JSON renderings.
//!
//! Rows are derived from a histogram at report time and never stored
//! back. The text layout follows the classic `jmap -histo` table.

use super::stats::{ClassIdentity, ClassStats};
use crate::utils::config::{BYTES_WIDTH, COUNT_WIDTH, RANK_WIDTH, SCHEMA_VERSION, TOTAL_LABEL};
use crate::utils::error::HistogramError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cap on the number of rows a report renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLimit {
    /// Every accumulated class
    #[default]
    Unbounded,

    /// At most this many rows
    Top(usize),
}

impl RowLimit {
    /// Number of rows to emit out of `available`
    pub fn cap(self, available: usize) -> usize {
        match self {
            RowLimit::Unbounded => available,
            RowLimit::Top(n) => n.min(available),
        }
    }

    pub fn as_option(self) -> Option<usize> {
        match self {
            RowLimit::Unbounded => None,
            RowLimit::Top(n) => Some(n),
        }
    }
}

impl From<Option<usize>> for RowLimit {
    fn from(limit: Option<usize>) -> Self {
        limit.map(RowLimit::Top).unwrap_or(RowLimit::Unbounded)
    }
}

impl TryFrom<i64> for RowLimit {
    type Error = HistogramError;

    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        if limit < 0 {
            return Err(HistogramError::InvalidArgument(format!(
                "row limit must not be negative, got {}",
                limit
            )));
        }
        Ok(RowLimit::Top(usize::try_from(limit).unwrap_or(usize::MAX)))
    }
}

impl FromStr for RowLimit {
    type Err = HistogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("unbounded") {
            return Ok(RowLimit::Unbounded);
        }

        let n = s.parse::<i64>().map_err(|_| {
            HistogramError::InvalidArgument(format!(
                "row limit must be a number or 'all', got '{}'",
                s
            ))
        })?;
        RowLimit::try_from(n)
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLimit::Unbounded => f.write_str("all"),
            RowLimit::Top(n) => write!(f, "{}", n),
        }
    }
}

/// One ranked histogram line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// 1-based position in the ranking
    pub rank: usize,

    /// Class this row describes
    pub class: ClassIdentity,

    /// Number of instances of the class
    pub instance_count: u64,

    /// Sum of their shallow sizes
    pub total_shallow_bytes: u64,

    /// Share of all accumulated bytes
    pub percentage: f64,
}

impl ReportRow {
    pub(crate) fn new(
        rank: usize,
        class: &ClassIdentity,
        stats: &ClassStats,
        total_bytes: u64,
    ) -> Self {
        let percentage = if total_bytes > 0 {
            (stats.total_shallow_bytes as f64 / total_bytes as f64) * 100.0
        } else {
            0.0
        };

        Self {
            rank,
            class: class.clone(),
            instance_count: stats.instance_count,
            total_shallow_bytes: stats.total_shallow_bytes,
            percentage,
        }
    }
}

/// Serializable histogram report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Row cap the report was rendered with (`None` = all classes)
    pub limit: Option<usize>,

    /// Number of distinct classes accumulated
    pub class_count: usize,

    /// Instances across all classes, not only emitted rows
    pub total_instances: u64,

    /// Bytes across all classes, not only emitted rows
    pub total_bytes: u64,

    /// Ranked rows, at most `limit`
    pub rows: Vec<ReportRow>,
}

impl HistogramReport {
    pub(crate) fn new(
        rows: Vec<ReportRow>,
        limit: RowLimit,
        class_count: usize,
        totals: ClassStats,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            limit: limit.as_option(),
            class_count,
            total_instances: totals.instance_count,
            total_bytes: totals.total_shallow_bytes,
            rows,
        }
    }
}

/// Render rows plus a totals line as a text table
///
/// **Public** - used by `HeapHistogram::format_top`
///
/// Produces a header line, one line per row and a trailing totals line.
pub fn render_text(rows: &[ReportRow], totals: &ClassStats) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(format!(
        "{:>rw$} {:>cw$} {:>bw$}  {}",
        "num",
        "#instances",
        "#bytes",
        "class name",
        rw = RANK_WIDTH + 1,
        cw = COUNT_WIDTH,
        bw = BYTES_WIDTH,
    ));

    for row in rows {
        lines.push(format!(
            "{:>rw$}: {:>cw$} {:>bw$}  {}",
            row.rank,
            row.instance_count,
            row.total_shallow_bytes,
            row.class,
            rw = RANK_WIDTH,
            cw = COUNT_WIDTH,
            bw = BYTES_WIDTH,
        ));
    }

    lines.push(format!(
        "{:<rw$} {:>cw$} {:>bw$}",
        TOTAL_LABEL,
        totals.instance_count,
        totals.total_shallow_bytes,
        rw = RANK_WIDTH + 1,
        cw = COUNT_WIDTH,
        bw = BYTES_WIDTH,
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_limit_from_str() {
        assert_eq!("all".parse::<RowLimit>().unwrap(), RowLimit::Unbounded);
        assert_eq!("Unbounded".parse::<RowLimit>().unwrap(), RowLimit::Unbounded);
        assert_eq!("0".parse::<RowLimit>().unwrap(), RowLimit::Top(0));
        assert_eq!(" 25 ".parse::<RowLimit>().unwrap(), RowLimit::Top(25));
        assert!(matches!(
            "-1".parse::<RowLimit>(),
            Err(HistogramError::InvalidArgument(_))
        ));
        assert!(matches!(
            "many".parse::<RowLimit>(),
            Err(HistogramError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_row_limit_cap() {
        assert_eq!(RowLimit::Unbounded.cap(7), 7);
        assert_eq!(RowLimit::Top(3).cap(7), 3);
        assert_eq!(RowLimit::Top(10).cap(7), 7);
        assert_eq!(RowLimit::Top(0).cap(7), 0);
    }

    #[test]
    fn test_row_percentage_zero_total() {
        let row = ReportRow::new(1, &"Foo".into(), &ClassStats::new(3, 0), 0);
        assert_eq!(row.percentage, 0.0);
    }

    #[test]
    fn test_render_text_layout() {
        let bar = ClassIdentity::named("com.example.Bar");
        let rows = vec![ReportRow::new(1, &bar, &ClassStats::new(1, 100), 156)];
        let text = render_text(&rows, &ClassStats::new(4, 156));

        let expected = [
            "  num     #instances         #bytes  class name",
            "   1:              1            100  com.example.Bar",
            "Total              4            156",
        ]
        .join("\n");

        assert_eq!(text, expected);
    }
}
