//! Class histogram accumulation and ranking.
//!
//! Instances are folded one at a time into per-class counters. Reports rank
//! classes by total shallow bytes (descending), then instance count
//! (descending), then class identity (ascending) so output never depends on
//! hash map iteration order.

use super::report::{render_text, HistogramReport, ReportRow, RowLimit};
use super::stats::{ClassIdentity, ClassStats};
use crate::source::Instance;
use crate::utils::error::{AccumulationError, HistogramError};
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-class instance histogram
///
/// **Public** - main aggregation type
///
/// Always consistent with the instances accumulated so far; a report can be
/// rendered at any point and accumulation may continue afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapHistogram {
    classes: HashMap<ClassIdentity, ClassStats>,
}

impl HeapHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one instance into the histogram
    ///
    /// # Errors
    /// * `AccumulationError::UnresolvedClass` - the class could not be resolved
    /// * `AccumulationError::UnknownSize` - the shallow size could not be computed
    /// * `AccumulationError::Overflow` - a counter would exceed `u64::MAX`
    ///
    /// On error the histogram is left exactly as it was.
    pub fn accumulate<I: Instance + ?Sized>(
        &mut self,
        instance: &I,
    ) -> Result<(), AccumulationError> {
        let class = instance.class_identity()?;
        let size = instance.shallow_size()?;

        let current = self.classes.get(&class).copied().unwrap_or_default();
        let updated = current
            .checked_add(&ClassStats::new(1, size))
            .ok_or_else(|| AccumulationError::Overflow { class: class.clone() })?;

        self.classes.insert(class, updated);
        Ok(())
    }

    /// Add every class of `other` into this histogram
    ///
    /// Commutative and associative. All sums are checked before anything is
    /// written, so an overflow leaves `self` unchanged.
    pub fn merge(&mut self, other: &HeapHistogram) -> Result<(), AccumulationError> {
        let mut updates = Vec::with_capacity(other.classes.len());

        for (class, stats) in &other.classes {
            let current = self.classes.get(class).copied().unwrap_or_default();
            let merged = current
                .checked_add(stats)
                .ok_or_else(|| AccumulationError::Overflow { class: class.clone() })?;
            updates.push((class.clone(), merged));
        }

        self.classes.extend(updates);
        Ok(())
    }

    /// Owned variant of `merge`, handy as a reduce step
    pub fn merged(mut self, other: &HeapHistogram) -> Result<HeapHistogram, AccumulationError> {
        self.merge(other)?;
        Ok(self)
    }

    pub fn get(&self, class: &ClassIdentity) -> Option<ClassStats> {
        self.classes.get(class).copied()
    }

    /// Number of distinct classes seen
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassIdentity, &ClassStats)> {
        self.classes.iter()
    }

    /// Grand totals across all classes
    ///
    /// Saturates at `u64::MAX`; per-class counters never do.
    pub fn totals(&self) -> ClassStats {
        self.classes.values().fold(ClassStats::default(), |acc, s| ClassStats {
            instance_count: acc.instance_count.saturating_add(s.instance_count),
            total_shallow_bytes: acc.total_shallow_bytes.saturating_add(s.total_shallow_bytes),
        })
    }

    pub fn total_instances(&self) -> u64 {
        self.totals().instance_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.totals().total_shallow_bytes
    }

    /// Ranked rows, at most `limit` of them
    pub fn rows(&self, limit: RowLimit) -> Vec<ReportRow> {
        let total_bytes = self.total_bytes();
        let mut ranked: Vec<(&ClassIdentity, &ClassStats)> = self.classes.iter().collect();
        ranked.sort_unstable_by(|a, b| rank_order(a, b));

        let emitted = limit.cap(ranked.len());
        debug!("Ranking {} classes, emitting {}", ranked.len(), emitted);

        ranked
            .into_iter()
            .take(emitted)
            .enumerate()
            .map(|(i, (class, stats))| ReportRow::new(i + 1, class, stats, total_bytes))
            .collect()
    }

    /// Render the top classes as a text table
    ///
    /// **Public** - main reporting entry point
    ///
    /// Header line, up to `limit` rows, then a totals line covering every
    /// accumulated class (not only the emitted ones). Read-only.
    pub fn format_top(&self, limit: RowLimit) -> String {
        render_text(&self.rows(limit), &self.totals())
    }

    /// `format_top` with a signed limit
    ///
    /// # Errors
    /// * `HistogramError::InvalidArgument` - `limit` is negative
    pub fn format_top_checked(&self, limit: i64) -> Result<String, HistogramError> {
        let limit = RowLimit::try_from(limit)?;
        Ok(self.format_top(limit))
    }

    /// Serializable report of the top classes
    pub fn to_report(&self, limit: RowLimit) -> HistogramReport {
        HistogramReport::new(self.rows(limit), limit, self.class_count(), self.totals())
    }
}

/// Bytes desc, then count desc, then class asc
///
/// **Private** - total order over distinct classes
fn rank_order(a: &(&ClassIdentity, &ClassStats), b: &(&ClassIdentity, &ClassStats)) -> Ordering {
    b.1.total_shallow_bytes
        .cmp(&a.1.total_shallow_bytes)
        .then_with(|| b.1.instance_count.cmp(&a.1.instance_count))
        .then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InstanceRecord;

    fn histogram_of(records: &[(&str, u64)]) -> HeapHistogram {
        let mut histogram = HeapHistogram::new();
        for (class, size) in records {
            histogram.accumulate(&InstanceRecord::new(*class, *size)).unwrap();
        }
        histogram
    }

    #[test]
    fn test_accumulate_counts_and_bytes() {
        let histogram = histogram_of(&[("Foo", 16), ("Foo", 24), ("Bar", 8)]);

        assert_eq!(histogram.class_count(), 2);
        assert_eq!(histogram.get(&"Foo".into()), Some(ClassStats::new(2, 40)));
        assert_eq!(histogram.get(&"Bar".into()), Some(ClassStats::new(1, 8)));
        assert_eq!(histogram.total_instances(), 3);
        assert_eq!(histogram.total_bytes(), 48);
    }

    #[test]
    fn test_accumulate_zero_size() {
        let histogram = histogram_of(&[("Empty", 0)]);
        assert_eq!(histogram.get(&"Empty".into()), Some(ClassStats::new(1, 0)));
    }

    #[test]
    fn test_failed_accumulate_leaves_state() {
        let mut histogram = histogram_of(&[("Foo", 16)]);
        let before = histogram.clone();

        let no_size = InstanceRecord { class: Some("Foo".into()), size: None };
        assert!(histogram.accumulate(&no_size).is_err());

        let no_class = InstanceRecord { class: None, size: Some(8) };
        assert!(histogram.accumulate(&no_class).is_err());

        assert_eq!(histogram, before);
    }

    #[test]
    fn test_overflow_leaves_state() {
        let mut histogram = histogram_of(&[("Big", u64::MAX)]);
        let before = histogram.clone();

        let err = histogram.accumulate(&InstanceRecord::new("Big", 1)).unwrap_err();
        assert_eq!(err, AccumulationError::Overflow { class: "Big".into() });
        assert_eq!(histogram, before);
    }

    #[test]
    fn test_merge_overflow_is_atomic() {
        let mut left = histogram_of(&[("A", 1), ("Big", u64::MAX)]);
        let right = histogram_of(&[("A", 5), ("Big", 1)]);
        let before = left.clone();

        assert!(left.merge(&right).is_err());
        assert_eq!(left, before);
    }

    #[test]
    fn test_rank_order() {
        let mut histogram = HeapHistogram::new();
        for _ in 0..5 {
            histogram.accumulate(&InstanceRecord::new("b.five", 60)).unwrap();
        }
        for _ in 0..2 {
            histogram.accumulate(&InstanceRecord::new("a.two", 150)).unwrap();
        }
        for _ in 0..8 {
            histogram.accumulate(&InstanceRecord::new("c.nine", 0)).unwrap();
        }
        histogram.accumulate(&InstanceRecord::new("c.nine", 100)).unwrap();

        let names: Vec<String> = histogram
            .rows(RowLimit::Top(3))
            .iter()
            .map(|r| r.class.to_string())
            .collect();

        assert_eq!(names, vec!["b.five", "a.two", "c.nine"]);
    }

    #[test]
    fn test_name_tie_break() {
        let histogram = histogram_of(&[("b.Zeta", 8), ("a.Alpha", 8), ("c.Mid", 8)]);
        let names: Vec<String> = histogram
            .rows(RowLimit::Unbounded)
            .iter()
            .map(|r| r.class.to_string())
            .collect();

        assert_eq!(names, vec!["a.Alpha", "b.Zeta", "c.Mid"]);
    }

    #[test]
    fn test_format_top_checked_negative() {
        let histogram = histogram_of(&[("Foo", 16)]);
        assert!(matches!(
            histogram.format_top_checked(-1),
            Err(HistogramError::InvalidArgument(_))
        ));
        assert_eq!(
            histogram.format_top_checked(5).unwrap(),
            histogram.format_top(RowLimit::Top(5))
        );
    }

    #[test]
    fn test_to_report_totals_cover_all_classes() {
        let histogram = histogram_of(&[("Foo", 16), ("Bar", 100)]);
        let report = histogram.to_report(RowLimit::Top(1));

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.limit, Some(1));
        assert_eq!(report.class_count, 2);
        assert_eq!(report.total_instances, 2);
        assert_eq!(report.total_bytes, 116);
    }
}
