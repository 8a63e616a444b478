//! Feeding instances into histograms.
//!
//! `HeapHistogram::accumulate` never decides what to do with a bad instance;
//! callers pick an `ErrorPolicy` here. Partitioned accumulation builds one
//! histogram per chunk on the rayon pool and folds them together with
//! `merge`, which gives the same totals as a sequential pass.

use super::aggregator::HeapHistogram;
use crate::source::Instance;
use crate::utils::error::{AccumulationError, HistogramError};
use log::{debug, warn};
use rayon::prelude::*;
use std::ops::AddAssign;

/// What to do when a single instance cannot be accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the error
    #[default]
    Abort,

    /// Log, count and continue with the next instance
    Skip,
}

/// Counters describing one feeding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedOutcome {
    /// Instances folded into the histogram
    pub accumulated: u64,

    /// Instances dropped under `ErrorPolicy::Skip`
    pub skipped: u64,
}

impl AddAssign for FeedOutcome {
    fn add_assign(&mut self, other: FeedOutcome) {
        self.accumulated += other.accumulated;
        self.skipped += other.skipped;
    }
}

/// Accumulate one instance under `policy`, updating `outcome`
///
/// **Public** - shared by sequential and partitioned feeding
pub fn accumulate_with_policy<I: Instance + ?Sized>(
    histogram: &mut HeapHistogram,
    instance: &I,
    policy: ErrorPolicy,
    outcome: &mut FeedOutcome,
) -> Result<(), AccumulationError> {
    match histogram.accumulate(instance) {
        Ok(()) => {
            outcome.accumulated += 1;
            Ok(())
        }
        Err(e) if policy == ErrorPolicy::Skip => {
            warn!("Skipping instance: {}", e);
            outcome.skipped += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Accumulate a slice of instances across `partitions` parallel chunks
///
/// **Public** - parallel entry point
///
/// The per-chunk histograms are merged into `histogram`. Under
/// `ErrorPolicy::Abort` the first failing chunk aborts the whole call and
/// `histogram` is left untouched.
///
/// # Errors
/// * `HistogramError::InvalidArgument` - `partitions` is zero
/// * `HistogramError::Accumulation` - an instance failed under `Abort`, or a merge overflowed
pub fn accumulate_partitioned<I: Instance + Sync>(
    histogram: &mut HeapHistogram,
    instances: &[I],
    partitions: usize,
    policy: ErrorPolicy,
) -> Result<FeedOutcome, HistogramError> {
    if partitions == 0 {
        return Err(HistogramError::InvalidArgument(
            "partitions must be greater than 0".to_string(),
        ));
    }

    if instances.is_empty() {
        return Ok(FeedOutcome::default());
    }

    let chunk_size = instances.len().div_ceil(partitions);
    debug!(
        "Accumulating {} instances in chunks of {}",
        instances.len(),
        chunk_size
    );

    let (partial, outcome) = instances
        .par_chunks(chunk_size)
        .map(|chunk| -> Result<(HeapHistogram, FeedOutcome), AccumulationError> {
            let mut local = HeapHistogram::new();
            let mut outcome = FeedOutcome::default();
            for instance in chunk {
                accumulate_with_policy(&mut local, instance, policy, &mut outcome)?;
            }
            Ok((local, outcome))
        })
        .try_reduce(
            || (HeapHistogram::new(), FeedOutcome::default()),
            |(left, mut left_outcome), (right, right_outcome)| {
                let merged = left.merged(&right)?;
                left_outcome += right_outcome;
                Ok((merged, left_outcome))
            },
        )?;

    histogram.merge(&partial)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InstanceRecord;

    fn sample() -> Vec<InstanceRecord> {
        (0..100u64)
            .map(|i| InstanceRecord::new(format!("class.C{}", i % 7).as_str(), i))
            .collect()
    }

    #[test]
    fn test_partitioned_matches_sequential() {
        let records = sample();

        let mut sequential = HeapHistogram::new();
        for r in &records {
            sequential.accumulate(r).unwrap();
        }

        for partitions in [1, 2, 3, 8, 200] {
            let mut parallel = HeapHistogram::new();
            let outcome =
                accumulate_partitioned(&mut parallel, &records, partitions, ErrorPolicy::Abort)
                    .unwrap();

            assert_eq!(parallel, sequential, "partitions = {}", partitions);
            assert_eq!(outcome.accumulated, 100);
        }
    }

    #[test]
    fn test_zero_partitions() {
        let mut histogram = HeapHistogram::new();
        let result = accumulate_partitioned(&mut histogram, &sample(), 0, ErrorPolicy::Abort);
        assert!(matches!(result, Err(HistogramError::InvalidArgument(_))));
    }

    #[test]
    fn test_abort_leaves_target_untouched() {
        let mut records = sample();
        records.push(InstanceRecord { class: None, size: Some(1) });

        let mut histogram = HeapHistogram::new();
        histogram.accumulate(&InstanceRecord::new("Existing", 4)).unwrap();
        let before = histogram.clone();

        let result = accumulate_partitioned(&mut histogram, &records, 4, ErrorPolicy::Abort);
        assert!(matches!(result, Err(HistogramError::Accumulation(_))));
        assert_eq!(histogram, before);
    }

    #[test]
    fn test_skip_counts_bad_instances() {
        let mut records = sample();
        records.push(InstanceRecord { class: None, size: Some(1) });
        records.push(InstanceRecord { class: Some("X".into()), size: None });

        let mut histogram = HeapHistogram::new();
        let outcome =
            accumulate_partitioned(&mut histogram, &records, 3, ErrorPolicy::Skip).unwrap();

        assert_eq!(outcome, FeedOutcome { accumulated: 100, skipped: 2 });
        assert_eq!(histogram.total_instances(), 100);
    }

    #[test]
    fn test_accumulate_with_policy_abort() {
        let mut histogram = HeapHistogram::new();
        let mut outcome = FeedOutcome::default();
        let bad = InstanceRecord { class: None, size: None };

        let result = accumulate_with_policy(&mut histogram, &bad, ErrorPolicy::Abort, &mut outcome);
        assert_eq!(result, Err(AccumulationError::UnresolvedClass));
        assert_eq!(outcome, FeedOutcome::default());
    }
}
