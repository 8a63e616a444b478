//! Histo command implementation.
//!
//! The histo command:
//! 1. Opens the instance listing
//! 2. Accumulates every instance into a class histogram
//! 3. Ranks classes and renders the report
//! 4. Writes the report to a file or stdout

use super::models::HistoArgs;
use crate::histogram::{
    accumulate_partitioned, accumulate_with_policy, FeedOutcome, HeapHistogram, HistogramReport,
};
use crate::output::{report_to_string, write_report, write_text, write_text_to, ReportFormat};
use crate::source::{open_source, InstanceRecord};
use crate::utils::config::{HISTO_FAILURE_CONTEXT, PARTITION_BATCH_SIZE};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Result of a histo run
#[derive(Debug, Clone)]
pub struct HistoOutcome {
    /// Histogram over every accumulated instance
    pub histogram: HeapHistogram,

    /// Accumulated / skipped counters
    pub feed: FeedOutcome,

    /// Report exactly as written
    pub rendered: String,
}

/// Execute the histo command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Heap listing cannot be opened or read
/// * An instance fails to accumulate under `ErrorPolicy::Abort`
/// * Output cannot be written
pub fn execute_histo(args: HistoArgs) -> Result<HistoOutcome> {
    let start_time = Instant::now();

    info!("Building class histogram for: {}", args.dump_path.display());

    // Step 1: Accumulate
    info!("Step 1/2: Accumulating instances...");
    let (histogram, feed) = build_histogram(&args)?;

    info!(
        "Accumulated {} instances across {} classes ({} skipped)",
        feed.accumulated,
        histogram.class_count(),
        feed.skipped
    );

    // Step 2: Render and write
    info!("Step 2/2: Rendering top {} classes...", args.limit);
    let (rendered, report) = render_with_report(&histogram, &args)?;

    match &args.output {
        Some(path) => match &report {
            Some(report) => write_report(report, path).context("Failed to write JSON report")?,
            None => write_text(&rendered, path).context("Failed to write histogram")?,
        },
        None => write_text_to(&rendered, std::io::stdout().lock())
            .context("Failed to write histogram to stdout")?,
    }

    let elapsed = start_time.elapsed();
    info!("Histogram completed in {:.2}s", elapsed.as_secs_f64());

    Ok(HistoOutcome {
        histogram,
        feed,
        rendered,
    })
}

/// Accumulate every instance of the listing named by `args`
///
/// **Public** - usable without rendering
///
/// Source errors always abort; per-instance failures follow `args.error_policy`.
pub fn build_histogram(args: &HistoArgs) -> Result<(HeapHistogram, FeedOutcome)> {
    let stream = open_source(&args.dump_path, args.input_format)
        .with_context(|| format!("Failed to open heap dump {}", args.dump_path.display()))?;

    let mut histogram = HeapHistogram::new();
    let mut outcome = FeedOutcome::default();

    if args.partitions > 1 {
        debug!("Partitioned accumulation across {} partitions", args.partitions);

        let mut batch: Vec<InstanceRecord> = Vec::with_capacity(PARTITION_BATCH_SIZE);
        for item in stream {
            batch.push(item.context("Failed to read instance record")?);
            if batch.len() == PARTITION_BATCH_SIZE {
                outcome += flush_batch(&mut histogram, &mut batch, args)?;
            }
        }
        outcome += flush_batch(&mut histogram, &mut batch, args)?;
    } else {
        for (index, item) in stream.enumerate() {
            let record = item.context("Failed to read instance record")?;
            accumulate_with_policy(&mut histogram, &record, args.error_policy, &mut outcome)
                .with_context(|| format!("Failed to accumulate instance #{}", index + 1))?;
        }
    }

    Ok((histogram, outcome))
}

/// Validate and execute the histo command
///
/// **Public** - what the CLI runs
///
/// Every failure, validation included, carries the same outer context.
pub fn run_histo(args: HistoArgs) -> Result<HistoOutcome> {
    validate_args(&args)
        .and_then(|_| execute_histo(args))
        .context(HISTO_FAILURE_CONTEXT)
}

/// Render a histogram in the requested format
pub fn render(histogram: &HeapHistogram, args: &HistoArgs) -> Result<String> {
    render_with_report(histogram, args).map(|(rendered, _)| rendered)
}

/// Render a histogram, keeping the JSON report the text was produced from
///
/// **Private** - the report is built once so its timestamp matches what is written
fn render_with_report(
    histogram: &HeapHistogram,
    args: &HistoArgs,
) -> Result<(String, Option<HistogramReport>)> {
    match args.report_format {
        ReportFormat::Text => Ok((histogram.format_top(args.limit), None)),
        ReportFormat::Json => {
            let report = histogram.to_report(args.limit);
            let rendered =
                report_to_string(&report).context("Failed to serialize JSON report")?;
            Ok((rendered, Some(report)))
        }
    }
}

/// Validate histo arguments
///
/// **Public** - can be called before execute_histo for early validation
pub fn validate_args(args: &HistoArgs) -> Result<()> {
    if args.dump_path.as_os_str().is_empty() {
        anyhow::bail!("Heap dump path cannot be empty");
    }

    if !args.dump_path.is_file() {
        anyhow::bail!("Heap dump not found: {}", args.dump_path.display());
    }

    if args.partitions == 0 {
        anyhow::bail!("partitions must be greater than 0");
    }

    Ok(())
}

/// Accumulate and clear one batch of records
///
/// **Private** - internal helper for build_histogram
fn flush_batch(
    histogram: &mut HeapHistogram,
    batch: &mut Vec<InstanceRecord>,
    args: &HistoArgs,
) -> Result<FeedOutcome> {
    let outcome = accumulate_partitioned(histogram, batch, args.partitions, args.error_policy)
        .context("Failed to accumulate instance batch")?;
    batch.clear();
    Ok(outcome)
}
