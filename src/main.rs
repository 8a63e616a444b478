//! Heap Histo CLI
//!
//! Builds a class histogram (instance count and shallow bytes per class)
//! from an instance listing extracted from a heap dump.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use heap_histo::commands::{display_schema, display_version, run_histo, HistoArgs};
use heap_histo::histogram::{ErrorPolicy, RowLimit};
use heap_histo::output::ReportFormat;
use heap_histo::source::SourceFormat;

/// Heap Histo - class histograms for heap snapshots
#[derive(Parser, Debug)]
#[command(name = "heap-histo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Class histogram
    Histo {
        /// Instance listing to read
        #[arg(short = 'd', long = "dump")]
        dump: PathBuf,

        /// Number of classes to print, or "all"
        #[arg(
            long,
            default_value = "all",
            env = "HEAP_HISTO_TOP",
            allow_negative_numbers = true,
            value_parser = parse_limit
        )]
        top: RowLimit,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Listing format
        #[arg(long, value_enum, default_value_t = SourceFormat::Auto)]
        input_format: SourceFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip instances whose class or size cannot be resolved
        #[arg(long)]
        skip_errors: bool,

        /// Accumulate across this many parallel partitions
        #[arg(long, default_value = "1", env = "HEAP_HISTO_PARTITIONS")]
        partitions: usize,
    },

    /// Display report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Histo {
            dump,
            top,
            format,
            input_format,
            output,
            skip_errors,
            partitions,
        } => {
            let args = HistoArgs {
                dump_path: dump,
                input_format,
                limit: top,
                report_format: format,
                output,
                error_policy: if skip_errors {
                    ErrorPolicy::Skip
                } else {
                    ErrorPolicy::Abort
                },
                partitions,
            };

            run_histo(args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Parse `--top`
///
/// **Private** - clap value parser
fn parse_limit(s: &str) -> Result<RowLimit, String> {
    s.parse::<RowLimit>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_of(cli: Cli) -> RowLimit {
        match cli.command {
            Commands::Histo { top, .. } => top,
            other => panic!("expected histo, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("all"), Ok(RowLimit::Unbounded));
        assert_eq!(parse_limit("7"), Ok(RowLimit::Top(7)));
        assert!(parse_limit("-1").unwrap_err().contains("must not be negative"));
        assert!(parse_limit("lots").is_err());
    }

    #[test]
    fn test_cli_top_values() {
        let cli = Cli::try_parse_from(["heap-histo", "histo", "-d", "heap.txt", "--top", "all"])
            .unwrap();
        assert_eq!(top_of(cli), RowLimit::Unbounded);

        let cli = Cli::try_parse_from(["heap-histo", "histo", "-d", "heap.txt", "--top", "5"])
            .unwrap();
        assert_eq!(top_of(cli), RowLimit::Top(5));
    }

    #[test]
    fn test_cli_rejects_negative_top() {
        let result = Cli::try_parse_from(["heap-histo", "histo", "-d", "heap.txt", "--top", "-1"]);
        assert!(result.is_err());
    }
}
