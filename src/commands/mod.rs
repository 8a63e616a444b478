//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod histo;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use histo::{
    build_histogram, execute_histo, render, run_histo, validate_args, HistoOutcome,
};
pub use models::HistoArgs;
pub use utils::{display_schema, display_version};
