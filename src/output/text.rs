//! Text report output writer.

use super::prepare_output_path;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a rendered report to any writer, newline terminated
pub fn write_text_to<W: Write>(text: &str, mut writer: W) -> Result<(), OutputError> {
    writer.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a rendered report to a file
///
/// **Public** - main entry point for text output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_text(text: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing histogram to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    write_text_to(text, BufWriter::new(file))?;

    info!("Histogram written successfully ({} bytes)", text.len());

    Ok(())
}
