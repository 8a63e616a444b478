//! Instance sources.
//!
//! This module is the input boundary of the histogram:
//! - The `Instance` trait (class identity + shallow size)
//! - `InstanceRecord`, the concrete record the readers produce
//! - Line-oriented text and streaming JSON readers
//!
//! How instances were parsed out of a heap dump is not a concern here;
//! any lazy iterator of records can feed a histogram.

pub mod json;
pub mod text;

use crate::histogram::ClassIdentity;
use crate::utils::config::JSON_EXTENSIONS;
use crate::utils::error::{AccumulationError, SourceError};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use json::JsonInstanceReader;
pub use text::TextInstanceReader;

/// One heap object as seen by the histogram
pub trait Instance {
    /// Class the instance belongs to
    fn class_identity(&self) -> Result<ClassIdentity, AccumulationError>;

    /// Bytes occupied by the instance itself
    fn shallow_size(&self) -> Result<u64, AccumulationError>;
}

/// Instance descriptor read from a heap listing
///
/// Either field may be missing when the producer could not resolve it;
/// that surfaces as an `AccumulationError` when the record is accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub class: Option<ClassIdentity>,
    pub size: Option<u64>,
}

impl InstanceRecord {
    pub fn new(class: impl Into<ClassIdentity>, size: u64) -> Self {
        Self {
            class: Some(class.into()),
            size: Some(size),
        }
    }
}

impl Instance for InstanceRecord {
    fn class_identity(&self) -> Result<ClassIdentity, AccumulationError> {
        self.class.clone().ok_or(AccumulationError::UnresolvedClass)
    }

    fn shallow_size(&self) -> Result<u64, AccumulationError> {
        let class = self.class_identity()?;
        self.size.ok_or(AccumulationError::UnknownSize { class })
    }
}

/// Boxed lazy stream of instance records
pub type InstanceStream = Box<dyn Iterator<Item = Result<InstanceRecord, SourceError>>>;

/// Input format of an instance listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceFormat {
    /// Pick by file extension
    #[default]
    Auto,
    /// `<class> <size>` per line
    Text,
    /// Stream of JSON objects
    Json,
}

impl SourceFormat {
    /// Resolve `Auto` against a path
    pub fn resolve(self, path: &Path) -> SourceFormat {
        match self {
            SourceFormat::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| JSON_EXTENSIONS.iter().any(|j| ext.eq_ignore_ascii_case(j)))
                    .unwrap_or(false);
                if is_json {
                    SourceFormat::Json
                } else {
                    SourceFormat::Text
                }
            }
            other => other,
        }
    }
}

/// Open an instance listing as a lazy record stream
///
/// **Public** - main entry point for reading heap listings
///
/// # Errors
/// * `SourceError::Io` - the file cannot be opened
pub fn open_source(
    path: impl AsRef<Path>,
    format: SourceFormat,
) -> Result<InstanceStream, SourceError> {
    let path = path.as_ref();
    let format = format.resolve(path);

    debug!("Opening instance source {} as {:?}", path.display(), format);

    let reader = BufReader::new(File::open(path)?);

    let stream: InstanceStream = match format {
        SourceFormat::Json => Box::new(JsonInstanceReader::new(reader)),
        _ => Box::new(TextInstanceReader::new(reader)),
    };

    Ok(stream)
}
