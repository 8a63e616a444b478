//! Streaming JSON instance reader.
//!
//! Accepts newline-delimited or concatenated JSON objects:
//! `{"class": "java.lang.String", "size": 24}` or `{"class_id": 4096, "size": 16}`.
//! Objects are decoded one at a time, the input is never buffered whole.

use super::InstanceRecord;
use crate::histogram::ClassIdentity;
use crate::utils::error::SourceError;
use serde::Deserialize;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::Read;

/// Raw JSON instance as written by a heap exporter
#[derive(Debug, Clone, Deserialize)]
struct RawInstance {
    /// Fully qualified class name
    #[serde(default, alias = "className")]
    class: Option<String>,

    /// Opaque class id, used when no name is present
    #[serde(default, alias = "classId")]
    class_id: Option<u64>,

    /// Shallow size in bytes
    #[serde(default, alias = "shallowSize")]
    size: Option<u64>,
}

impl From<RawInstance> for InstanceRecord {
    fn from(raw: RawInstance) -> Self {
        let class = raw
            .class
            .map(ClassIdentity::Named)
            .or(raw.class_id.map(ClassIdentity::Id));

        InstanceRecord {
            class,
            size: raw.size,
        }
    }
}

/// Lazy reader over a JSON instance stream
pub struct JsonInstanceReader<R: Read> {
    stream: StreamDeserializer<'static, IoRead<R>, RawInstance>,
}

impl<R: Read> JsonInstanceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }
}

impl<R: Read> Iterator for JsonInstanceReader<R> {
    type Item = Result<InstanceRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream
            .next()
            .map(|item| item.map(InstanceRecord::from).map_err(SourceError::from))
    }
}
