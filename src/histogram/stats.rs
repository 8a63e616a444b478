//! Aggregation key and per-class accumulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key identifying a runtime class
///
/// Names are used when the heap source can resolve them; otherwise the
/// opaque class id is kept. Ordering puts every `Named` before every `Id`,
/// names compare byte-wise and ids numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassIdentity {
    /// Fully qualified class name (e.g. `java.lang.String`)
    Named(String),

    /// Opaque numeric class id
    Id(u64),
}

impl ClassIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        ClassIdentity::Named(name.into())
    }

    pub fn id(id: u64) -> Self {
        ClassIdentity::Id(id)
    }

    /// Parse a class token as written by a heap listing
    ///
    /// `0x`-prefixed hex becomes an `Id`, anything else is a name.
    pub fn parse(token: &str) -> Self {
        token
            .strip_prefix("0x")
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .map(ClassIdentity::Id)
            .unwrap_or_else(|| ClassIdentity::Named(token.to_string()))
    }
}

impl fmt::Display for ClassIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassIdentity::Named(name) => f.write_str(name),
            ClassIdentity::Id(id) => write!(f, "0x{:x}", id),
        }
    }
}

impl From<&str> for ClassIdentity {
    fn from(name: &str) -> Self {
        ClassIdentity::Named(name.to_string())
    }
}

/// Per-class counters
///
/// Both fields only grow while a histogram is being built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Number of instances seen
    pub instance_count: u64,

    /// Sum of shallow sizes in bytes
    pub total_shallow_bytes: u64,
}

impl ClassStats {
    pub fn new(instance_count: u64, total_shallow_bytes: u64) -> Self {
        Self {
            instance_count,
            total_shallow_bytes,
        }
    }

    /// Sum of two stats, `None` if either counter would overflow
    pub fn checked_add(&self, other: &ClassStats) -> Option<ClassStats> {
        Some(ClassStats {
            instance_count: self.instance_count.checked_add(other.instance_count)?,
            total_shallow_bytes: self
                .total_shallow_bytes
                .checked_add(other.total_shallow_bytes)?,
        })
    }
}
