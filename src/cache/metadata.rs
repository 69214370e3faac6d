//! Per-entry metadata stream

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stream holding the entry payload
pub const DATA_STREAM: &str = "data";

/// Stream holding [`EntryMetadata`] as JSON
pub const METADATA_STREAM: &str = "metadata";

/// Metadata written alongside every entry stored with `Cache::set`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// When the entry was written
    pub created_at: DateTime<Utc>,

    /// Payload size in bytes
    pub size: u64,

    /// Caller-supplied annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl EntryMetadata {
    /// Metadata for a payload of `size` bytes written now
    pub fn new(size: u64, extra: BTreeMap<String, String>) -> Self {
        Self {
            created_at: Utc::now(),
            size,
            extra,
        }
    }
}
