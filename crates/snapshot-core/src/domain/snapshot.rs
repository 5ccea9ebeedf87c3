//! Snapshot model: objects, retrieval links and metadata documents.
//!
//! These are rebuilt from store listings on every request and never cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One object found under a namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotObject {
    /// Full object key, e.g. `btc/mainnet/2024-01-01T00-00-00.tar.gz`.
    pub key: String,

    /// Size in bytes.
    pub size: u64,

    pub last_modified: DateTime<Utc>,
}

impl SnapshotObject {
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }
}

/// A snapshot object plus a time-limited retrieval URL issued by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLink {
    #[serde(flatten)]
    pub object: SnapshotObject,

    /// Presigned URL. Validated by the store, never by us.
    pub url: String,

    pub expires_at: DateTime<Utc>,
}

/// The `snapshot-latest.json` document of a namespace.
///
/// Its schema belongs to whoever publishes snapshots; it is relayed as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotMetadata(serde_json::Value);

impl SnapshotMetadata {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}
