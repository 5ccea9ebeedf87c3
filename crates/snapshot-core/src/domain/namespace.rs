//! Namespace: the `(protocol, network)` pair that identifies a snapshot series.
//!
//! Every object key in the bucket is expected to look like
//! `protocol/network/<artifact>`. The first two `/`-separated segments form
//! the namespace; `snapshot-latest.json` under that prefix is the metadata
//! sentinel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed file name of the per-namespace metadata document.
pub const METADATA_FILE: &str = "snapshot-latest.json";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    protocol: String,
    network: String,
}

impl Namespace {
    pub fn new(protocol: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            network: network.into(),
        }
    }

    /// Derive the namespace from an object key.
    ///
    /// Returns `None` for keys with fewer than two segments (no `/` at all).
    /// An empty second segment (`"btc/"`) still counts as two segments.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut segments = key.split('/');
        let protocol = segments.next()?;
        let network = segments.next()?;
        Some(Self::new(protocol, network))
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Listing prefix, always with a trailing slash.
    pub fn prefix(&self) -> String {
        format!("{}/{}/", self.protocol, self.network)
    }

    pub fn metadata_key(&self) -> String {
        format!("{}{}", self.prefix(), METADATA_FILE)
    }

    pub fn is_metadata_key(&self, key: &str) -> bool {
        key.strip_prefix(self.prefix().as_str()) == Some(METADATA_FILE)
    }

    /// Loose containment check layered on top of the prefix listing.
    ///
    /// Kept for compatibility: a key is accepted only if it contains both the
    /// protocol and the network as substrings, anywhere in the key.
    pub fn matches_loosely(&self, key: &str) -> bool {
        key.contains(self.protocol.as_str()) && key.contains(self.network.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.protocol, self.network)
    }
}
