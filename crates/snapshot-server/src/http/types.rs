use chrono::{DateTime, Utc};
use serde::Serialize;
use snapshot_core::SnapshotLink;

#[derive(Debug, Serialize)]
pub(crate) struct KeysResponse {
    pub(crate) dirs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileItem {
    pub(crate) filename: String,
    pub(crate) size: u64,
    pub(crate) last_modified: DateTime<Utc>,
    pub(crate) url: String,
}

impl From<SnapshotLink> for FileItem {
    fn from(link: SnapshotLink) -> Self {
        Self {
            filename: link.object.key,
            size: link.object.size,
            last_modified: link.object.last_modified,
            url: link.url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LatestResponse {
    pub(crate) url: String,
    pub(crate) size: u64,
    pub(crate) last_modified: DateTime<Utc>,
}

impl From<SnapshotLink> for LatestResponse {
    fn from(link: SnapshotLink) -> Self {
        Self {
            url: link.url,
            size: link.object.size,
            last_modified: link.object.last_modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
}
