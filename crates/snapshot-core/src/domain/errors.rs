//! Errors - エラー型と分類
//!
//! ストア固有のエラー表現（HTTP status, S3 error code など）は adapter 側で
//! `StoreErrorKind` に分類してから core に渡します。Resolver はこの分類だけを見ます。

use std::fmt;

use thiserror::Error;

/// StoreErrorKind はオブジェクトストアのエラー分類
///
/// - NotFound: キーが存在しない（想定内）
/// - Unavailable: 接続・認証・一時的な障害
/// - Other: それ以外（レスポンスの解釈失敗など）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    Unavailable,
    Other,
}

/// StoreError は ObjectStore port が返すエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error (kind: {:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for StoreError {}

/// ResolverError は Resolver の 4 操作が返すエラー
///
/// NotFound は「想定内の空結果」、StoreUnavailable は障害。
/// façade 側はこの区別だけでレスポンスを決められます。
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("object store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed metadata at {key}: {source}")]
    MalformedMetadata {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ResolverError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolverError::NotFound(_))
    }
}
