//! ObjectStore port - バケット型オブジェクトストア（S3 互換 / InMemory）
//!
//! Resolver がストアに求める能力は 4 つだけです：
//! - prefix 指定の一覧取得（ページング付き）
//! - キー指定のオブジェクト取得
//! - 期限付き presigned URL の発行
//! - エラーの分類（`StoreErrorKind`）
//!
//! # 実装
//! - **InMemoryObjectStore**: 開発・テスト用
//! - **S3ObjectStore**: rust-s3 による S3 互換ストア

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{SnapshotObject, StoreError};

/// 一覧取得 1 ページ分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<SnapshotObject>,

    /// 次ページの continuation token。`None` なら一覧は完了
    pub next_continuation: Option<String>,
}

impl ListPage {
    pub fn is_last(&self) -> bool {
        self.next_continuation.is_none()
    }
}

/// ObjectStore はスナップショットを保持するバケットへの読み取り口
///
/// # 設計原則
/// - 読み取り専用（書き込み経路は持たない）
/// - エラー分類は adapter の責務（core は native error を見ない）
/// - `Send + Sync`（複数リクエストから同時に使える）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `prefix` で始まるキーを 1 ページ分返す。空文字列ならバケット全体
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StoreError>;

    /// オブジェクト本体を取得
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// `expires_in` だけ有効な GET 用 presigned URL を発行
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError>;
}
