//! SnapshotResolver - スナップショット解決ロジック
//!
//! ObjectStore に対する 4 つの読み取り操作を提供します。
//!
//! | 操作 | 内容 |
//! |---|---|
//! | `list_namespaces` | バケット全体から `protocol/network` を列挙 |
//! | `list_snapshot_files` | namespace 配下の全オブジェクト + presigned URL |
//! | `get_latest_snapshot` | キーの辞書順で最大のスナップショット |
//! | `get_snapshot_info` | `snapshot-latest.json` をそのまま返す |
//!
//! # 設計原則
//! - ステートレス（共有可変状態なし、`Arc` で共有して並行に呼べる）
//! - リトライしない。ストアの失敗は即座に呼び出し元へ
//! - 複数オブジェクトを扱う操作は all-or-nothing（部分結果を返さない）

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use crate::domain::{
    Namespace, ResolverError, SnapshotLink, SnapshotMetadata, SnapshotObject, StoreErrorKind,
};
use crate::ports::{Clock, ObjectStore, SystemClock};

/// presigned URL の有効期間（発行から 15 分）
pub const LINK_TTL: Duration = Duration::from_secs(15 * 60);

pub struct SnapshotResolver {
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    link_ttl: Duration,
    link_ttl_delta: TimeDelta,
}

impl SnapshotResolver {
    /// 既定の設定（SystemClock, 15 分）で作成
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            link_ttl: LINK_TTL,
            link_ttl_delta: TimeDelta::minutes(15),
        }
    }

    /// builder から呼ばれる。`link_ttl` と `link_ttl_delta` は同じ長さであること
    pub(crate) fn from_parts(
        store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
        link_ttl: Duration,
        link_ttl_delta: TimeDelta,
    ) -> Self {
        Self {
            store,
            clock,
            link_ttl,
            link_ttl_delta,
        }
    }

    pub fn link_ttl(&self) -> Duration {
        self.link_ttl
    }

    /// バケット内のキーから namespace を列挙する
    ///
    /// 2 セグメント未満のキーは無視。全ページを読む。
    pub async fn list_namespaces(&self) -> Result<BTreeSet<Namespace>, ResolverError> {
        let mut namespaces = BTreeSet::new();
        let mut scanned = 0usize;
        self.for_each_object("", |object| {
            scanned += 1;
            if let Some(ns) = Namespace::from_key(&object.key) {
                namespaces.insert(ns);
            }
        })
        .await?;

        tracing::debug!(scanned, namespaces = namespaces.len(), "namespaces discovered");
        Ok(namespaces)
    }

    /// namespace 配下の全オブジェクトについて presigned URL を発行する
    ///
    /// 一覧が全部取れてから presign する。1 件でも presign に失敗したら全体を失敗にする。
    pub async fn list_snapshot_files(
        &self,
        protocol: &str,
        network: &str,
    ) -> Result<Vec<SnapshotLink>, ResolverError> {
        let ns = Namespace::new(protocol, network);
        let mut matched = Vec::new();
        self.for_each_object(&ns.prefix(), |object| {
            if ns.matches_loosely(&object.key) {
                matched.push(object);
            }
        })
        .await?;

        let mut links = Vec::with_capacity(matched.len());
        for object in matched {
            links.push(self.presign(object).await?);
        }

        tracing::debug!(namespace = %ns, files = links.len(), "snapshot files listed");
        Ok(links)
    }

    /// キーが辞書順（バイト列比較）で最大のスナップショットを選ぶ
    ///
    /// `lastModified` は見ない。キーに時刻が埋め込まれている前提。
    /// `snapshot-latest.json` は候補から除外。候補がなければ `Ok(None)`。
    pub async fn get_latest_snapshot(
        &self,
        protocol: &str,
        network: &str,
    ) -> Result<Option<SnapshotLink>, ResolverError> {
        let ns = Namespace::new(protocol, network);
        let mut latest: Option<SnapshotObject> = None;
        self.for_each_object(&ns.prefix(), |object| {
            if ns.is_metadata_key(&object.key) {
                return;
            }
            if latest
                .as_ref()
                .is_none_or(|current| object.key > current.key)
            {
                latest = Some(object);
            }
        })
        .await?;

        let Some(object) = latest else {
            tracing::debug!(namespace = %ns, "no snapshot present");
            return Ok(None);
        };

        tracing::debug!(namespace = %ns, key = %object.key, "latest snapshot selected");
        self.presign(object).await.map(Some)
    }

    /// `protocol/network/snapshot-latest.json` を取得して JSON として返す
    pub async fn get_snapshot_info(
        &self,
        protocol: &str,
        network: &str,
    ) -> Result<SnapshotMetadata, ResolverError> {
        let key = Namespace::new(protocol, network).metadata_key();
        let body = match self.store.get_object(&key).await {
            Ok(body) => body,
            Err(err) if err.kind() == StoreErrorKind::NotFound => {
                return Err(ResolverError::NotFound(key));
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "metadata fetch failed");
                return Err(ResolverError::StoreUnavailable(err));
            }
        };

        SnapshotMetadata::from_slice(&body).map_err(|source| {
            tracing::warn!(%key, error = %source, "metadata is not valid json");
            ResolverError::MalformedMetadata { key, source }
        })
    }

    /// prefix 配下を最後のページまで読み、1 件ずつ `visit` に渡す
    ///
    /// 一覧の失敗はどのページであっても StoreUnavailable。
    async fn for_each_object(
        &self,
        prefix: &str,
        mut visit: impl FnMut(SnapshotObject),
    ) -> Result<(), ResolverError> {
        let mut continuation = None;
        loop {
            let page = self
                .store
                .list_page(prefix, continuation)
                .await
                .map_err(|err| {
                    tracing::warn!(prefix, error = %err, "listing failed");
                    ResolverError::StoreUnavailable(err)
                })?;

            page.objects.into_iter().for_each(&mut visit);

            match page.next_continuation {
                Some(token) => continuation = Some(token),
                None => return Ok(()),
            }
        }
    }

    async fn presign(&self, object: SnapshotObject) -> Result<SnapshotLink, ResolverError> {
        let url = self
            .store
            .presign_get(&object.key, self.link_ttl)
            .await
            .map_err(|err| {
                tracing::warn!(key = %object.key, error = %err, "presign failed");
                ResolverError::StoreUnavailable(err)
            })?;

        Ok(SnapshotLink {
            expires_at: self.clock.now() + self.link_ttl_delta,
            object,
            url,
        })
    }
}
