//! InMemoryObjectStore - 開発用のオブジェクトストア
//!
//! # 学習ポイント
//! - BTreeMap の range でキー順ページングを再現
//! - continuation token = 前ページ最後のキー（S3 の start-after と同じ考え方）
//! - 障害注入（一覧失敗・取得失敗・presign 失敗）でエラー経路をテストする

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SnapshotObject, StoreError, StoreErrorKind};
use crate::ports::{ListPage, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

struct StoredObject {
    body: Vec<u8>,
    last_modified: DateTime<Utc>,
}

#[derive(Default)]
struct Faults {
    list: Option<StoreErrorKind>,
    get: Option<StoreErrorKind>,
    presign_keys: HashSet<String>,
}

/// InMemoryObjectStore は開発・テスト用のストア
///
/// # 実装詳細
/// - BTreeMap<String, StoredObject> でキー順に保持
/// - `page_size` 件ごとにページを切る（S3 の既定は 1000）
/// - presign 呼び出し回数を数える（テストで「余計に発行していない」ことを確認）
///
/// # 使用例
/// ```ignore
/// let store = InMemoryObjectStore::new("snapshots").with_page_size(2);
/// store.put("btc/mainnet/2024-01-01.tar.gz", b"...".to_vec(), Utc::now());
/// ```
pub struct InMemoryObjectStore {
    bucket: String,
    page_size: usize,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    faults: Mutex<Faults>,
    presign_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            page_size: DEFAULT_PAGE_SIZE,
            objects: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(Faults::default()),
            presign_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// 1 ページの件数を変更（0 は 1 として扱う）
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn put(&self, key: impl Into<String>, body: Vec<u8>, last_modified: DateTime<Utc>) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(key.into(), StoredObject { body, last_modified });
        }
    }

    /// 以降の list_page を `kind` で失敗させる
    pub fn fail_listing(&self, kind: StoreErrorKind) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.list = Some(kind);
        }
    }

    /// 以降の get_object を `kind` で失敗させる
    pub fn fail_get(&self, kind: StoreErrorKind) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.get = Some(kind);
        }
    }

    /// 指定キーの presign を失敗させる
    pub fn fail_presign(&self, key: impl Into<String>) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.presign_keys.insert(key.into());
        }
    }

    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn injected(
        &self,
        pick: impl FnOnce(&Faults) -> Option<StoreErrorKind>,
        what: &str,
    ) -> Result<(), StoreError> {
        let faults = self
            .faults
            .lock()
            .map_err(|e| StoreError::other(format!("fault table poisoned: {e}")))?;
        match pick(&faults) {
            Some(kind) => Err(StoreError::new(kind, format!("injected {what} failure"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(|f| f.list, "list")?;

        let objects = self
            .objects
            .lock()
            .map_err(|e| StoreError::other(format!("object table poisoned: {e}")))?;

        let lower = match &continuation {
            Some(token) => Bound::Excluded(token.clone()),
            None => Bound::Unbounded,
        };

        let mut matching = objects
            .range((lower, Bound::Unbounded))
            .filter(|(key, _)| key.starts_with(prefix));

        let page: Vec<SnapshotObject> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, stored)| {
                SnapshotObject::new(key.clone(), stored.body.len() as u64, stored.last_modified)
            })
            .collect();

        let next_continuation = match (matching.next(), page.last()) {
            (Some(_), Some(last)) => Some(last.key.clone()),
            _ => None,
        };

        Ok(ListPage {
            objects: page,
            next_continuation,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.injected(|f| f.get, "get")?;

        let objects = self
            .objects
            .lock()
            .map_err(|e| StoreError::other(format!("object table poisoned: {e}")))?;
        objects
            .get(key)
            .map(|stored| stored.body.clone())
            .ok_or_else(|| StoreError::not_found(format!("NoSuchKey: {key}")))
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        self.injected(
            |f| {
                f.presign_keys
                    .contains(key)
                    .then_some(StoreErrorKind::Unavailable)
            },
            "presign",
        )?;
        Ok(format!(
            "memory://{}/{}?X-Amz-Expires={}",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }
}
