//! ResolverBuilder - Resolver の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 依存はすべてコンストラクタ経由で注入（グローバル状態を持たない）

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use super::resolver::{LINK_TTL, SnapshotResolver};
use crate::ports::{Clock, ObjectStore, SystemClock};

/// S3 の presigned URL の上限（7 日）
pub const MAX_LINK_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// ResolverBuilder は SnapshotResolver を構築
///
/// # 使用例
/// ```ignore
/// let resolver = ResolverBuilder::new()
///     .store(Arc::new(S3ObjectStore::new(&settings)?))
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - store が未設定なら BuildError::MissingStore
/// - link_ttl が 0 または 7 日超なら BuildError::InvalidLinkTtl
pub struct ResolverBuilder {
    store: Option<Arc<dyn ObjectStore>>,
    clock: Arc<dyn Clock>,
    link_ttl: Duration,
}

/// BuildError は Resolver 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No object store configured. Call ResolverBuilder::store() before build().")]
    MissingStore,

    #[error("Link TTL {0:?} is out of range (must be > 0 and <= 7 days).")]
    InvalidLinkTtl(Duration),
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: Arc::new(SystemClock),
            link_ttl: LINK_TTL,
        }
    }

    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// presigned URL の有効期間（既定 15 分）
    pub fn link_ttl(mut self, link_ttl: Duration) -> Self {
        self.link_ttl = link_ttl;
        self
    }

    pub fn build(self) -> Result<SnapshotResolver, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        if self.link_ttl.is_zero() || self.link_ttl > MAX_LINK_TTL {
            return Err(BuildError::InvalidLinkTtl(self.link_ttl));
        }
        let delta = TimeDelta::from_std(self.link_ttl)
            .map_err(|_| BuildError::InvalidLinkTtl(self.link_ttl))?;
        Ok(SnapshotResolver::from_parts(
            store,
            self.clock,
            self.link_ttl,
            delta,
        ))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryObjectStore;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_build_success_with_defaults() {
        let resolver = ResolverBuilder::new()
            .store(Arc::new(InMemoryObjectStore::new("b")))
            .build()
            .unwrap();
        assert_eq!(resolver.link_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn test_build_missing_store() {
        let result = ResolverBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingStore)));
    }

    #[test]
    fn test_build_rejects_zero_and_oversized_ttl() {
        for ttl in [Duration::ZERO, MAX_LINK_TTL + Duration::from_secs(1)] {
            let result = ResolverBuilder::new()
                .store(Arc::new(InMemoryObjectStore::new("b")))
                .link_ttl(ttl)
                .build();
            assert!(matches!(result, Err(BuildError::InvalidLinkTtl(d)) if d == ttl));
        }
    }

    #[tokio::test]
    async fn test_custom_clock_and_ttl_shape_links() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let store = Arc::new(InMemoryObjectStore::new("b"));
        store.put("btc/mainnet/a", vec![0], now);

        let resolver = ResolverBuilder::new()
            .store(store)
            .clock(Arc::new(FixedClock::new(now)))
            .link_ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        let link = resolver
            .get_latest_snapshot("btc", "mainnet")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(link.expires_at, now + TimeDelta::seconds(60));
        assert!(link.url.ends_with("X-Amz-Expires=60"));
    }
}
