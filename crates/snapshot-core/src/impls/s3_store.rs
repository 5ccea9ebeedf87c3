//! S3ObjectStore - S3 互換ストア（AWS S3 / MinIO / R2 など）
//!
//! rust-s3 の `Bucket` を包み、native error を `StoreErrorKind` に分類します。
//! path-style アドレッシングが既定（MinIO 等のカスタム endpoint 向け）。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use serde::{Deserialize, Serialize};

use crate::domain::{SnapshotObject, StoreError};
use crate::ports::{ListPage, ObjectStore};

/// S3 接続設定（設定ファイルのキー名そのまま）
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Settings {
    pub bucket_name: String,

    /// 空なら `region` を AWS のリージョン名として解釈する
    #[serde(default)]
    pub endpoint: String,

    pub region: String,
    pub access_key: String,
    pub secret_key: String,

    #[serde(default = "default_path_style")]
    pub path_style: bool,
}

fn default_path_style() -> bool {
    true
}

impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Settings")
            .field("bucket_name", &self.bucket_name)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("path_style", &self.path_style)
            .finish()
    }
}

impl S3Settings {
    fn region(&self) -> Result<Region, StoreError> {
        if self.endpoint.trim().is_empty() {
            self.region
                .parse::<Region>()
                .map_err(|e| StoreError::other(format!("invalid region {}: {e}", self.region)))
        } else {
            Ok(Region::Custom {
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
            })
        }
    }
}

pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    /// 起動時に 1 回だけ作る。以降は読み取り専用で共有する
    pub fn new(settings: &S3Settings) -> Result<Self, StoreError> {
        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::unavailable(format!("invalid credentials: {e}")))?;

        let mut bucket =
            Bucket::new(&settings.bucket_name, settings.region()?, credentials).map_err(classify)?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }

        tracing::debug!(
            bucket = %settings.bucket_name,
            endpoint = %settings.endpoint,
            region = %settings.region,
            path_style = settings.path_style,
            "s3 object store configured"
        );
        Ok(Self { bucket })
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

/// rust-s3 のエラーを分類する
///
/// - 404（NoSuchKey / NoSuchBucket）→ NotFound
/// - 401 / 403 / 429 / 5xx、および HTTP に届かなかった失敗 → Unavailable
/// - それ以外の HTTP ステータス → Other
fn classify(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(404, body) => StoreError::not_found(body),
        S3Error::HttpFailWithBody(status, body)
            if matches!(status, 401 | 403 | 429) || status >= 500 =>
        {
            StoreError::unavailable(format!("http {status}: {body}"))
        }
        S3Error::HttpFailWithBody(status, body) => {
            StoreError::other(format!("http {status}: {body}"))
        }
        other => StoreError::unavailable(other.to_string()),
    }
}

fn parse_last_modified(key: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::other(format!("bad LastModified {raw:?} for {key}: {e}")))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StoreError> {
        let (result, _status) = self
            .bucket
            .list_page(prefix.to_string(), None, continuation, None, None)
            .await
            .map_err(classify)?;

        let objects = result
            .contents
            .into_iter()
            .map(|object| {
                let last_modified = parse_last_modified(&object.key, &object.last_modified)?;
                Ok(SnapshotObject::new(object.key, object.size, last_modified))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let next_continuation = if result.is_truncated {
            result.next_continuation_token
        } else {
            None
        };

        Ok(ListPage {
            objects,
            next_continuation,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let response = self.bucket.get_object(key).await.map_err(classify)?;
        match response.status_code() {
            200..=299 => Ok(response.bytes().to_vec()),
            404 => Err(StoreError::not_found(format!("NoSuchKey: {key}"))),
            status => Err(classify(S3Error::HttpFailWithBody(
                status,
                String::from_utf8_lossy(response.bytes()).into_owned(),
            ))),
        }
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        let secs = u32::try_from(expires_in.as_secs())
            .map_err(|_| StoreError::other(format!("expiry too large: {expires_in:?}")))?;
        self.bucket
            .presign_get(key, secs, None)
            .await
            .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreErrorKind;
    use rstest::rstest;

    fn settings() -> S3Settings {
        serde_json::from_value(serde_json::json!({
            "bucket_name": "snapshots",
            "access_key": "AKIDEXAMPLE",
            "secret_key": "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "endpoint": "http://127.0.0.1:9000",
            "region": "us-east-1"
        }))
        .unwrap()
    }

    #[rstest]
    #[case::no_such_key(404, StoreErrorKind::NotFound)]
    #[case::unauthorized(401, StoreErrorKind::Unavailable)]
    #[case::forbidden(403, StoreErrorKind::Unavailable)]
    #[case::throttled(429, StoreErrorKind::Unavailable)]
    #[case::internal(500, StoreErrorKind::Unavailable)]
    #[case::unavailable(503, StoreErrorKind::Unavailable)]
    #[case::bad_request(400, StoreErrorKind::Other)]
    #[case::conflict(409, StoreErrorKind::Other)]
    fn classify_http_status(#[case] status: u16, #[case] expected: StoreErrorKind) {
        let err = classify(S3Error::HttpFailWithBody(status, "<Error/>".to_string()));
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn settings_default_to_path_style() {
        assert!(settings().path_style);
    }

    #[test]
    fn settings_debug_hides_secret() {
        let out = format!("{:?}", settings());
        assert!(out.contains("AKIDEXAMPLE"));
        assert!(!out.contains("wJalrXUtnFEMI"));
    }

    #[test]
    fn custom_endpoint_becomes_custom_region() {
        let region = settings().region().unwrap();
        assert!(matches!(region, Region::Custom { ref endpoint, .. } if endpoint == "http://127.0.0.1:9000"));
    }

    #[test]
    fn last_modified_parses_s3_format() {
        let dt = parse_last_modified("k", "2024-02-01T00:00:00.000Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        let err = parse_last_modified("k", "yesterday").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Other);
    }

    #[tokio::test]
    async fn presign_is_local_and_carries_expiry() {
        let store = S3ObjectStore::new(&settings()).unwrap();
        assert_eq!(store.bucket_name(), "snapshots");
        let url = store
            .presign_get("btc/mainnet/2024-02-01T00-00-00.tar.gz", Duration::from_secs(900))
            .await
            .unwrap();
        assert!(url.starts_with("http://127.0.0.1:9000/snapshots/btc/mainnet/"));
        assert!(url.contains("X-Amz-Expires=900"));
    }
}
