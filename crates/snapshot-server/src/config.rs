//! Config - JSON 設定ファイルの読み込み
//!
//! 起動時に 1 回だけ読み、以降は `Arc<Config>` として読み取り専用で共有します。

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use snapshot_core::impls::S3Settings;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:8080",
    "http://localhost:8081",
    "http://cryptosnapshotservice.com",
    "http://api.cryptoservice.com",
];

/// 設定ファイルの形
///
/// ```json
/// {
///   "file_path": "/var/lib/snapshots",
///   "bucket_name": "snapshots",
///   "access_key": "...",
///   "secret_key": "...",
///   "endpoint": "https://s3.example.com",
///   "region": "us-east-1"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// ローカルの作業ディレクトリ。core は使わない（運用側の参照用）
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(flatten)]
    pub store: S3Settings,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// 相対パスはカレントディレクトリ基準で解決する
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let abs = std::path::absolute(path)
            .with_context(|| format!("failed to resolve config path {}", path.display()))?;
        let raw = std::fs::read(&abs)
            .with_context(|| format!("failed to read config file {}", abs.display()))?;
        let config: Config = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse config file {}", abs.display()))?;
        if config.store.bucket_name.trim().is_empty() {
            anyhow::bail!("bucket_name must not be empty in {}", abs.display());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_original_shape_with_defaults() {
        let file = write_config(
            r#"{
                "file_path": "/tmp/snapshots",
                "bucket_name": "snapshots",
                "access_key": "ak",
                "secret_key": "sk",
                "endpoint": "https://s3.example.com",
                "region": "eu-central-1"
            }"#,
        );
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.store.bucket_name, "snapshots");
        assert_eq!(config.store.endpoint, "https://s3.example.com");
        assert_eq!(config.store.region, "eu-central-1");
        assert!(config.store.path_style);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/snapshots")));
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.cors_origins.len(), 4);
    }

    #[test]
    fn overrides_listen_and_cors() {
        let file = write_config(
            r#"{
                "bucket_name": "b", "access_key": "ak", "secret_key": "sk", "region": "us-east-1",
                "listen_addr": "127.0.0.1:9999",
                "cors_origins": ["https://app.example.com"]
            }"#,
        );
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9999");
        assert_eq!(config.cors_origins, vec!["https://app.example.com"]);
        assert_eq!(config.file_path, None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load_from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn rejects_bad_json_and_empty_bucket() {
        let file = write_config("{ not json");
        assert!(Config::load_from_path(file.path()).is_err());

        let file = write_config(
            r#"{"bucket_name": " ", "access_key": "a", "secret_key": "s", "region": "r"}"#,
        );
        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("bucket_name"));
    }
}
