//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryObjectStore**: 開発・テスト用のストア
//! - **S3ObjectStore**: S3 互換ストア（本番用）

pub mod inmem_store;
pub mod s3_store;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryObjectStore;
pub use self::s3_store::{S3ObjectStore, S3Settings};
