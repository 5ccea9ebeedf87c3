//! snapshot-core
//!
//! Core building blocks for the snapshot service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Namespace, SnapshotObject, SnapshotLink, SnapshotMetadata, errors）
//! - **ports**: 抽象化レイヤー（ObjectStore, Clock）
//! - **app**: アプリケーションロジック（SnapshotResolver, ResolverBuilder）
//! - **impls**: 実装（InMemoryObjectStore, S3ObjectStore）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ResolverBuilder, SnapshotResolver};
pub use domain::{Namespace, ResolverError, SnapshotLink, SnapshotMetadata, SnapshotObject};
