//! App - アプリケーション層
//!
//! ports を組み合わせてスナップショット解決ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **ResolverBuilder**: Resolver の構築とワイヤリング
//! - **SnapshotResolver**: 4 つの読み取り操作

pub mod builder;
pub mod resolver;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ResolverBuilder};
pub use self::resolver::{LINK_TTL, SnapshotResolver};
