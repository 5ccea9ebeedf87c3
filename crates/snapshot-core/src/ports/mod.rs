//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! Resolver は外部のオブジェクトストアと時刻にだけ依存し、
//! どちらも trait 越しに注入されます。

pub mod clock;
pub mod object_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::object_store::{ListPage, ObjectStore};
