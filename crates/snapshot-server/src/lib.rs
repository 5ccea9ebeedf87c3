//! snapshot-server
//!
//! HTTP façade over `snapshot-core`: config loading, routes and JSON rendering.

pub mod config;
pub mod http;

pub use config::Config;
