//! registry-core
//!
//! Storage-boundary building blocks of a schema/artifact registry.
//!
//! # モジュール構成
//! - **domain**: artifact type の token 表、キー型、レコード、not-found エラー分類
//! - **ports**: 永続化エンジンとの境界（RegistryStorage, Clock）
//! - **impls**: 開発用・テスト用の実装（InMemoryRegistryStorage, RetryPolicy）
//! - **api**: エラーからクライアント向けレスポンスへの対応付け
//! - **config**: TOML 設定

pub mod api;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use api::{ErrorResponse, ResponseClass};
pub use config::{ConfigError, RegistryConfig};
pub use domain::{ArtifactType, ErrorKind, InvalidArtifactType, NotFoundError, RegistryError};
