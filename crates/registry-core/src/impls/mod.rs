//! Impls - ports の実装（開発用・テスト用）
//!
//! 本番用の永続化エンジンは外部の協調者として別クレートに置く想定です。

pub mod inmem_storage;
pub mod retry;

pub use self::inmem_storage::InMemoryRegistryStorage;
pub use self::retry::RetryPolicy;
