//! Ports - 抽象化レイヤー
//!
//! 永続化エンジンは外部の協調者です。このモジュールはその境界の trait だけを定義し、
//! 実装の詳細（SQL, KV store など）は隠蔽します。

pub mod clock;
pub mod registry_storage;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::registry_storage::RegistryStorage;
