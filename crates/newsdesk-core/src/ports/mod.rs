//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部資源（時刻、ID 生成、永続化基盤）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - 永続化基盤に触れるのは ArticleStore だけ
//! - 時刻と ID は注入されるので、テストで決定的にできる

pub mod clock;
pub mod id_generator;
pub mod kv_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::kv_store::{KeyValueStore, KvError};
