//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryKvStore**: テスト・一時セッション用の永続化基盤
//! - **FileKvStore**: ローカルディレクトリ上の永続化基盤

pub mod file_kv;
pub mod inmem_kv;

// 主要な型を再エクスポート
pub use self::file_kv::FileKvStore;
pub use self::inmem_kv::InMemoryKvStore;
