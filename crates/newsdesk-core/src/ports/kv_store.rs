//! KeyValueStore port - 永続化基盤の抽象化
//!
//! ArticleStore はこの port 越しにしか永続化データへ触れません。
//! 基盤は何でもよい（ファイル、組み込み DB、テスト用の HashMap）。
//!
//! # 実装
//! - **InMemoryKvStore**: テスト・一時セッション用（`impls::inmem_kv`）
//! - **FileKvStore**: ローカルディレクトリ上の永続化（`impls::file_kv`）

use async_trait::async_trait;

/// KeyValueStore 操作のエラー
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for key '{key}' is corrupted: {reason}")]
    Corrupted { key: String, reason: String },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl KvError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub fn corrupted(key: &str, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// KeyValueStore は bytes を key で保存する最小の能力
///
/// # 設計原則
/// - `set` は値全体を置き換える（部分書き込みを残さない）
/// - `get` / `delete` は存在しない key をエラーにしない
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError>;

    /// 削除した場合は true
    async fn delete(&self, key: &str) -> Result<bool, KvError>;
}
