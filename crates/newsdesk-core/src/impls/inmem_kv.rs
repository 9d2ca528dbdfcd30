//! InMemoryKvStore - テスト・一時セッション用の永続化基盤
//!
//! プロセス終了で内容は消えます。
//! `fail_writes` で書き込み障害を再現できる（永続化エラー時の挙動テスト用）。

use crate::ports::{KeyValueStore, KvError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// InMemoryKvStore は HashMap をそのまま基盤にする
///
/// # 使用例
/// ```ignore
/// let kv = InMemoryKvStore::new();
/// kv.set("k", b"v".to_vec()).await?;
/// assert_eq!(kv.get("k").await?, Some(b"v".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// true の間、set / delete は `KvError::Unavailable` を返す
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<(), KvError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("in-memory store is read-only".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        self.check_writable()?;
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        self.check_writable()?;
        Ok(self.entries().remove(key).is_some())
    }
}
