//! FileKvStore - ローカルディレクトリ上の永続化基盤
//!
//! 1 key = 1 ファイル（`<dir>/<key>.kv`）。
//! 書き込みは一時ファイル（`<key>.kv.tmp`）に書いてから rename で置き換えるので、
//! 途中で失敗しても前の値が壊れない。

use crate::ports::{KeyValueStore, KvError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const EXTENSION: &str = "kv";

#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// ディレクトリは最初の書き込み時に作成される
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// key は英数字と `.` `_` `-` のみ、先頭 `.` は不可
    fn path_for(&self, key: &str) -> Result<PathBuf, KvError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::io(key, e)),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| KvError::io(key, e))?;
        if let Err(e) = fs::write(&tmp, &value).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(KvError::io(key, e));
        }
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| KvError::io(key, e))?;

        tracing::debug!(key, bytes = value.len(), path = %path.display(), "kv value written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KvError::io(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_get_roundtrip_creates_dir() {
        let tmp = tempdir().expect("tempdir");
        let kv = FileKvStore::new(tmp.path().join("nested").join("data"));

        kv.set("newsdesk.articles", b"{}".to_vec()).await.unwrap();

        assert_eq!(
            kv.get("newsdesk.articles").await.unwrap(),
            Some(b"{}".to_vec())
        );
        assert!(kv.dir().join("newsdesk.articles.kv").exists());
        assert!(!kv.dir().join("newsdesk.articles.kv.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let tmp = tempdir().expect("tempdir");
        let kv = FileKvStore::new(tmp.path());
        assert_eq!(kv.get("absent").await.unwrap(), None);
        assert!(!kv.delete("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_and_delete() {
        let tmp = tempdir().expect("tempdir");
        let kv = FileKvStore::new(tmp.path());

        kv.set("k", vec![1, 2]).await.unwrap();
        kv.set("k", vec![3]).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some(vec![3]));

        assert!(kv.delete("k").await.unwrap());
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_a_new_handle() {
        let tmp = tempdir().expect("tempdir");
        FileKvStore::new(tmp.path())
            .set("k", b"persisted".to_vec())
            .await
            .unwrap();

        let reopened = FileKvStore::new(tmp.path());
        assert_eq!(reopened.get("k").await.unwrap(), Some(b"persisted".to_vec()));
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let tmp = tempdir().expect("tempdir");
        let kv = FileKvStore::new(tmp.path());

        for key in ["../escape", "a/b", "", ".hidden"] {
            assert!(matches!(
                kv.set(key, vec![]).await,
                Err(KvError::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_unwritable_dir_is_io_error() {
        let tmp = tempdir().expect("tempdir");
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // ファイルの下にディレクトリは作れない
        let kv = FileKvStore::new(blocker.join("data"));

        assert!(matches!(kv.set("k", vec![]).await, Err(KvError::Io { .. })));
    }
}
