//! ArticleStoreBuilder - ArticleStore の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - ports の差し替え（テストでは FixedClock / InMemoryKvStore）

use std::sync::Arc;

use super::store::ArticleStore;
use crate::config::StoreConfig;
use crate::impls::FileKvStore;
use crate::ports::{Clock, IdGenerator, KeyValueStore, SystemClock, UlidGenerator};

pub const DEFAULT_COLLECTION_KEY: &str = "newsdesk.articles";

/// ArticleStoreBuilder は ArticleStore を構築
///
/// # 使用例
/// ```ignore
/// let store = ArticleStore::builder(Arc::new(InMemoryKvStore::new()))
///     .clock(FixedClock::new(t))
///     .collection_key("articles")
///     .build()?;
/// ```
///
/// # デフォルト
/// - clock: SystemClock
/// - id_generator: UlidGenerator（builder の clock を使用）
/// - collection_key: `newsdesk.articles`
pub struct ArticleStoreBuilder {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Option<Arc<dyn IdGenerator>>,
    collection_key: String,
}

/// BuildError は ArticleStore 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("collection key must not be empty")]
    EmptyCollectionKey,
}

impl ArticleStoreBuilder {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            clock: Arc::new(SystemClock),
            ids: None,
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
        }
    }

    /// 設定から FileKvStore ベースの builder を作る
    pub fn from_config(config: &StoreConfig) -> Self {
        let kv = Arc::new(FileKvStore::new(config.data_dir.clone()));
        Self::new(kv).collection_key(config.collection_key.clone())
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = key.into();
        self
    }

    /// # 検証
    /// - collection_key が空（空白のみ）なら BuildError::EmptyCollectionKey
    pub fn build(self) -> Result<ArticleStore, BuildError> {
        let key = self.collection_key.trim().to_string();
        if key.is_empty() {
            return Err(BuildError::EmptyCollectionKey);
        }
        let clock = self.clock;
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(clock.clone())),
        };
        Ok(ArticleStore::from_parts(self.kv, clock, ids, key))
    }
}
