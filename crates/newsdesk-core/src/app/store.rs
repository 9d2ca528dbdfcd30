//! ArticleStore - 記事コレクションの唯一の所有者
//!
//! 永続化データへの読み書きはすべてここを通ります。
//!
//! # 設計原則
//! - 全操作を 1 つの Mutex で直列化（単一アクター、操作は原子的に見える）
//! - write-through: 先に永続化し、成功した場合だけキャッシュの変更を残す
//! - 永続化に失敗したらキャッシュを元に戻す（キャッシュと基盤がずれない）
//! - 「存在しない」はエラーではなく `Option` / `bool` で返す

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use super::builder::ArticleStoreBuilder;
use super::seed::default_news;
use crate::domain::{
    Article, ArticleFilters, ArticleId, ArticleInput, ImageInput, StoreError, validate,
};
use crate::observability::ArticleCounts;
use crate::ports::{Clock, IdGenerator, KeyValueStore, KvError};

const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// 永続化されるドキュメント
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCollection {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
struct PersistedCollectionRef<'a> {
    version: u32,
    articles: Vec<&'a Article>,
}

/// キャッシュ（初回アクセス時に基盤から読み込む）
#[derive(Debug, Default)]
struct CacheState {
    loaded: bool,
    articles: HashMap<ArticleId, Article>,
}

/// Newest first: `created_at` descending, id descending on ties.
fn newest_first(a: &Article, b: &Article) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn sorted<'a>(articles: impl Iterator<Item = &'a Article>) -> Vec<Article> {
    let mut list: Vec<Article> = articles.cloned().collect();
    list.sort_by(newest_first);
    list
}

/// Store-owned conversion of the image part of an input.
///
/// `None` means "no decision" and is resolved by the caller (absent on save, kept on update).
fn embed_image(image: Option<ImageInput>) -> Option<Option<String>> {
    match image {
        None => None,
        Some(ImageInput::Upload(upload)) => Some(Some(upload.to_data_uri())),
        Some(ImageInput::Encoded(uri)) => Some(Some(uri)),
        Some(ImageInput::Remove) => Some(None),
    }
}

pub struct ArticleStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    key: String,
    state: Mutex<CacheState>,
}

impl ArticleStore {
    pub fn builder(kv: Arc<dyn KeyValueStore>) -> ArticleStoreBuilder {
        ArticleStoreBuilder::new(kv)
    }

    pub(crate) fn from_parts(
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        key: String,
    ) -> Self {
        Self {
            kv,
            clock,
            ids,
            key,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn collection_key(&self) -> &str {
        &self.key
    }

    /// Every stored article, newest first.
    pub async fn get_all(&self) -> Result<Vec<Article>, StoreError> {
        let state = self.load().await?;
        Ok(sorted(state.articles.values()))
    }

    pub async fn get_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StoreError> {
        let state = self.load().await?;
        Ok(state.articles.get(id).cloned())
    }

    /// Creates a new article with a fresh id and `created_at == updated_at == now`.
    pub async fn save(&self, input: ArticleInput) -> Result<Article, StoreError> {
        validate(&input)?;

        let mut state = self.load().await?;
        let now = self.clock.now();
        let article = self.build_article(&state.articles, input, now);
        let id = article.id;

        state.articles.insert(id, article.clone());
        if let Err(e) = self.persist(&state.articles).await {
            state.articles.remove(&id);
            return Err(e);
        }

        tracing::info!(article_id = %id, author = %article.author, "article saved");
        Ok(article)
    }

    /// Replaces the mutable fields of an existing article.
    ///
    /// `input.image == None` keeps the stored image; `ImageInput::Remove` clears it.
    pub async fn update(&self, id: &ArticleId, input: ArticleInput) -> Result<Article, StoreError> {
        validate(&input)?;

        let mut state = self.load().await?;
        let Some(existing) = state.articles.get(id) else {
            tracing::debug!(article_id = %id, "update target not found");
            return Err(StoreError::NotFound(*id));
        };

        let ArticleInput {
            title,
            summary,
            content,
            author,
            image,
        } = input;
        let image = embed_image(image).unwrap_or_else(|| existing.image.clone());
        let updated = Article {
            id: existing.id,
            title,
            summary,
            content,
            author,
            image,
            created_at: existing.created_at,
            updated_at: self.clock.now().max(existing.created_at),
        };

        let previous = state.articles.insert(*id, updated.clone());
        if let Err(e) = self.persist(&state.articles).await {
            if let Some(previous) = previous {
                state.articles.insert(*id, previous);
            }
            return Err(e);
        }

        tracing::info!(article_id = %id, "article updated");
        Ok(updated)
    }

    /// Returns whether an article was removed. A missing id is a no-op.
    pub async fn delete(&self, id: &ArticleId) -> Result<bool, StoreError> {
        let mut state = self.load().await?;
        let Some(removed) = state.articles.remove(id) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&state.articles).await {
            state.articles.insert(*id, removed);
            return Err(e);
        }

        tracing::info!(article_id = %id, "article deleted");
        Ok(true)
    }

    /// Case-insensitive substring match on title, content or author.
    ///
    /// An empty or whitespace-only query returns the whole collection.
    /// Any other query is matched as given, surrounding whitespace included.
    pub async fn search(&self, query: &str) -> Result<Vec<Article>, StoreError> {
        let state = self.load().await?;
        if query.trim().is_empty() {
            return Ok(sorted(state.articles.values()));
        }
        let needle = query.to_lowercase();
        let hits = sorted(state.articles.values().filter(|a| a.matches_lowercase(&needle)));
        tracing::debug!(query, count = hits.len(), "search");
        Ok(hits)
    }

    pub async fn filter(&self, filters: &ArticleFilters) -> Result<Vec<Article>, StoreError> {
        let state = self.load().await?;
        let needle = filters
            .search
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase);
        let author = filters
            .author
            .as_deref()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty());

        let matches = |article: &&Article| {
            let by_text = needle.as_deref().is_none_or(|n| article.matches_lowercase(n));
            let by_author = author
                .as_deref()
                .is_none_or(|a| article.author.trim().to_lowercase() == a);
            by_text && by_author
        };
        Ok(sorted(state.articles.values().filter(matches)))
    }

    pub async fn counts(&self) -> Result<ArticleCounts, StoreError> {
        let state = self.load().await?;
        let authors: HashSet<String> = state
            .articles
            .values()
            .map(|a| a.author.clone())
            .collect();
        Ok(ArticleCounts {
            total: state.articles.len(),
            unique_authors: authors.len(),
        })
    }

    /// Seeds the sample articles if and only if the collection is empty.
    ///
    /// Returns how many articles were added (0 when the collection already had content).
    pub async fn initialize_default_news(&self) -> Result<usize, StoreError> {
        let mut state = self.load().await?;
        if !state.articles.is_empty() {
            return Ok(0);
        }

        let seeds = default_news();
        for input in &seeds {
            validate(input)?;
        }

        // 表示順（新しい順）が seed の並び順と一致するよう、1 分ずつ過去にずらす
        let now = self.clock.now();
        let mut added = Vec::with_capacity(seeds.len());
        for (i, input) in seeds.into_iter().enumerate() {
            let created_at = now - Duration::minutes(i as i64);
            let article = self.build_article(&state.articles, input, created_at);
            added.push(article.id);
            state.articles.insert(article.id, article);
        }

        if let Err(e) = self.persist(&state.articles).await {
            for id in &added {
                state.articles.remove(id);
            }
            return Err(e);
        }

        tracing::info!(count = added.len(), "default news seeded");
        Ok(added.len())
    }

    /// 検証済みの入力からレコードを組み立てる（id は既存と衝突しないものを引き直す）
    fn build_article(
        &self,
        existing: &HashMap<ArticleId, Article>,
        input: ArticleInput,
        created_at: DateTime<Utc>,
    ) -> Article {
        let mut id = self.ids.generate_article_id();
        while existing.contains_key(&id) {
            id = self.ids.generate_article_id();
        }

        let ArticleInput {
            title,
            summary,
            content,
            author,
            image,
        } = input;
        Article {
            id,
            title,
            summary,
            content,
            author,
            image: embed_image(image).flatten(),
            created_at,
            updated_at: created_at,
        }
    }

    async fn load(&self) -> Result<MutexGuard<'_, CacheState>, StoreError> {
        let mut state = self.state.lock().await;
        if !state.loaded {
            state.articles = self.read_collection().await?;
            state.loaded = true;
            tracing::debug!(key = %self.key, count = state.articles.len(), "collection loaded");
        }
        Ok(state)
    }

    async fn read_collection(&self) -> Result<HashMap<ArticleId, Article>, StoreError> {
        let bytes = match self.kv.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(HashMap::new()),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read collection");
                return Err(e.into());
            }
        };

        let doc: PersistedCollection = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "collection document is corrupted");
            KvError::corrupted(&self.key, e.to_string())
        })?;

        let mut articles = HashMap::with_capacity(doc.articles.len());
        for article in doc.articles {
            let id = article.id;
            if articles.insert(id, article).is_some() {
                return Err(KvError::corrupted(&self.key, format!("duplicate article id {id}")).into());
            }
        }
        Ok(articles)
    }

    async fn persist(&self, articles: &HashMap<ArticleId, Article>) -> Result<(), StoreError> {
        let mut list: Vec<&Article> = articles.values().collect();
        list.sort_by(|a, b| newest_first(a, b));
        let doc = PersistedCollectionRef {
            version: FORMAT_VERSION,
            articles: list,
        };
        let bytes = serde_json::to_vec(&doc)
            .map_err(|e| KvError::Unavailable(format!("failed to encode collection: {e}")))?;

        self.kv.set(&self.key, bytes).await.map_err(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to persist collection");
            StoreError::from(e)
        })
    }
}
