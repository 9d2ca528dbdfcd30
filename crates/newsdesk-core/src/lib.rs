//! newsdesk-core
//!
//! ローカル端末だけで完結するニュース記事ストア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, article, image, validation, errors）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, KeyValueStore）
//! - **app**: アプリケーションロジック（ArticleStore, builder, seed）
//! - **impls**: ports の実装（InMemoryKvStore, FileKvStore）
//! - **config**: 保存先などの設定
//! - **observability**: 集計ビュー（ArticleCounts）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{ArticleStore, ArticleStoreBuilder, BuildError};
pub use config::{ConfigError, StoreConfig};
pub use domain::{
    Article, ArticleFilters, ArticleId, ArticleInput, ImageInput, ImageUpload, StoreError,
};
pub use observability::ArticleCounts;
