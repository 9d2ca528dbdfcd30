//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて記事コレクションのロジックを実装します。
//!
//! # 主要コンポーネント
//! - **ArticleStoreBuilder**: ArticleStore の構築とワイヤリング
//! - **ArticleStore**: 作成・取得・更新・削除・検索・初回投入
//! - **seed**: 初回起動時のサンプル記事

pub mod builder;
pub mod seed;
pub mod store;

// 主要な型を再エクスポート
pub use self::builder::{ArticleStoreBuilder, BuildError, DEFAULT_COLLECTION_KEY};
pub use self::store::ArticleStore;
