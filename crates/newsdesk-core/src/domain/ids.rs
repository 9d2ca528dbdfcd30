//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID
//! 記事 ID には ULID (Universally Unique Lexicographically Sortable Identifier) を使用します。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **内容に依存しない**: 同じタイトルの記事でも衝突しない
//! - **UUID互換**: 128-bit で UUID と同じサイズ
//!
//! 表示形式は `news-<ULID>`。パース時はプレフィックスなしの ULID も受け付けます。
//! 永続化時は ULID 文字列そのものを保存します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

const PREFIX: &str = "news-";

/// Identifier of an Article.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Ulid);

impl ArticleId {
    /// ULID から ArticleId を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for ArticleId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.0)
    }
}

/// ID 文字列のパースエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid article id '{0}'")]
pub struct IdParseError(pub String);

impl FromStr for ArticleId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix(PREFIX).unwrap_or(raw);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| IdParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix_and_parse_accepts_both_forms() {
        let ulid = Ulid::new();
        let id = ArticleId::from_ulid(ulid);

        let shown = id.to_string();
        assert!(shown.starts_with("news-"));
        assert_eq!(shown.parse::<ArticleId>().unwrap(), id);
        assert_eq!(ulid.to_string().parse::<ArticleId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "news-not-a-ulid".parse::<ArticleId>().unwrap_err();
        assert_eq!(err, IdParseError("news-not-a-ulid".to_string()));
        assert!("".parse::<ArticleId>().is_err());
    }

    #[test]
    fn ulid_ids_are_sortable() {
        let id1 = ArticleId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2)); // 時刻が進むのを待つ
        let id2 = ArticleId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn serializes_as_bare_ulid_string() {
        let ulid = Ulid::new();
        let id = ArticleId::from_ulid(ulid);

        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, format!("\"{}\"", ulid));

        let deserialized: ArticleId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
