//! Article record and the author-supplied input it is built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ArticleId;
use super::image::ImageInput;

/// A stored news article.
///
/// Design:
/// - Only `ArticleStore` constructs or mutates these (via save / update / seeding).
/// - `image` is always an embedded `data:image/...;base64,...` string, never a file reference.
/// - Field names are camelCase on disk; unknown fields are ignored when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// True once the article has been updated after creation.
    pub fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// 大文字小文字を区別しない部分一致（title / content / author のいずれか）
    ///
    /// `needle` は小文字化済みであること。
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.title, &self.content, &self.author]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Form values for `save` / `update`. Has no id or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInput {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    /// `None`: no image on save, keep the existing one on update.
    pub image: Option<ImageInput>,
}

impl ArticleInput {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            content: content.into(),
            author: author.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }
}

impl From<&Article> for ArticleInput {
    /// Pre-fills an edit form from a stored article (image left untouched).
    fn from(article: &Article) -> Self {
        Self::new(
            article.title.clone(),
            article.summary.clone(),
            article.content.clone(),
            article.author.clone(),
        )
    }
}

/// Listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    /// Same semantics as `ArticleStore::search`.
    pub search: Option<String>,
    /// Exact author name, case-insensitive, trimmed.
    pub author: Option<String>,
}

impl ArticleFilters {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            author: None,
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            search: None,
            author: Some(author.into()),
        }
    }

    pub fn and_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn sample() -> Article {
        let t = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        Article {
            id: ArticleId::from_ulid(Ulid::new()),
            title: "Local Elections 2024".into(),
            summary: "A summary of the vote.".into(),
            content: "Full article body text here, long enough.".into(),
            author: "J. Reyes".into(),
            image: None,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_image() {
        let article = sample();
        let json = serde_json::to_value(&article).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("image").is_none());
        assert_eq!(json["createdAt"], "2024-03-10T08:00:00Z");
    }

    #[test]
    fn reads_records_with_unknown_fields_and_no_image() {
        let article = sample();
        let mut json = serde_json::to_value(&article).unwrap();
        json["category"] = serde_json::json!("politics");

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn was_edited_follows_timestamps() {
        let mut article = sample();
        assert!(!article.was_edited());
        article.updated_at += chrono::Duration::minutes(5);
        assert!(article.was_edited());
    }

    #[test]
    fn has_image_reflects_embedded_data() {
        let mut article = sample();
        assert!(!article.has_image());
        article.image = Some("data:image/png;base64,AA==".into());
        assert!(article.has_image());
    }

    #[test]
    fn matching_covers_title_content_and_author_only() {
        let article = sample();
        assert!(article.matches_lowercase("elections"));
        assert!(article.matches_lowercase("body text"));
        assert!(article.matches_lowercase("reyes"));
        // summary は検索対象外
        assert!(!article.matches_lowercase("summary of the vote"));
    }

    #[test]
    fn input_from_article_keeps_image_unset() {
        let mut article = sample();
        article.image = Some("data:image/png;base64,AA==".into());
        let input = ArticleInput::from(&article);
        assert_eq!(input.title, article.title);
        assert!(input.image.is_none());
    }
}
