//! Validation - 記事入力の検証
//!
//! 最初の違反で止めず、違反したフィールドをすべて集めて返します
//! （フォーム側がまとめてハイライトできるように）。

use serde::Serialize;
use std::fmt;

use super::article::ArticleInput;
use super::image::{ImageInput, MAX_IMAGE_BYTES, is_embedded_image};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_SUMMARY_CHARS: usize = 10;
pub const MIN_CONTENT_CHARS: usize = 20;

/// 検証対象のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Summary,
    Content,
    Author,
    Image,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Summary => "summary",
            Field::Content => "content",
            Field::Author => "author",
            Field::Image => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

/// One or more violated fields, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// 違反したフィールド（重複なし、出現順）
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for e in &self.errors {
            if !fields.contains(&e.field) {
                fields.push(e.field);
            }
        }
        fields
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// 必須テキストの検証
///
/// 空判定は trim 後、長さ判定は入力そのままの文字数で行う。
fn check_text(errors: &mut ValidationErrors, field: Field, value: &str, min_chars: usize) {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
    } else if value.chars().count() < min_chars {
        errors.push(
            field,
            format!("{field} must be at least {min_chars} characters"),
        );
    }
}

fn check_image(errors: &mut ValidationErrors, image: Option<&ImageInput>) {
    match image {
        Some(ImageInput::Upload(upload)) => {
            if !upload.is_image() {
                errors.push(
                    Field::Image,
                    format!("file type '{}' is not an image", upload.media_type),
                );
            }
            if upload.size() > MAX_IMAGE_BYTES {
                errors.push(Field::Image, "image must be 5 MiB or smaller");
            }
        }
        Some(ImageInput::Encoded(value)) if !is_embedded_image(value) => {
            errors.push(Field::Image, "image must be a base64 data:image URI");
        }
        Some(ImageInput::Encoded(_)) | Some(ImageInput::Remove) | None => {}
    }
}

/// Validates every field of `input` and reports all violations at once.
pub fn validate(input: &ArticleInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, Field::Title, &input.title, MIN_TITLE_CHARS);
    check_text(&mut errors, Field::Summary, &input.summary, MIN_SUMMARY_CHARS);
    check_text(&mut errors, Field::Content, &input.content, MIN_CONTENT_CHARS);
    check_text(&mut errors, Field::Author, &input.author, 1);
    check_image(&mut errors, input.image.as_ref());
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ImageUpload;
    use rstest::rstest;

    fn valid_input() -> ArticleInput {
        ArticleInput::new(
            "Local Elections 2024",
            "A summary of the vote.",
            "Full article body text here, long enough.",
            "J. Reyes",
        )
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate(&valid_input()).is_ok());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let input = ArticleInput::new("ab", "", "x", "");
        let errors = validate(&input).unwrap_err();

        assert_eq!(
            errors.fields(),
            vec![Field::Title, Field::Summary, Field::Content, Field::Author]
        );
        let reasons: Vec<&str> = errors.errors().iter().map(|e| e.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "title must be at least 5 characters",
                "summary is required",
                "content must be at least 20 characters",
                "author is required",
            ]
        );
    }

    #[rstest]
    #[case::blank_title(ArticleInput { title: "     ".into(), ..valid_input() }, Field::Title, "title is required")]
    #[case::short_summary(ArticleInput { summary: "too short".into(), ..valid_input() }, Field::Summary, "summary must be at least 10 characters")]
    #[case::blank_author(ArticleInput { author: " \t".into(), ..valid_input() }, Field::Author, "author is required")]
    #[case::short_content(ArticleInput { content: "nineteen characters".into(), ..valid_input() }, Field::Content, "content must be at least 20 characters")]
    fn single_field_violation(
        #[case] input: ArticleInput,
        #[case] field: Field,
        #[case] reason: &str,
    ) {
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.errors(), &[FieldError { field, reason: reason.to_string() }]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 5 文字、15 bytes
        let input = ArticleInput {
            title: "ニュース速".into(),
            ..valid_input()
        };
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn oversized_non_image_upload_reports_both_problems() {
        let upload = ImageUpload::new("application/pdf", vec![0; MAX_IMAGE_BYTES + 1]);
        let input = valid_input().with_image(ImageInput::Upload(upload));

        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Image]);
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn upload_at_exact_limit_is_accepted() {
        let upload = ImageUpload::new("image/jpeg", vec![0; MAX_IMAGE_BYTES]);
        let input = valid_input().with_image(ImageInput::Upload(upload));
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn encoded_image_must_be_a_data_uri() {
        let input = valid_input().with_image(ImageInput::Encoded("https://cdn/x.png".into()));
        let errors = validate(&input).unwrap_err();
        assert!(errors.contains(Field::Image));

        let input = valid_input().with_image(ImageInput::Encoded("data:image/png;base64,AA==".into()));
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn display_joins_every_field() {
        let errors = validate(&ArticleInput::new("ab", "", "x", "")).unwrap_err();
        let shown = errors.to_string();
        assert!(shown.starts_with("title: "));
        assert!(shown.contains("; author: author is required"));
    }
}
