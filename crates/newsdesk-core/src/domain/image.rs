//! Image - 記事に埋め込む画像の入力と変換
//!
//! 画像は外部ストレージに置かず、base64 の data URI として記事レコードに埋め込みます。
//! アップロードされた bytes は検証後に `to_data_uri` で文字列化され、
//! その後でレコードが組み立てられます（ファイルハンドルを保存することはない）。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// アップロード画像の上限（5 MiB）
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const DATA_URI_IMAGE_PREFIX: &str = "data:image/";

/// Raw file content supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// 拡張子から media type を推定して作成（画像でなければ `application/octet-stream`）
    pub fn from_path_and_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        let media_type = media_type_for_path(path).unwrap_or("application/octet-stream");
        Self::new(media_type, bytes)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.trim().to_ascii_lowercase().starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `data:<media-type>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type.trim().to_ascii_lowercase(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Image part of an article input.
///
/// `ArticleInput::image` が `None` の場合、update では既存画像を保持し、
/// save では画像なしになります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Binary upload, converted to a data URI before persisting.
    Upload(ImageUpload),
    /// Already-embedded `data:image/...` URI (e.g. an edit form sending back the stored value).
    Encoded(String),
    /// Clear the stored image.
    Remove,
}

/// `data:image/...;base64,...` 形式かどうか
pub fn is_embedded_image(value: &str) -> bool {
    let lower = value.get(..DATA_URI_IMAGE_PREFIX.len()).map(str::to_ascii_lowercase);
    lower.as_deref() == Some(DATA_URI_IMAGE_PREFIX) && value.contains(";base64,")
}

pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(media_type)
}
