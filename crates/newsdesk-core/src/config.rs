//! StoreConfig - 保存先などの設定
//!
//! 優先順位: CLI フラグ > 環境変数 > デフォルト
//!
//! | 環境変数 | 既定値 |
//! |---|---|
//! | `NEWSDESK_DATA_DIR` | OS のデータディレクトリ（取得できなければ `./.newsdesk`） |
//! | `NEWSDESK_COLLECTION_KEY` | `newsdesk.articles` |
//! | `NEWSDESK_SEED` | `true` |
//! | `NEWSDESK_LOG_JSON` | `false` |

use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;

use crate::app::DEFAULT_COLLECTION_KEY;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub collection_key: String,
    /// Seed sample articles when the collection is empty on open.
    pub seed_on_open: bool,
    pub log_json: bool,
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "newsdesk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".newsdesk"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            seed_on_open: true,
            log_json: false,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns. Unparseable booleans keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup("NEWSDESK_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("NEWSDESK_COLLECTION_KEY") {
            config.collection_key = key;
        }
        if let Some(seed) = lookup("NEWSDESK_SEED").as_deref().and_then(parse_bool) {
            config.seed_on_open = seed;
        }
        if let Some(json) = lookup("NEWSDESK_LOG_JSON").as_deref().and_then(parse_bool) {
            config.log_json = json;
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection_key.trim().is_empty() {
            return Err(ConfigError::Empty {
                name: "collection_key",
            });
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty { name: "data_dir" });
        }
        Ok(())
    }
}
