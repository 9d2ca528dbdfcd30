//! Errors - ArticleStore のエラー型と分類
//!
//! # 分類
//! - ValidationFailed: 入力不正（呼び出し側が再入力を促す）
//! - NotFound: update 対象が存在しない（呼び出し側は表示を更新する）
//! - PersistenceUnavailable: 永続化基盤の障害（リトライ可能な汎用エラーとして表示）
//!
//! get_by_id / search / delete は「存在しない」をエラーにしません。

use thiserror::Error;

use super::ids::ArticleId;
use super::validation::ValidationErrors;
use crate::ports::KvError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("article not found: {0}")]
    NotFound(ArticleId),

    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] KvError),
}

/// ErrorKind は呼び出し側での扱いの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力を直せば成功する
    Invalid,
    /// 対象が既にない
    Missing,
    /// 一時的な障害（リトライ推奨）
    Infrastructure,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::ValidationFailed(_) => ErrorKind::Invalid,
            StoreError::NotFound(_) => ErrorKind::Missing,
            StoreError::PersistenceUnavailable(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            StoreError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::ValidationFailed(errors)
    }
}
