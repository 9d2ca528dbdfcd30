//! Observability - 記事コレクションの集計ビュー

use serde::{Deserialize, Serialize};

/// Collection statistics shown on the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCounts {
    pub total: usize,
    /// Distinct author names, compared exactly as stored.
    pub unique_authors: usize,
}
