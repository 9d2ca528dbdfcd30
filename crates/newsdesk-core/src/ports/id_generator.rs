//! IdGenerator port - ID 生成の抽象化
//!
//! 記事 ID は内容（タイトルなど）に依存せず生成されます。
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::ArticleId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は衝突しにくい記事 ID を生成
///
/// # ULID の特性
/// - 時刻でソート可能
/// - 80-bit のランダム部分を持つ（同一ミリ秒でも衝突しない）
///
/// # Thread Safety
/// - `Send + Sync` を要求（ArticleStore が保持する）
pub trait IdGenerator: Send + Sync {
    /// Article ID を生成
    fn generate_article_id(&self) -> ArticleId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// これにより、テスト時に FixedClock を使っても timestamp 部分を固定できます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    /// 新しい UlidGenerator を作成
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_article_id(&self) -> ArticleId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        ArticleId::from(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let ids: HashSet<ArticleId> = (0..1_000).map(|_| id_gen.generate_article_id()).collect();

        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn ulid_generator_with_fixed_clock_shares_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_article_id();
        let id2 = id_gen.generate_article_id();

        // ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);

        let timestamp1 = id1.as_ulid().timestamp_ms();
        let timestamp2 = id2.as_ulid().timestamp_ms();
        assert_eq!(timestamp1, timestamp2);
        assert_eq!(timestamp1, fixed_time.timestamp_millis() as u64);
    }

    #[test]
    fn generated_ids_carry_the_article_prefix() {
        let id_gen = UlidGenerator::new(SystemClock);
        assert!(id_gen.generate_article_id().to_string().starts_with("news-"));
    }
}
