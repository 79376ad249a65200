use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::leaderboard::LeaderboardPeriod;
use crate::error::{Result, StorageError};
use crate::models::LeaderboardEntry;
use crate::services::score::{SESSIONS_WEIGHT, STREAK_WEIGHT, TASKS_WEIGHT};

#[derive(FromRow)]
struct RankedStatsRow {
    user_id: Uuid,
    focus_seconds: i64,
    score: Decimal,
    rank: i32,
}

pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Top of the global leaderboard for one period bucket, ordered by the
    /// rank assigned at the last refresh. Unranked rows sort last.
    pub async fn global(
        &self,
        period: LeaderboardPeriod,
        period_start: NaiveDateTime,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT id, user_id, period, period_start, period_end,
                   total_focus_time_seconds, rank, score, updated_at
            FROM leaderboard
            WHERE period = $1 AND period_start = $2
            ORDER BY rank
            LIMIT $3
            "#,
        )
        .bind(period.as_str())
        .bind(period_start)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Leaderboard restricted to one class's members, ordered by score
    /// rather than stored rank.
    pub async fn for_class(
        &self,
        class_id: Uuid,
        period: LeaderboardPeriod,
        period_start: NaiveDateTime,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT l.id, l.user_id, l.period, l.period_start, l.period_end,
                   l.total_focus_time_seconds, l.rank, l.score, l.updated_at
            FROM leaderboard l
            INNER JOIN users u ON u.id = l.user_id
            WHERE u.class_id = $1 AND l.period = $2 AND l.period_start = $3
            ORDER BY l.score DESC
            LIMIT $4
            "#,
        )
        .bind(class_id)
        .bind(period.as_str())
        .bind(period_start)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// A user's rank for one period bucket. Returns 0 when the user has no
    /// row for the bucket or the row has not been ranked yet.
    pub async fn user_rank(
        &self,
        user_id: Uuid,
        period: LeaderboardPeriod,
        period_start: NaiveDateTime,
    ) -> Result<i32> {
        let rank = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT rank
            FROM leaderboard
            WHERE user_id = $1 AND period = $2 AND period_start = $3
            "#,
        )
        .bind(user_id)
        .bind(period.as_str())
        .bind(period_start)
        .fetch_optional(self.pool)
        .await?;

        Ok(rank.flatten().unwrap_or(0))
    }

    /// A user's full leaderboard row for one period bucket, if any.
    pub async fn entry_for_user(
        &self,
        user_id: Uuid,
        period: LeaderboardPeriod,
        period_start: NaiveDateTime,
    ) -> Result<Option<LeaderboardEntry>> {
        let entry = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT id, user_id, period, period_start, period_end,
                   total_focus_time_seconds, rank, score, updated_at
            FROM leaderboard
            WHERE user_id = $1 AND period = $2 AND period_start = $3
            "#,
        )
        .bind(user_id)
        .bind(period.as_str())
        .bind(period_start)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    /// Insert or update a single leaderboard row, keyed on
    /// (user_id, period, period_start). The second write wins.
    pub async fn upsert(&self, entry: &LeaderboardEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leaderboard (user_id, period, period_start, period_end,
                                     total_focus_time_seconds, rank, score, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, CURRENT_TIMESTAMP)
            ON CONFLICT (user_id, period, period_start)
            DO UPDATE SET
                period_end = EXCLUDED.period_end,
                total_focus_time_seconds = EXCLUDED.total_focus_time_seconds,
                rank = EXCLUDED.rank,
                score = EXCLUDED.score,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.period.as_str())
        .bind(entry.period_start)
        .bind(entry.period_end)
        .bind(entry.total_focus_time_seconds)
        .bind(entry.rank)
        .bind(entry.score)
        .execute(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                return StorageError::ConstraintViolation("user does not exist".to_string());
            }
            err
        })?;

        Ok(())
    }

    /// Recompute scores for every user active inside
    /// `[period_start, period_end)`, assign ranks 1..=N by descending score
    /// and replace the period's rows. Runs in one transaction: either every
    /// active user's row is updated or none is.
    ///
    /// Returns the number of users ranked.
    pub async fn refresh(
        &self,
        period: LeaderboardPeriod,
        period_start: NaiveDateTime,
        period_end: NaiveDateTime,
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        // A user is active when the window holds at least one completed
        // focus session or one completed task; a streak alone does not
        // create a row, but an active user's streak feeds their score.
        let ranked: Vec<RankedStatsRow> = sqlx::query_as(
            r#"
            WITH session_stats AS (
                SELECT user_id,
                       SUM(duration_seconds)::bigint AS focus_seconds,
                       COUNT(*)::bigint AS sessions_completed
                FROM focus_sessions
                WHERE session_type = 'focus'
                  AND completed = TRUE
                  AND started_at >= $1
                  AND started_at < $2
                GROUP BY user_id
            ),
            task_stats AS (
                SELECT user_id,
                       COUNT(*)::bigint AS tasks_completed
                FROM focus_tasks
                WHERE is_completed = TRUE
                  AND completed_at >= $1
                  AND completed_at < $2
                GROUP BY user_id
            ),
            scored AS (
                SELECT u.id AS user_id,
                       COALESCE(s.focus_seconds, 0) AS focus_seconds,
                       (COALESCE(s.focus_seconds, 0)
                        + COALESCE(s.sessions_completed, 0) * $3
                        + COALESCE(st.current_streak, 0) * $4
                        + COALESCE(t.tasks_completed, 0) * $5)::numeric(14, 2) AS score
                FROM users u
                LEFT JOIN session_stats s ON s.user_id = u.id
                LEFT JOIN task_stats t ON t.user_id = u.id
                LEFT JOIN user_streaks st ON st.user_id = u.id
                WHERE s.user_id IS NOT NULL OR t.user_id IS NOT NULL
            )
            SELECT user_id, focus_seconds, score,
                   ROW_NUMBER() OVER (ORDER BY score DESC)::int AS rank
            FROM scored
            "#,
        )
        .bind(period_start)
        .bind(period_end)
        .bind(SESSIONS_WEIGHT)
        .bind(STREAK_WEIGHT)
        .bind(TASKS_WEIGHT)
        .fetch_all(&mut *tx)
        .await?;

        let mut users_ranked = 0u64;

        for row in &ranked {
            sqlx::query(
                r#"
                INSERT INTO leaderboard (user_id, period, period_start, period_end,
                                         total_focus_time_seconds, rank, score, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, CURRENT_TIMESTAMP)
                ON CONFLICT (user_id, period, period_start)
                DO UPDATE SET
                    period_end = EXCLUDED.period_end,
                    total_focus_time_seconds = EXCLUDED.total_focus_time_seconds,
                    rank = EXCLUDED.rank,
                    score = EXCLUDED.score,
                    updated_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(row.user_id)
            .bind(period.as_str())
            .bind(period_start)
            .bind(period_end)
            .bind(row.focus_seconds)
            .bind(row.rank)
            .bind(row.score)
            .execute(&mut *tx)
            .await?;

            users_ranked += 1;
        }

        tx.commit().await?;

        Ok(users_ranked)
    }
}
