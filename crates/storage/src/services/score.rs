use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::leaderboard::LeaderboardPeriod;
use crate::error::Result;
use crate::repository::leaderboard::LeaderboardRepository;

/// Points credited per completed focus session.
pub const SESSIONS_WEIGHT: i64 = 300;
/// Points credited per day of the user's current streak.
pub const STREAK_WEIGHT: i64 = 1000;
/// Points credited per completed task.
pub const TASKS_WEIGHT: i64 = 500;

/// Score one user's statistics with the leaderboard weighting: one point per
/// focus second plus the weighted session, streak and task counts.
///
/// Mirrors the formula the refresh query evaluates in SQL; the weights are
/// bound into that query from the same constants.
pub fn compute_score(
    focus_time_seconds: i64,
    sessions_completed: i64,
    current_streak: i64,
    tasks_completed: i64,
) -> Decimal {
    Decimal::from(
        focus_time_seconds
            + sessions_completed * SESSIONS_WEIGHT
            + current_streak * STREAK_WEIGHT
            + tasks_completed * TASKS_WEIGHT,
    )
}

/// Recompute and replace all rankings for one period bucket.
pub async fn refresh_period(
    pool: &PgPool,
    period: LeaderboardPeriod,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
) -> Result<u64> {
    let repo = LeaderboardRepository::new(pool);
    repo.refresh(period, period_start, period_end).await
}
