use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One user's row on the leaderboard for a single period bucket.
///
/// At most one row exists per (user_id, period, period_start). `rank` stays
/// NULL until a refresh has ranked the period; `score` and
/// `total_focus_time_seconds` are overwritten wholesale on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub period: String,
    pub period_start: NaiveDateTime,
    pub period_end: Option<NaiveDateTime>,
    pub total_focus_time_seconds: i64,
    pub rank: Option<i32>,
    pub score: Decimal,
    pub updated_at: NaiveDateTime,
}
