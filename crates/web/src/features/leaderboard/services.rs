use sqlx::PgPool;
use storage::{
    dto::leaderboard::{LeaderboardQuery, RefreshRequest, UserRankQuery},
    error::Result,
    models::LeaderboardEntry,
    repository::leaderboard::LeaderboardRepository,
    services::score,
};
use uuid::Uuid;

/// Get the global leaderboard page for one period bucket
pub async fn global_leaderboard(
    pool: &PgPool,
    query: &LeaderboardQuery,
) -> Result<Vec<LeaderboardEntry>> {
    let repo = LeaderboardRepository::new(pool);
    repo.global(query.period, query.period_start, query.limit)
        .await
}

/// Get the leaderboard restricted to one class
pub async fn class_leaderboard(
    pool: &PgPool,
    class_id: Uuid,
    query: &LeaderboardQuery,
) -> Result<Vec<LeaderboardEntry>> {
    let repo = LeaderboardRepository::new(pool);
    repo.for_class(class_id, query.period, query.period_start, query.limit)
        .await
}

/// Get a user's rank, 0 when unranked
pub async fn user_rank(pool: &PgPool, user_id: Uuid, query: &UserRankQuery) -> Result<i32> {
    let repo = LeaderboardRepository::new(pool);
    repo.user_rank(user_id, query.period, query.period_start)
        .await
}

/// Get a user's full leaderboard entry, if any
pub async fn user_entry(
    pool: &PgPool,
    user_id: Uuid,
    query: &UserRankQuery,
) -> Result<Option<LeaderboardEntry>> {
    let repo = LeaderboardRepository::new(pool);
    repo.entry_for_user(user_id, query.period, query.period_start)
        .await
}

/// Recompute all rankings for one period bucket
pub async fn refresh_leaderboard(pool: &PgPool, req: &RefreshRequest) -> Result<u64> {
    score::refresh_period(pool, req.period, req.period_start, req.period_end).await
}
