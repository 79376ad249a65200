use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::leaderboard::{
        LeaderboardQuery, RefreshRequest, RefreshResponse, UserRankQuery, UserRankResponse,
    },
    models::LeaderboardEntry,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard/global",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Global leaderboard retrieved successfully", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_global_leaderboard(
    State(db): State<Database>,
    Query(query): Query<LeaderboardQuery>,
) -> WebResult<Response> {
    query.validate().map_err(WebError::BadRequest)?;

    let entries = services::global_leaderboard(db.pool(), &query).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/class/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class identifier"),
        LeaderboardQuery
    ),
    responses(
        (status = 200, description = "Class leaderboard retrieved successfully", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_class_leaderboard(
    State(db): State<Database>,
    Path(class_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> WebResult<Response> {
    query.validate().map_err(WebError::BadRequest)?;

    let entries = services::class_leaderboard(db.pool(), class_id, &query).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/users/{user_id}/rank",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        UserRankQuery
    ),
    responses(
        (status = 200, description = "Rank retrieved, 0 when the user is unranked", body = UserRankResponse)
    ),
    tag = "leaderboard"
)]
pub async fn get_user_rank(
    State(db): State<Database>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<UserRankQuery>,
) -> WebResult<Response> {
    let rank = services::user_rank(db.pool(), user_id, &query).await?;

    let response = UserRankResponse {
        user_id,
        period: query.period,
        period_start: query.period_start,
        rank,
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/users/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        UserRankQuery
    ),
    responses(
        (status = 200, description = "Leaderboard entry found", body = LeaderboardEntry),
        (status = 404, description = "No entry for this user and period")
    ),
    tag = "leaderboard"
)]
pub async fn get_user_entry(
    State(db): State<Database>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<UserRankQuery>,
) -> WebResult<Response> {
    let entry = services::user_entry(db.pool(), user_id, &query)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(entry).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leaderboard/refresh",
    request_body = RefreshRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rankings recomputed for the period", body = RefreshResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leaderboard"
)]
pub async fn refresh_leaderboard(
    State(db): State<Database>,
    Json(req): Json<RefreshRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let users_ranked = services::refresh_leaderboard(db.pool(), &req).await?;

    Ok(Json(RefreshResponse { users_ranked }).into_response())
}
