use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    get_class_leaderboard, get_global_leaderboard, get_user_entry, get_user_rank,
    refresh_leaderboard,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/refresh", post(refresh_leaderboard))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/global", get(get_global_leaderboard))
        .route("/class/:class_id", get(get_class_leaderboard))
        .route("/users/:user_id/rank", get(get_user_rank))
        .route("/users/:user_id", get(get_user_entry))
        .merge(protected)
}
