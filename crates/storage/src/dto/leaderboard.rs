use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Leaderboard time bucket kind, stored lowercase in the `period` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl LeaderboardPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    pub period: LeaderboardPeriod,
    pub period_start: NaiveDateTime,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

impl LeaderboardQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserRankQuery {
    pub period: LeaderboardPeriod,
    pub period_start: NaiveDateTime,
}

/// Request payload for recomputing all rankings of one period bucket
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_refresh_window"))]
pub struct RefreshRequest {
    pub period: LeaderboardPeriod,
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
}

fn validate_refresh_window(req: &RefreshRequest) -> Result<(), validator::ValidationError> {
    if req.period_end <= req.period_start {
        return Err(validator::ValidationError::new("empty_refresh_window"));
    }

    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRankResponse {
    pub user_id: Uuid,
    pub period: LeaderboardPeriod,
    pub period_start: NaiveDateTime,
    /// 0 when the user has no ranked row for this period
    pub rank: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub users_ranked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_period_serializes_lowercase() {
        assert_eq!(LeaderboardPeriod::Daily.as_str(), "daily");
        assert_eq!(LeaderboardPeriod::Weekly.as_str(), "weekly");
        assert_eq!(LeaderboardPeriod::Monthly.as_str(), "monthly");

        let parsed: LeaderboardPeriod = serde_json::from_value(json!("weekly")).unwrap();
        assert_eq!(parsed, LeaderboardPeriod::Weekly);
        assert_eq!(
            serde_json::to_value(LeaderboardPeriod::Monthly).unwrap(),
            json!("monthly")
        );
    }

    #[test]
    fn test_query_limit_defaults_to_fifty() {
        let query: LeaderboardQuery = serde_json::from_value(json!({
            "period": "weekly",
            "period_start": "2024-03-04T00:00:00"
        }))
        .unwrap();

        assert_eq!(query.limit, 50);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_rejects_out_of_range_limit() {
        let query: LeaderboardQuery = serde_json::from_value(json!({
            "period": "daily",
            "period_start": "2024-03-04T00:00:00",
            "limit": 0
        }))
        .unwrap();
        assert!(query.validate().is_err());

        let query: LeaderboardQuery = serde_json::from_value(json!({
            "period": "daily",
            "period_start": "2024-03-04T00:00:00",
            "limit": 101
        }))
        .unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_refresh_request_rejects_empty_window() {
        let req: RefreshRequest = serde_json::from_value(json!({
            "period": "weekly",
            "period_start": "2024-03-11T00:00:00",
            "period_end": "2024-03-04T00:00:00"
        }))
        .unwrap();
        assert!(req.validate().is_err());

        let req: RefreshRequest = serde_json::from_value(json!({
            "period": "weekly",
            "period_start": "2024-03-04T00:00:00",
            "period_end": "2024-03-11T00:00:00"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }
}
