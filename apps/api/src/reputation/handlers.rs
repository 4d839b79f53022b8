use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::reputation::{compute_reputation, ReputationInputs, ReputationReport};
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserReputationResponse {
    pub user: UserRow,
    #[serde(flatten)]
    pub report: ReputationReport,
}

// Aggregates must cast to types sqlx can decode directly: AVG yields
// NUMERIC (not FLOAT8) and SUM(bigint) yields NUMERIC (not INT8).
const RATING_AGG_SQL: &str = "SELECT COALESCE(AVG(r.stars), 0)::float8, COUNT(r.id) \
     FROM ratings r \
     JOIN prompts p ON p.id = r.prompt_id \
     WHERE p.author_id = $1 AND p.is_published";

const ENGAGEMENT_SUM_SQL: &str = "SELECT COALESCE(SUM(like_count), 0)::bigint, \
            COALESCE(SUM(save_count), 0)::bigint \
     FROM prompts WHERE author_id = $1 AND is_published";

const COMMENT_COUNT_SQL: &str = "SELECT COUNT(*) \
     FROM reviews v \
     JOIN prompts p ON p.id = v.prompt_id \
     WHERE p.author_id = $1 AND p.is_published";

/// GET /api/v1/users/:id/reputation
pub async fn handle_user_reputation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserReputationResponse>, AppError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    let (avg_rating, rating_count): (f64, i64) = sqlx::query_as(RATING_AGG_SQL)
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    let (likes, saves): (i64, i64) = sqlx::query_as(ENGAGEMENT_SUM_SQL)
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    let comments: i64 = sqlx::query_scalar(COMMENT_COUNT_SQL)
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    let report = compute_reputation(&ReputationInputs {
        avg_rating,
        rating_count,
        likes,
        saves,
        comments,
    });
    Ok(Json(UserReputationResponse { user, report }))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Guard the decode contract: we read these as (f64, i64) / (i64, i64),
    // so the NUMERIC-producing aggregates must carry explicit casts.
    #[test]
    fn test_avg_aggregate_cast_to_float8() {
        assert!(RATING_AGG_SQL.contains("::float8"));
    }

    #[test]
    fn test_sum_aggregates_cast_to_bigint() {
        assert_eq!(ENGAGEMENT_SUM_SQL.matches("::bigint").count(), 2);
    }
}
