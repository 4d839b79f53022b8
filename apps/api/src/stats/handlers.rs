use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::engagement::{InteractionRow, SearchQueryRow};
use crate::models::stats::DailyStatRow;
use crate::state::AppState;
use crate::stats::aggregate::{rebuild_range, validate_range};

#[derive(Deserialize)]
pub struct DailyStatsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /api/v1/admin/stats/daily
/// Defaults to the trailing 30 days.
pub async fn handle_daily_stats(
    State(state): State<AppState>,
    Query(params): Query<DailyStatsQuery>,
) -> Result<Json<Vec<DailyStatRow>>, AppError> {
    let to = params.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = params.from.unwrap_or(to - Duration::days(29));
    validate_range(from, to)?;

    let rows = sqlx::query_as::<_, DailyStatRow>(
        "SELECT * FROM daily_stats WHERE stat_date >= $1 AND stat_date <= $2 ORDER BY stat_date",
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct RebuildRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Serialize)]
pub struct RebuildResponse {
    pub days_rebuilt: i64,
}

#[derive(Deserialize)]
pub struct RecentSearchesQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/searches/recent
pub async fn handle_recent_searches(
    State(state): State<AppState>,
    Query(params): Query<RecentSearchesQuery>,
) -> Result<Json<Vec<SearchQueryRow>>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let rows = sqlx::query_as::<_, SearchQueryRow>(
        "SELECT * FROM search_queries ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/admin/interactions/recent
pub async fn handle_recent_interactions(
    State(state): State<AppState>,
    Query(params): Query<RecentSearchesQuery>,
) -> Result<Json<Vec<InteractionRow>>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let rows = sqlx::query_as::<_, InteractionRow>(
        "SELECT * FROM interactions ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// POST /api/v1/admin/stats/rebuild
pub async fn handle_rebuild_stats(
    State(state): State<AppState>,
    Json(req): Json<RebuildRequest>,
) -> Result<Json<RebuildResponse>, AppError> {
    let days_rebuilt = rebuild_range(&state.db, req.from, req.to).await?;
    Ok(Json(RebuildResponse { days_rebuilt }))
}
