use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::prompt::PromptSummary;
use crate::similarity::RelatedPrompt;
use crate::state::AppState;

const DEFAULT_RELATED: usize = 6;
const MAX_RELATED: usize = 24;

/// How many candidates we vectorize per request. Related prompts come
/// from the same category or share a tag with the source.
const CANDIDATE_FETCH_LIMIT: i64 = 500;

#[derive(Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RelatedResponse {
    pub related: Vec<RelatedPrompt>,
}

/// GET /api/v1/prompts/:id/related
pub async fn handle_related_prompts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<RelatedQuery>,
) -> Result<Json<RelatedResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_RELATED).clamp(1, MAX_RELATED);

    let source = sqlx::query_as::<_, crate::models::prompt::PromptRow>(
        "SELECT * FROM prompts WHERE id = $1 AND is_published",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))?;

    let candidates = sqlx::query_as::<_, PromptSummary>(
        r#"
        SELECT id, slug, title, description, model, language, category_id, author_id,
               view_count, like_count, avg_rating, rating_count, tags, created_at
        FROM prompts
        WHERE is_published AND id <> $1
          AND (category_id = $2 OR tags && $3)
        ORDER BY created_at DESC
        LIMIT $4
        "#,
    )
    .bind(source.id)
    .bind(source.category_id)
    .bind(&source.tags)
    .bind(CANDIDATE_FETCH_LIMIT)
    .fetch_all(&state.db)
    .await?;

    let related = state.related_scorer.related(&source, candidates, limit).await?;
    Ok(Json(RelatedResponse { related }))
}
