use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::queries::fetch_by_id;
use crate::engagement::interactions::{
    record_interaction, validate_visitor_id, InteractionResult,
};
use crate::engagement::ratings::{refresh_rating_aggregate, upsert_rating, validate_stars};
use crate::engagement::reviews::{insert_review, list_reviews, validate_review_body};
use crate::errors::AppError;
use crate::models::engagement::{InteractionKind, RatingRow, ReviewRow};
use crate::pagination::PageWindow;
use crate::state::AppState;

async fn require_prompt(state: &AppState, id: Uuid) -> Result<(), AppError> {
    fetch_by_id(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub user_id: Uuid,
    pub stars: i16,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub rating: RatingRow,
    pub avg_rating: f64,
    pub rating_count: i64,
}

/// PUT /api/v1/prompts/:id/rating
pub async fn handle_rate_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RatingResponse>, AppError> {
    validate_stars(req.stars)?;
    require_prompt(&state, id).await?;

    let rating = upsert_rating(&state.db, id, req.user_id, req.stars).await?;
    let (avg_rating, rating_count) = refresh_rating_aggregate(&state.db, id).await?;

    Ok(Json(RatingResponse {
        rating,
        avg_rating,
        rating_count,
    }))
}

#[derive(Deserialize)]
pub struct ReviewsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/v1/prompts/:id/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ReviewsQuery>,
) -> Result<Json<Vec<ReviewRow>>, AppError> {
    require_prompt(&state, id).await?;
    let window = PageWindow::resolve(params.page, params.per_page);
    let rows = list_reviews(&state.db, id, window.limit(), window.offset()).await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: Uuid,
    pub body: String,
}

/// POST /api/v1/prompts/:id/reviews
pub async fn handle_create_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewRow>), AppError> {
    validate_review_body(&req.body)?;
    require_prompt(&state, id).await?;

    let row = insert_review(&state.db, id, req.user_id, &req.body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
pub struct InteractionRequest {
    pub visitor_id: String,
    pub kind: InteractionKind,
}

/// POST /api/v1/prompts/:id/interactions
pub async fn handle_record_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InteractionRequest>,
) -> Result<Json<InteractionResult>, AppError> {
    let visitor_id = req.visitor_id.trim();
    validate_visitor_id(visitor_id)?;
    require_prompt(&state, id).await?;

    let result = record_interaction(&state, id, visitor_id, req.kind).await?;
    Ok(Json(result))
}
