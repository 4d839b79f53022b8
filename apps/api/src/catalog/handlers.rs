use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::queries::{self, NewPrompt, PromptFilters, PromptSort};
use crate::catalog::slug::{slugify, unique_slug};
use crate::catalog::validate::{normalize_tags, validate_body, validate_title};
use crate::errors::AppError;
use crate::models::prompt::{CategoryRow, PromptRow, PromptSummary, TagRow};
use crate::pagination::PageWindow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListPromptsQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub model: Option<String>,
    pub author_id: Option<Uuid>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
pub struct PromptListResponse {
    pub prompts: Vec<PromptSummary>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// GET /api/v1/prompts
pub async fn handle_list_prompts(
    State(state): State<AppState>,
    Query(params): Query<ListPromptsQuery>,
) -> Result<Json<PromptListResponse>, AppError> {
    let sort = PromptSort::parse(params.sort.as_deref())?;
    let window = PageWindow::resolve(params.page, params.per_page);
    let filters = PromptFilters {
        category_slug: params.category,
        tag: params.tag.map(|t| t.trim().to_lowercase()),
        model: params.model,
        author_id: params.author_id,
    };

    let prompts =
        queries::list_prompts(&state.db, &filters, sort, window.limit(), window.offset()).await?;
    let total = queries::count_prompts(&state.db, &filters).await?;

    Ok(Json(PromptListResponse {
        prompts,
        page: window.page,
        per_page: window.per_page,
        total,
    }))
}

fn default_language() -> String {
    "en".to_string()
}

fn default_published() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreatePromptRequest {
    pub title: String,
    pub body: String,
    pub description: Option<String>,
    pub model: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

/// POST /api/v1/prompts
pub async fn handle_create_prompt(
    State(state): State<AppState>,
    Json(req): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<PromptRow>), AppError> {
    validate_title(&req.title)?;
    validate_body(&req.body)?;
    let tags = normalize_tags(&req.tags)?;

    if !queries::category_exists(&state.db, req.category_id).await? {
        return Err(AppError::Validation(format!(
            "category {} does not exist",
            req.category_id
        )));
    }

    let slug = unique_slug(&state.db, &slugify(&req.title)).await?;
    let row = queries::insert_prompt(
        &state.db,
        NewPrompt {
            slug: &slug,
            title: req.title.trim(),
            body: &req.body,
            description: req.description.as_deref(),
            model: &req.model,
            language: &req.language,
            category_id: req.category_id,
            author_id: req.author_id,
            is_published: req.is_published,
            tags: &tags,
        },
    )
    .await?;
    queries::bump_tag_usage(&state.db, &tags).await?;

    tracing::info!("Created prompt {} ({})", row.id, row.slug);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/prompts/:id_or_slug
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<PromptRow>, AppError> {
    let row = queries::fetch_published(&state.db, &id_or_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{id_or_slug}' not found")))?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct UpdatePromptRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// PATCH /api/v1/prompts/:id
pub async fn handle_update_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePromptRequest>,
) -> Result<Json<PromptRow>, AppError> {
    let mut row = queries::fetch_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))?;

    if let Some(title) = req.title {
        validate_title(&title)?;
        row.title = title.trim().to_string();
    }
    if let Some(body) = req.body {
        validate_body(&body)?;
        row.body = body;
    }
    if let Some(description) = req.description {
        row.description = Some(description);
    }
    if let Some(model) = req.model {
        row.model = model;
    }
    if let Some(language) = req.language {
        row.language = language;
    }
    if let Some(category_id) = req.category_id {
        if !queries::category_exists(&state.db, category_id).await? {
            return Err(AppError::Validation(format!(
                "category {category_id} does not exist"
            )));
        }
        row.category_id = category_id;
    }
    if let Some(is_published) = req.is_published {
        row.is_published = is_published;
    }

    let old_tags = row.tags.clone();
    if let Some(tags) = req.tags {
        row.tags = normalize_tags(&tags)?;
    }

    let updated = queries::update_prompt(&state.db, &row).await?;

    // Adjust tag usage only for the diff.
    let added: Vec<String> = updated
        .tags
        .iter()
        .filter(|t| !old_tags.contains(t))
        .cloned()
        .collect();
    let removed: Vec<String> = old_tags
        .iter()
        .filter(|t| !updated.tags.contains(t))
        .cloned()
        .collect();
    queries::bump_tag_usage(&state.db, &added).await?;
    queries::drop_tag_usage(&state.db, &removed).await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/prompts/:id
pub async fn handle_delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let row = queries::fetch_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))?;

    queries::delete_prompt(&state.db, id).await?;
    queries::drop_tag_usage(&state.db, &row.tags).await?;

    tracing::info!("Deleted prompt {} ({})", row.id, row.slug);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRow>>, AppError> {
    Ok(Json(queries::list_categories(&state.db).await?))
}

#[derive(Deserialize)]
pub struct TagsQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    Query(params): Query<TagsQuery>,
) -> Result<Json<Vec<TagRow>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 200);
    Ok(Json(queries::list_tags(&state.db, limit).await?))
}
