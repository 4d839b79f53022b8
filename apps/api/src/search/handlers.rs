use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::prompt::PromptSummary;
use crate::pagination::PageWindow;
use crate::search::{normalize_query, query_log};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQueryParams {
    pub q: String,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub prompts: Vec<PromptSummary>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

const SEARCH_CLAUSE: &str = "is_published \
     AND (title ILIKE $1 OR description ILIKE $1 OR body ILIKE $1) \
     AND ($2::text IS NULL OR category_id = (SELECT id FROM categories WHERE slug = $2))";

/// GET /api/v1/search
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = normalize_query(&params.q)?;
    let window = PageWindow::resolve(params.page, params.per_page);
    let pattern = format!("%{}%", escape_like(&query));

    let sql = format!(
        "SELECT id, slug, title, description, model, language, category_id, author_id, \
                view_count, like_count, avg_rating, rating_count, tags, created_at \
         FROM prompts WHERE {SEARCH_CLAUSE} \
         ORDER BY (title ILIKE $1) DESC, like_count DESC, created_at DESC \
         LIMIT $3 OFFSET $4"
    );
    let prompts = sqlx::query_as::<_, PromptSummary>(&sql)
        .bind(&pattern)
        .bind(&params.category)
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(&state.db)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM prompts WHERE {SEARCH_CLAUSE}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(&pattern)
        .bind(&params.category)
        .fetch_one(&state.db)
        .await?;

    query_log::log_search(state.db.clone(), query.clone(), total);

    Ok(Json(SearchResponse {
        query,
        prompts,
        page: window.page,
        per_page: window.per_page,
        total,
    }))
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50% off_now"), "50\\% off\\_now");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_escape_like_plain_text_untouched() {
        assert_eq!(escape_like("sql helper"), "sql helper");
    }
}
