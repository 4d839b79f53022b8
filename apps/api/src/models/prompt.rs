use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full prompt row, including the template body and denormalized counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromptRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub description: Option<String>,
    /// Target AI model identifier, e.g. "gpt-4o" or "claude-sonnet".
    pub model: String,
    /// Prompt language code, e.g. "en".
    pub language: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub is_published: bool,
    pub view_count: i64,
    pub like_count: i64,
    pub save_count: i64,
    pub copy_count: i64,
    pub avg_rating: f64,
    pub rating_count: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection — everything except the template body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromptSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub model: String,
    pub language: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub view_count: i64,
    pub like_count: i64,
    pub avg_rating: f64,
    pub rating_count: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub prompt_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub usage_count: i64,
}
