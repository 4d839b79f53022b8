use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::prompt::{CategoryRow, PromptRow, PromptSummary, TagRow};

const SUMMARY_COLUMNS: &str = "id, slug, title, description, model, language, category_id, \
     author_id, view_count, like_count, avg_rating, rating_count, tags, created_at";

/// Optional listing filters; `None` fields are skipped in SQL.
#[derive(Debug, Default, Clone)]
pub struct PromptFilters {
    pub category_slug: Option<String>,
    pub tag: Option<String>,
    pub model: Option<String>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSort {
    Recent,
    Top,
    Views,
}

impl PromptSort {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None | Some("recent") => Ok(PromptSort::Recent),
            Some("top") => Ok(PromptSort::Top),
            Some("views") => Ok(PromptSort::Views),
            Some(other) => Err(AppError::Validation(format!(
                "unknown sort '{other}' (expected recent, top, or views)"
            ))),
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            PromptSort::Recent => "created_at DESC",
            PromptSort::Top => "avg_rating DESC, rating_count DESC, created_at DESC",
            PromptSort::Views => "view_count DESC, created_at DESC",
        }
    }
}

const FILTER_CLAUSE: &str = "is_published \
     AND ($1::text IS NULL OR category_id = (SELECT id FROM categories WHERE slug = $1)) \
     AND ($2::text IS NULL OR $2 = ANY(tags)) \
     AND ($3::text IS NULL OR model = $3) \
     AND ($4::uuid IS NULL OR author_id = $4)";

pub async fn list_prompts(
    pool: &PgPool,
    filters: &PromptFilters,
    sort: PromptSort,
    limit: i64,
    offset: i64,
) -> Result<Vec<PromptSummary>, AppError> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM prompts WHERE {FILTER_CLAUSE} \
         ORDER BY {} LIMIT $5 OFFSET $6",
        sort.order_by()
    );
    let rows = sqlx::query_as::<_, PromptSummary>(&sql)
        .bind(&filters.category_slug)
        .bind(&filters.tag)
        .bind(&filters.model)
        .bind(filters.author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_prompts(pool: &PgPool, filters: &PromptFilters) -> Result<i64, AppError> {
    let sql = format!("SELECT COUNT(*) FROM prompts WHERE {FILTER_CLAUSE}");
    let total: i64 = sqlx::query_scalar(&sql)
        .bind(&filters.category_slug)
        .bind(&filters.tag)
        .bind(&filters.model)
        .bind(filters.author_id)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Fetches a published prompt by UUID or by slug.
pub async fn fetch_published(pool: &PgPool, id_or_slug: &str) -> Result<Option<PromptRow>, AppError> {
    let row = if let Ok(id) = id_or_slug.parse::<Uuid>() {
        sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE id = $1 AND is_published")
            .bind(id)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE slug = $1 AND is_published")
            .bind(id_or_slug)
            .fetch_optional(pool)
            .await?
    };
    Ok(row)
}

pub async fn fetch_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PromptRow>, AppError> {
    let row = sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub struct NewPrompt<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub description: Option<&'a str>,
    pub model: &'a str,
    pub language: &'a str,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub is_published: bool,
    pub tags: &'a [String],
}

pub async fn insert_prompt(pool: &PgPool, new: NewPrompt<'_>) -> Result<PromptRow, AppError> {
    let row = sqlx::query_as::<_, PromptRow>(
        r#"
        INSERT INTO prompts
            (id, slug, title, body, description, model, language,
             category_id, author_id, is_published, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.slug)
    .bind(new.title)
    .bind(new.body)
    .bind(new.description)
    .bind(new.model)
    .bind(new.language)
    .bind(new.category_id)
    .bind(new.author_id)
    .bind(new.is_published)
    .bind(new.tags)
    .fetch_one(pool)
    .await
    // Concurrent creates with the same title can race the slug probe.
    .map_err(|e| AppError::db_conflict(e, || format!("slug '{}' is already taken", new.slug)))?;
    Ok(row)
}

pub async fn update_prompt(pool: &PgPool, row: &PromptRow) -> Result<PromptRow, AppError> {
    let updated = sqlx::query_as::<_, PromptRow>(
        r#"
        UPDATE prompts SET
            title = $2, body = $3, description = $4, model = $5, language = $6,
            category_id = $7, is_published = $8, tags = $9, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(row.id)
    .bind(&row.title)
    .bind(&row.body)
    .bind(&row.description)
    .bind(&row.model)
    .bind(&row.language)
    .bind(row.category_id)
    .bind(row.is_published)
    .bind(&row.tags)
    .fetch_one(pool)
    .await?;
    Ok(updated)
}

pub async fn delete_prompt(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM prompts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn category_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, AppError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        r#"
        SELECT c.id, c.slug, c.name,
               (SELECT COUNT(*) FROM prompts p
                 WHERE p.category_id = c.id AND p.is_published) AS prompt_count
        FROM categories c
        ORDER BY c.name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_tags(pool: &PgPool, limit: i64) -> Result<Vec<TagRow>, AppError> {
    let rows = sqlx::query_as::<_, TagRow>(
        "SELECT id, name, usage_count FROM tags WHERE usage_count > 0 \
         ORDER BY usage_count DESC, name LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Upserts each tag and bumps its usage counter.
pub async fn bump_tag_usage(pool: &PgPool, tags: &[String]) -> Result<(), AppError> {
    for tag in tags {
        sqlx::query(
            r#"
            INSERT INTO tags (id, name, usage_count) VALUES ($1, $2, 1)
            ON CONFLICT (name) DO UPDATE SET usage_count = tags.usage_count + 1
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tag)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Decrements usage counters, flooring at zero.
pub async fn drop_tag_usage(pool: &PgPool, tags: &[String]) -> Result<(), AppError> {
    for tag in tags {
        sqlx::query("UPDATE tags SET usage_count = GREATEST(usage_count - 1, 0) WHERE name = $1")
            .bind(tag)
            .execute(pool)
            .await?;
    }
    Ok(())
}
