use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::engagement::ReviewRow;

pub const MAX_REVIEW_LEN: usize = 2000;

pub fn validate_review_body(body: &str) -> Result<(), AppError> {
    let len = body.trim().chars().count();
    if !(3..=MAX_REVIEW_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "review must be between 3 and {MAX_REVIEW_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn insert_review(
    pool: &PgPool,
    prompt_id: Uuid,
    user_id: Uuid,
    body: &str,
) -> Result<ReviewRow, AppError> {
    let row = sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (id, prompt_id, user_id, body)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(prompt_id)
    .bind(user_id)
    .bind(body.trim())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn list_reviews(
    pool: &PgPool,
    prompt_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ReviewRow>, AppError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT * FROM reviews WHERE prompt_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(prompt_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_body_bounds() {
        assert!(validate_review_body("ok!").is_ok());
        assert!(validate_review_body("no").is_err());
        assert!(validate_review_body(&"x".repeat(MAX_REVIEW_LEN + 1)).is_err());
    }

    #[test]
    fn test_review_body_whitespace_not_counted() {
        assert!(validate_review_body("  a  ").is_err());
    }
}
