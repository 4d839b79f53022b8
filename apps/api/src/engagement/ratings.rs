use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::engagement::RatingRow;

pub fn validate_stars(stars: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&stars) {
        return Err(AppError::Validation(
            "stars must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// Upserts the user's rating for a prompt; re-rating overwrites.
pub async fn upsert_rating(
    pool: &PgPool,
    prompt_id: Uuid,
    user_id: Uuid,
    stars: i16,
) -> Result<RatingRow, AppError> {
    let row = sqlx::query_as::<_, RatingRow>(
        r#"
        INSERT INTO ratings (id, prompt_id, user_id, stars)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (prompt_id, user_id)
        DO UPDATE SET stars = EXCLUDED.stars, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(prompt_id)
    .bind(user_id)
    .bind(stars)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Recomputes and stores the prompt's denormalized rating aggregate.
/// Returns the fresh (avg_rating, rating_count).
pub async fn refresh_rating_aggregate(
    pool: &PgPool,
    prompt_id: Uuid,
) -> Result<(f64, i64), AppError> {
    let (avg, count): (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(AVG(stars)::float8, 0), COUNT(*) FROM ratings WHERE prompt_id = $1",
    )
    .bind(prompt_id)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE prompts SET avg_rating = $2, rating_count = $3 WHERE id = $1")
        .bind(prompt_id)
        .bind(avg)
        .bind(count)
        .execute(pool)
        .await?;

    Ok((avg, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_in_range_accepted() {
        for stars in 1..=5 {
            assert!(validate_stars(stars).is_ok());
        }
    }

    #[test]
    fn test_stars_out_of_range_rejected() {
        assert!(validate_stars(0).is_err());
        assert!(validate_stars(6).is_err());
        assert!(validate_stars(-1).is_err());
    }
}
