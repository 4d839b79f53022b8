//! Daily-stats aggregation. Each row in `daily_stats` is derived entirely
//! from the source tables, so any day can be rebuilt idempotently.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;

/// Rebuild is bounded to stop a bad request walking years of history.
pub const MAX_REBUILD_DAYS: i64 = 370;

/// UTC day bounds: [midnight, next midnight).
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = NaiveDateTime::new(date, NaiveTime::MIN);
    let end = start + chrono::Duration::days(1);
    (start.and_utc(), end.and_utc())
}

/// Validates a rebuild range and returns the inclusive day count.
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<i64, AppError> {
    if from > to {
        return Err(AppError::Validation(
            "'from' must not be after 'to'".to_string(),
        ));
    }
    let days = (to - from).num_days() + 1;
    if days > MAX_REBUILD_DAYS {
        return Err(AppError::Validation(format!(
            "range covers {days} days; at most {MAX_REBUILD_DAYS} allowed"
        )));
    }
    Ok(days)
}

/// Aggregates one UTC day from interactions, ratings, search_queries and
/// prompts, then upserts the `daily_stats` row.
pub async fn aggregate_day(pool: &PgPool, date: NaiveDate) -> Result<(), AppError> {
    let (start, end) = day_bounds(date);

    let kind_counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT kind, COUNT(*) FROM interactions \
         WHERE created_at >= $1 AND created_at < $2 GROUP BY kind",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let count_of = |kind: &str| -> i64 {
        kind_counts
            .iter()
            .find(|(k, _)| k.as_str() == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };

    let ratings_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE created_at >= $1 AND created_at < $2")
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;

    let searches: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM search_queries WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let new_prompts: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM prompts WHERE created_at >= $1 AND created_at < $2")
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;

    sqlx::query(
        r#"
        INSERT INTO daily_stats
            (stat_date, views, likes, saves, copies, ratings_count, searches, new_prompts)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (stat_date) DO UPDATE SET
            views = EXCLUDED.views,
            likes = EXCLUDED.likes,
            saves = EXCLUDED.saves,
            copies = EXCLUDED.copies,
            ratings_count = EXCLUDED.ratings_count,
            searches = EXCLUDED.searches,
            new_prompts = EXCLUDED.new_prompts,
            updated_at = NOW()
        "#,
    )
    .bind(date)
    .bind(count_of("view"))
    .bind(count_of("like"))
    .bind(count_of("save"))
    .bind(count_of("copy"))
    .bind(ratings_count)
    .bind(searches)
    .bind(new_prompts)
    .execute(pool)
    .await?;

    Ok(())
}

/// Re-aggregates every day in the inclusive range. Returns days rebuilt.
pub async fn rebuild_range(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64, AppError> {
    let days = validate_range(from, to)?;
    info!("Rebuilding daily stats for {days} days ({from} .. {to})");

    let mut date = from;
    while date <= to {
        aggregate_day(pool, date).await?;
        date = date
            .succ_opt()
            .ok_or_else(|| AppError::Validation("date out of range".to_string()))?;
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_bounds_span_24_hours() {
        let (start, end) = day_bounds(d(2024, 3, 10));
        assert_eq!((end - start).num_hours(), 24);
        assert_eq!(start.to_rfc3339(), "2024-03-10T00:00:00+00:00");
    }

    #[test]
    fn test_single_day_range() {
        assert_eq!(validate_range(d(2024, 1, 1), d(2024, 1, 1)).unwrap(), 1);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(validate_range(d(2024, 1, 2), d(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_year_long_range_allowed_but_not_more() {
        assert!(validate_range(d(2024, 1, 1), d(2024, 12, 31)).is_ok());
        assert!(validate_range(d(2023, 1, 1), d(2024, 12, 31)).is_err());
    }
}
