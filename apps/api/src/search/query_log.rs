use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Records a served search in `search_queries` on a detached task.
/// A logging failure must never fail the request.
pub fn log_search(pool: PgPool, query: String, result_count: i64) {
    tokio::spawn(async move {
        let result = sqlx::query(
            "INSERT INTO search_queries (id, query, result_count) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(&query)
        .bind(result_count)
        .execute(&pool)
        .await;

        if let Err(e) = result {
            warn!("Failed to log search query '{query}': {e}");
        }
    });
}
