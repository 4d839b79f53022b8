use redis::AsyncCommands;
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::engagement::InteractionKind;
use crate::state::AppState;

/// Outcome of recording one interaction.
#[derive(Debug, Serialize)]
pub struct InteractionResult {
    pub counted: bool,
    /// For like/save toggles: whether the interaction is now active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub fn validate_visitor_id(visitor_id: &str) -> Result<(), AppError> {
    let len = visitor_id.chars().count();
    if !(1..=128).contains(&len) {
        return Err(AppError::Validation(
            "visitor_id must be between 1 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

pub async fn record_interaction(
    state: &AppState,
    prompt_id: Uuid,
    visitor_id: &str,
    kind: InteractionKind,
) -> Result<InteractionResult, AppError> {
    match kind {
        InteractionKind::View => record_view(state, prompt_id, visitor_id).await,
        InteractionKind::Like | InteractionKind::Save => {
            toggle(&state.db, prompt_id, visitor_id, kind).await
        }
        InteractionKind::Copy => {
            insert_and_bump(&state.db, prompt_id, visitor_id, kind).await?;
            Ok(InteractionResult {
                counted: true,
                active: None,
            })
        }
    }
}

/// Views are deduped per (prompt, visitor) with a Redis SET NX EX key.
/// A Redis outage degrades to counting every view rather than failing.
async fn record_view(
    state: &AppState,
    prompt_id: Uuid,
    visitor_id: &str,
) -> Result<InteractionResult, AppError> {
    let fresh = match view_key_fresh(state, prompt_id, visitor_id).await {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!("View dedup unavailable, counting view: {e}");
            true
        }
    };

    if !fresh {
        return Ok(InteractionResult {
            counted: false,
            active: None,
        });
    }

    insert_and_bump(&state.db, prompt_id, visitor_id, InteractionKind::View).await?;
    Ok(InteractionResult {
        counted: true,
        active: None,
    })
}

async fn view_key_fresh(
    state: &AppState,
    prompt_id: Uuid,
    visitor_id: &str,
) -> Result<bool, redis::RedisError> {
    let mut conn = state.redis.get_multiplexed_async_connection().await?;
    let key = format!("view:{prompt_id}:{visitor_id}");
    let set: bool = conn
        .set_options(
            &key,
            1u8,
            redis::SetOptions::default()
                .conditional_set(redis::ExistenceCheck::NX)
                .with_expiration(redis::SetExpiry::EX(
                    state.config.view_dedup_ttl_secs as usize,
                )),
        )
        .await?;
    Ok(set)
}

/// Like/save flip between on and off; the counter follows, flooring at zero.
async fn toggle(
    pool: &PgPool,
    prompt_id: Uuid,
    visitor_id: &str,
    kind: InteractionKind,
) -> Result<InteractionResult, AppError> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM interactions WHERE prompt_id = $1 AND visitor_id = $2 AND kind = $3",
    )
    .bind(prompt_id)
    .bind(visitor_id)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    if let Some(id) = existing {
        sqlx::query("DELETE FROM interactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        let sql = format!(
            "UPDATE prompts SET {col} = GREATEST({col} - 1, 0) WHERE id = $1",
            col = kind.counter_column()
        );
        sqlx::query(&sql).bind(prompt_id).execute(pool).await?;
        return Ok(InteractionResult {
            counted: false,
            active: Some(false),
        });
    }

    insert_and_bump(pool, prompt_id, visitor_id, kind).await?;
    Ok(InteractionResult {
        counted: true,
        active: Some(true),
    })
}

async fn insert_and_bump(
    pool: &PgPool,
    prompt_id: Uuid,
    visitor_id: &str,
    kind: InteractionKind,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO interactions (id, prompt_id, visitor_id, kind) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(prompt_id)
    .bind(visitor_id)
    .bind(kind.as_str())
    .execute(pool)
    .await?;

    let sql = format!(
        "UPDATE prompts SET {col} = {col} + 1 WHERE id = $1",
        col = kind.counter_column()
    );
    sqlx::query(&sql).bind(prompt_id).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_id_bounds() {
        assert!(validate_visitor_id("v-1").is_ok());
        assert!(validate_visitor_id("").is_err());
        assert!(validate_visitor_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_visitor_id_counts_chars_not_bytes() {
        // 128 two-byte chars: 256 bytes but within the 128-char limit.
        let wide = "é".repeat(128);
        assert_eq!(wide.len(), 256);
        assert!(validate_visitor_id(&wide).is_ok());
        assert!(validate_visitor_id(&"é".repeat(129)).is_err());
    }
}
