use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::similarity::RelatedScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis client used for view-dedup keys (SET NX EX).
    pub redis: RedisClient,
    pub config: Config,
    /// Pluggable related-prompts scorer. Default: TfIdfScorer.
    pub related_scorer: Arc<dyn RelatedScorer>,
}
