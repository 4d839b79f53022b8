pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::engagement::handlers as engagement;
use crate::reputation::handlers as reputation;
use crate::search::handlers as search;
use crate::similarity::handlers as similarity;
use crate::sitemap;
use crate::state::AppState;
use crate::stats::handlers as stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/sitemap.xml", get(sitemap::handle_sitemap))
        // Catalog
        .route("/api/v1/prompts", get(catalog::handle_list_prompts))
        .route("/api/v1/prompts", post(catalog::handle_create_prompt))
        .route("/api/v1/prompts/:id", get(catalog::handle_get_prompt))
        .route("/api/v1/prompts/:id", patch(catalog::handle_update_prompt))
        .route("/api/v1/prompts/:id", delete(catalog::handle_delete_prompt))
        .route("/api/v1/categories", get(catalog::handle_list_categories))
        .route("/api/v1/tags", get(catalog::handle_list_tags))
        // Search
        .route("/api/v1/search", get(search::handle_search))
        // Engagement
        .route(
            "/api/v1/prompts/:id/rating",
            put(engagement::handle_rate_prompt),
        )
        .route(
            "/api/v1/prompts/:id/reviews",
            get(engagement::handle_list_reviews).post(engagement::handle_create_review),
        )
        .route(
            "/api/v1/prompts/:id/interactions",
            post(engagement::handle_record_interaction),
        )
        // Recommendations
        .route(
            "/api/v1/prompts/:id/related",
            get(similarity::handle_related_prompts),
        )
        // Reputation
        .route(
            "/api/v1/users/:id/reputation",
            get(reputation::handle_user_reputation),
        )
        // Admin stats
        .route("/api/v1/admin/stats/daily", get(stats::handle_daily_stats))
        .route(
            "/api/v1/admin/searches/recent",
            get(stats::handle_recent_searches),
        )
        .route(
            "/api/v1/admin/interactions/recent",
            get(stats::handle_recent_interactions),
        )
        .route(
            "/api/v1/admin/stats/rebuild",
            post(stats::handle_rebuild_stats),
        )
        .with_state(state)
}
