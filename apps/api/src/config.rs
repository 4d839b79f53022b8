use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// Public origin used to build absolute sitemap URLs, e.g. "https://promptdeck.io".
    pub site_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// How long a (prompt, visitor) pair suppresses repeat view counting.
    pub view_dedup_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            site_base_url: require_env("SITE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            view_dedup_ttl_secs: std::env::var("VIEW_DEDUP_TTL_SECS")
                .unwrap_or_else(|_| "21600".to_string())
                .parse::<u64>()
                .context("VIEW_DEDUP_TTL_SECS must be a number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
