use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One aggregated row per UTC day. Rebuildable from the source tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyStatRow {
    pub stat_date: NaiveDate,
    pub views: i64,
    pub likes: i64,
    pub saves: i64,
    pub copies: i64,
    pub ratings_count: i64,
    pub searches: i64,
    pub new_prompts: i64,
    pub updated_at: DateTime<Utc>,
}
