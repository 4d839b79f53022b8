use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One star rating per (prompt, user); re-rating overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingRow {
    pub id: Uuid,
    pub prompt_id: Uuid,
    pub user_id: Uuid,
    pub stars: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub prompt_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Like,
    Save,
    Copy,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Like => "like",
            InteractionKind::Save => "save",
            InteractionKind::Copy => "copy",
        }
    }

    /// Column on `prompts` holding this kind's denormalized counter.
    pub fn counter_column(&self) -> &'static str {
        match self {
            InteractionKind::View => "view_count",
            InteractionKind::Like => "like_count",
            InteractionKind::Save => "save_count",
            InteractionKind::Copy => "copy_count",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InteractionRow {
    pub id: Uuid,
    pub prompt_id: Uuid,
    /// Opaque client-supplied visitor token (no auth wiring).
    pub visitor_id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchQueryRow {
    pub id: Uuid,
    pub query: String,
    pub result_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The serde names feed the JSON API and `as_str` feeds the `kind`
    // column; the two must agree or stored rows stop matching requests.
    #[test]
    fn test_interaction_kind_serde_matches_column_values() {
        for kind in [
            InteractionKind::View,
            InteractionKind::Like,
            InteractionKind::Save,
            InteractionKind::Copy,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: InteractionKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
