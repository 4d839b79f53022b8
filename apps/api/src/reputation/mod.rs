pub mod handlers;

use serde::{Deserialize, Serialize};

// Volume caps: activity at or beyond the cap earns the full component.
const LIKES_CAP: i64 = 500;
const SAVES_CAP: i64 = 200;
const COMMENTS_CAP: i64 = 100;

// Full rating confidence requires this many ratings.
const RATING_CONFIDENCE_N: i64 = 20;

/// Aggregate engagement a user has received across their published prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReputationInputs {
    pub avg_rating: f64,
    pub rating_count: i64,
    pub likes: i64,
    pub saves: i64,
    pub comments: i64,
}

/// 0–100 reputation score with its component breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationReport {
    pub score: u32,
    pub rating_part: f64,
    pub likes_part: f64,
    pub saves_part: f64,
    pub comments_part: f64,
    pub rating_count: i64,
    pub likes: i64,
    pub saves: i64,
    pub comments: i64,
}

/// Computes the reputation score:
/// `100 · (0.40·rating + 0.25·likes + 0.20·saves + 0.15·comments)`.
/// The rating part is confidence-scaled by min(n, 20)/20 so a single
/// 5-star rating cannot dominate; volume parts use log normalization
/// against a per-signal cap.
pub fn compute_reputation(inputs: &ReputationInputs) -> ReputationReport {
    let confidence = (inputs.rating_count.min(RATING_CONFIDENCE_N) as f64)
        / RATING_CONFIDENCE_N as f64;
    let rating_part = (inputs.avg_rating / 5.0).clamp(0.0, 1.0) * confidence;

    let likes_part = volume_part(inputs.likes, LIKES_CAP);
    let saves_part = volume_part(inputs.saves, SAVES_CAP);
    let comments_part = volume_part(inputs.comments, COMMENTS_CAP);

    let raw =
        0.40 * rating_part + 0.25 * likes_part + 0.20 * saves_part + 0.15 * comments_part;
    let score = (raw * 100.0).round().clamp(0.0, 100.0) as u32;

    ReputationReport {
        score,
        rating_part,
        likes_part,
        saves_part,
        comments_part,
        rating_count: inputs.rating_count,
        likes: inputs.likes,
        saves: inputs.saves,
        comments: inputs.comments,
    }
}

fn volume_part(n: i64, cap: i64) -> f64 {
    if n <= 0 {
        return 0.0;
    }
    let part = ((1 + n) as f64).ln() / ((1 + cap) as f64).ln();
    part.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_activity_scores_zero() {
        let report = compute_reputation(&ReputationInputs::default());
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_maxed_inputs_score_100() {
        let report = compute_reputation(&ReputationInputs {
            avg_rating: 5.0,
            rating_count: 20,
            likes: 500,
            saves: 200,
            comments: 100,
        });
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_single_five_star_rating_is_dampened() {
        let report = compute_reputation(&ReputationInputs {
            avg_rating: 5.0,
            rating_count: 1,
            ..Default::default()
        });
        // rating_part = 1.0 * 1/20 = 0.05 → 0.40 * 0.05 * 100 = 2
        assert_eq!(report.score, 2);
    }

    #[test]
    fn test_more_likes_never_lowers_score() {
        let base = ReputationInputs {
            likes: 10,
            ..Default::default()
        };
        let more = ReputationInputs {
            likes: 100,
            ..Default::default()
        };
        assert!(compute_reputation(&more).score >= compute_reputation(&base).score);
    }

    #[test]
    fn test_volume_beyond_cap_does_not_exceed_component() {
        let report = compute_reputation(&ReputationInputs {
            likes: 1_000_000,
            ..Default::default()
        });
        assert_eq!(report.score, 25);
        assert_eq!(report.likes_part, 1.0);
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let report = compute_reputation(&ReputationInputs {
            avg_rating: 9.0, // corrupt upstream data
            rating_count: 1000,
            likes: i64::MAX / 2,
            saves: i64::MAX / 2,
            comments: i64::MAX / 2,
        });
        assert!(report.score <= 100);
    }
}
