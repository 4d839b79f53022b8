pub mod handlers;
pub mod tfidf;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::prompt::{PromptRow, PromptSummary};
use crate::similarity::tfidf::{prompt_features, rank_by_similarity, Doc};

/// A related prompt with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedPrompt {
    #[serde(flatten)]
    pub prompt: PromptSummary,
    pub score: f64,
}

/// The related-prompts scorer trait. Implement this to swap backends
/// without touching the endpoint or handler code.
///
/// Carried in `AppState` as `Arc<dyn RelatedScorer>`.
#[async_trait]
pub trait RelatedScorer: Send + Sync {
    async fn related(
        &self,
        source: &PromptRow,
        candidates: Vec<PromptSummary>,
        limit: usize,
    ) -> Result<Vec<RelatedPrompt>, AppError>;
}

/// Default scorer: TF-IDF sparse vectors over tags/category/model/language
/// with cosine similarity. Pure-Rust, fast, deterministic.
pub struct TfIdfScorer;

#[async_trait]
impl RelatedScorer for TfIdfScorer {
    async fn related(
        &self,
        source: &PromptRow,
        candidates: Vec<PromptSummary>,
        limit: usize,
    ) -> Result<Vec<RelatedPrompt>, AppError> {
        let source_doc = Doc {
            id: source.id,
            features: prompt_features(
                &source.tags,
                source.category_id,
                &source.model,
                &source.language,
            ),
            like_count: source.like_count,
        };
        let docs: Vec<Doc> = candidates
            .iter()
            .map(|c| Doc {
                id: c.id,
                features: prompt_features(&c.tags, c.category_id, &c.model, &c.language),
                like_count: c.like_count,
            })
            .collect();

        let ranked = rank_by_similarity(&source_doc, &docs, limit);

        let mut by_id: std::collections::HashMap<uuid::Uuid, PromptSummary> =
            candidates.into_iter().map(|c| (c.id, c)).collect();
        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| by_id.remove(&id).map(|prompt| RelatedPrompt { prompt, score }))
            .collect())
    }
}
