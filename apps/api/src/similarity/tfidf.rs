//! TF-IDF vectorization + cosine similarity for related-prompt ranking.
//!
//! Each prompt becomes a sparse feature vector over its tags, category,
//! target model, and language. Feature weights are the field weight times
//! a smoothed IDF computed over the candidate corpus, so a shared niche
//! tag counts for more than a shared ubiquitous one.

use std::collections::HashMap;

use uuid::Uuid;

pub const WEIGHT_TAG: f64 = 1.0;
pub const WEIGHT_CATEGORY: f64 = 1.5;
pub const WEIGHT_MODEL: f64 = 1.0;
pub const WEIGHT_LANGUAGE: f64 = 0.5;

/// A document in the similarity corpus: raw (feature, field-weight) pairs.
#[derive(Debug, Clone)]
pub struct Doc {
    pub id: Uuid,
    pub features: Vec<(String, f64)>,
    /// Tie-breaker between equal similarity scores.
    pub like_count: i64,
}

/// Builds the sparse feature list for a prompt.
pub fn prompt_features(
    tags: &[String],
    category_id: Uuid,
    model: &str,
    language: &str,
) -> Vec<(String, f64)> {
    let mut features = Vec::with_capacity(tags.len() + 3);
    for tag in tags {
        features.push((format!("tag:{}", tag.to_lowercase()), WEIGHT_TAG));
    }
    features.push((format!("cat:{category_id}"), WEIGHT_CATEGORY));
    features.push((format!("model:{}", model.to_lowercase()), WEIGHT_MODEL));
    features.push((format!("lang:{}", language.to_lowercase()), WEIGHT_LANGUAGE));
    features
}

/// Ranks candidates by cosine similarity to `source`.
/// Zero-score candidates and the source itself are dropped; ties break by
/// like_count descending. Returns at most `limit` (id, score) pairs.
pub fn rank_by_similarity(source: &Doc, candidates: &[Doc], limit: usize) -> Vec<(Uuid, f64)> {
    if limit == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let idf = build_idf(source, candidates);
    let source_vec = weigh(&source.features, &idf);

    let mut scored: Vec<(Uuid, f64, i64)> = candidates
        .iter()
        .filter(|c| c.id != source.id)
        .filter_map(|c| {
            let vec = weigh(&c.features, &idf);
            let score = cosine(&source_vec, &vec);
            (score > 0.0).then_some((c.id, score, c.like_count))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.2.cmp(&a.2))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(id, score, _)| (id, score)).collect()
}

/// Smoothed IDF over source + candidates: `ln(n / (1 + df)) + 1`, floored
/// at zero. A feature present in every document still contributes a little.
fn build_idf(source: &Doc, candidates: &[Doc]) -> HashMap<String, f64> {
    let n_docs = candidates.len() + 1;
    let mut df: HashMap<&str, usize> = HashMap::new();

    for doc in std::iter::once(source).chain(candidates.iter()) {
        let mut seen: Vec<&str> = Vec::with_capacity(doc.features.len());
        for (feature, _) in &doc.features {
            if !seen.contains(&feature.as_str()) {
                seen.push(feature);
                *df.entry(feature).or_insert(0) += 1;
            }
        }
    }

    df.into_iter()
        .map(|(feature, count)| {
            let idf = ((n_docs as f64) / (1.0 + count as f64)).ln() + 1.0;
            (feature.to_string(), idf.max(0.0))
        })
        .collect()
}

fn weigh(features: &[(String, f64)], idf: &HashMap<String, f64>) -> HashMap<String, f64> {
    let mut vec: HashMap<String, f64> = HashMap::with_capacity(features.len());
    for (feature, field_weight) in features {
        let idf = idf.get(feature).copied().unwrap_or(0.0);
        *vec.entry(feature.clone()).or_insert(0.0) += field_weight * idf;
    }
    vec
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f64 = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: Uuid, tags: &[&str], likes: i64) -> Doc {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        Doc {
            id,
            features: prompt_features(&tags, Uuid::nil(), "gpt-4o", "en"),
            like_count: likes,
        }
    }

    #[test]
    fn test_identical_docs_score_one() {
        let source = doc(Uuid::new_v4(), &["sql", "data"], 0);
        let twin = doc(Uuid::new_v4(), &["sql", "data"], 0);
        let ranked = rank_by_similarity(&source, &[twin], 5);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_docs_dropped() {
        let source = Doc {
            id: Uuid::new_v4(),
            features: vec![("tag:rust".to_string(), WEIGHT_TAG)],
            like_count: 0,
        };
        let other = Doc {
            id: Uuid::new_v4(),
            features: vec![("tag:cooking".to_string(), WEIGHT_TAG)],
            like_count: 0,
        };
        assert!(rank_by_similarity(&source, &[other], 5).is_empty());
    }

    #[test]
    fn test_source_excluded_from_results() {
        let source = doc(Uuid::new_v4(), &["sql"], 0);
        let ranked = rank_by_similarity(&source, &[source.clone()], 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rare_shared_tag_outranks_common_one() {
        let source = doc(Uuid::new_v4(), &["rare", "common"], 0);
        let a = doc(Uuid::new_v4(), &["rare", "filler-a"], 0);
        let b = doc(Uuid::new_v4(), &["common", "filler-b"], 0);
        // "common" also appears in lots of unrelated docs, driving its IDF down.
        let mut candidates = vec![a.clone(), b.clone()];
        for _ in 0..20 {
            let mut noise = doc(Uuid::new_v4(), &["common", "unrelated"], 0);
            // Different category/model so only the tag overlaps with source.
            noise.features.retain(|(f, _)| f.starts_with("tag:"));
            candidates.push(noise);
        }

        let ranked = rank_by_similarity(&source, &candidates, 2);
        assert_eq!(ranked[0].0, a.id, "rare-tag match should rank first");
    }

    #[test]
    fn test_limit_respected() {
        let source = doc(Uuid::new_v4(), &["sql"], 0);
        let candidates: Vec<Doc> = (0..10).map(|i| doc(Uuid::new_v4(), &["sql"], i)).collect();
        assert_eq!(rank_by_similarity(&source, &candidates, 3).len(), 3);
    }

    #[test]
    fn test_ties_break_by_like_count() {
        let source = doc(Uuid::new_v4(), &["sql"], 0);
        let cold = doc(Uuid::new_v4(), &["sql"], 2);
        let popular = doc(Uuid::new_v4(), &["sql"], 50);
        let ranked = rank_by_similarity(&source, &[cold.clone(), popular.clone()], 2);
        assert_eq!(ranked[0].0, popular.id);
        assert_eq!(ranked[1].0, cold.id);
    }

    #[test]
    fn test_category_weighs_more_than_language() {
        let cat = Uuid::new_v4();
        let source = Doc {
            id: Uuid::new_v4(),
            features: prompt_features(&[], cat, "gpt-4o", "en"),
            like_count: 0,
        };
        let same_cat = Doc {
            id: Uuid::new_v4(),
            features: prompt_features(&[], cat, "other-model", "fr"),
            like_count: 0,
        };
        let same_lang = Doc {
            id: Uuid::new_v4(),
            features: prompt_features(&[], Uuid::new_v4(), "other-model", "en"),
            like_count: 0,
        };
        let ranked = rank_by_similarity(&source, &[same_cat.clone(), same_lang], 2);
        assert_eq!(ranked[0].0, same_cat.id);
    }
}
