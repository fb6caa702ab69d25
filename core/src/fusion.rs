//! Score fusion: lexical title boosts layered over cosine similarity.
//!
//! Cosine over short sparse titles can rank an exact title match below noisier
//! partial matches, so boosts are applied twice: to the ranked candidates, and
//! to a scan of the full title list that does not depend on the ranking.

use crate::normalize::fold_key;
use crate::{DocIndex, ScoredResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    /// Folded title equals the folded query.
    pub exact_boost: f32,
    /// Folded query is a substring of the folded title.
    pub partial_boost: f32,
    /// Flat similarity given to matches found by the full title scan.
    pub backstop_similarity: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { exact_boost: 100.0, partial_boost: 50.0, backstop_similarity: 1.0 }
    }
}

impl FusionWeights {
    pub fn boost(&self, folded_title: &str, query_key: &str) -> f32 {
        if folded_title == query_key {
            self.exact_boost
        } else if folded_title.contains(query_key) {
            self.partial_boost
        } else {
            0.0
        }
    }
}

/// Merge ranked similarities with title boosts, dedup by title, keep the best `limit`.
///
/// `query_key` must be the non-empty folded query; an empty key is a substring
/// of every title.
pub fn fuse<T: AsRef<str>>(
    ranked: &[(DocIndex, f32)],
    query_key: &str,
    titles: &[T],
    limit: usize,
    weights: &FusionWeights,
) -> Vec<ScoredResult> {
    let mut candidates: Vec<ScoredResult> = Vec::with_capacity(ranked.len());

    // full scan first so its entries win the dedup
    for title in titles {
        let title = title.as_ref();
        let boost = weights.boost(&fold_key(title), query_key);
        if boost > 0.0 {
            let similarity = weights.backstop_similarity;
            candidates.push(ScoredResult { title: title.to_string(), similarity, boost, score: similarity + boost });
        }
    }

    for &(doc, similarity) in ranked {
        let Some(title) = titles.get(doc) else { continue };
        let title = title.as_ref();
        let boost = weights.boost(&fold_key(title), query_key);
        candidates.push(ScoredResult { title: title.to_string(), similarity, boost, score: similarity + boost });
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut results: Vec<ScoredResult> = candidates
        .into_iter()
        .filter(|r| seen.insert(r.title.clone()))
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(limit);
    results
}
