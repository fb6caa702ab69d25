use crate::error::ModelLoadError;
use crate::fusion::{fuse, FusionWeights};
use crate::index::{FitOptions, VocabularyModel};
use crate::normalize::fold_key;
use crate::persist::{load_model, IndexPaths};
use crate::rank::rank;
use crate::recommend::recommend;
use crate::store::LikesStore;
use crate::{CatalogItem, ScoredResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub weights: FusionWeights,
    /// How many similarity-ranked rows go into fusion; `None` ranks the whole corpus.
    pub candidate_window: Option<usize>,
}

/// Immutable search context: fitted model plus the corpus-order title list.
/// Shared read-only across requests.
#[derive(Debug)]
pub struct Engine {
    model: VocabularyModel,
    titles: Vec<String>,
    config: SearchConfig,
}

impl Engine {
    pub fn new(model: VocabularyModel, titles: Vec<String>, config: SearchConfig) -> Result<Self, ModelLoadError> {
        model.validate(&titles)?;
        Ok(Self { model, titles, config })
    }

    pub fn load(paths: &IndexPaths, config: SearchConfig) -> Result<Self, ModelLoadError> {
        let (model, titles, _meta) = load_model(paths)?;
        Self::new(model, titles, config)
    }

    /// Fit a model in-process over catalog items.
    pub fn from_catalog(items: &[CatalogItem], options: FitOptions, config: SearchConfig) -> Result<Self, ModelLoadError> {
        let docs: Vec<String> = items.iter().map(CatalogItem::document_text).collect();
        let titles = items.iter().map(|item| item.title.clone()).collect();
        Self::new(VocabularyModel::fit(&docs, options), titles, config)
    }

    pub fn model(&self) -> &VocabularyModel { &self.model }
    pub fn titles(&self) -> &[String] { &self.titles }

    /// Ranked titles for a free-text query, at most `limit` of them.
    /// Blank queries are expected to be rejected upstream and yield no results here.
    pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredResult> {
        let query_key = fold_key(query);
        if query_key.is_empty() {
            return Vec::new();
        }
        let q_vec = self.model.transform(query);
        let ranked = rank(&q_vec, &self.model.matrix, self.config.candidate_window);
        let results = fuse(&ranked, &query_key, &self.titles, limit, &self.config.weights);
        tracing::debug!(query, terms = q_vec.len(), hits = results.len(), "search");
        results
    }

    pub fn recommend(&self, liked: &BTreeSet<String>, limit: usize) -> Vec<String> {
        let results = recommend(liked, &self.model, &self.titles, limit);
        tracing::debug!(liked = liked.len(), hits = results.len(), "recommend");
        results
    }

    /// Recommend from the current contents of a likes store.
    pub fn recommend_from(&self, store: &dyn LikesStore, limit: usize) -> Result<Vec<String>> {
        let liked = store.list_all()?;
        Ok(self.recommend(&liked, limit))
    }
}
