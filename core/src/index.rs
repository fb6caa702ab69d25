//! Vector space index: TF-IDF vocabulary and the document-term weight matrix.
//!
//! Fitted once, offline, over the corpus-order catalog documents. Row `i` of
//! the matrix belongs to catalog title `i`; nothing at query time mutates it.

use crate::error::ModelLoadError;
use crate::tokenizer::TokenizerConfig;
use crate::vector::SparseVector;
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    pub smoothed_idf: bool,
    pub tokenizer: TokenizerConfig,
}

/// Fitted vocabulary: term -> column, and the IDF factor of every column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    pub dictionary: HashMap<String, TermId>,
    pub idf: Vec<f32>,
    pub options: FitOptions,
}

impl Vocabulary {
    pub fn num_terms(&self) -> usize { self.idf.len() }

    /// Project text into the fitted column space. Out-of-vocabulary terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut tf_raw: HashMap<TermId, u32> = HashMap::new();
        for term in self.options.tokenizer.tokenize(text) {
            if let Some(&tid) = self.dictionary.get(&term) {
                *tf_raw.entry(tid).or_insert(0) += 1;
            }
        }
        self.weigh(tf_raw)
    }

    fn weigh(&self, tf_raw: HashMap<TermId, u32>) -> SparseVector {
        let weights = tf_raw
            .into_iter()
            .map(|(tid, tf)| {
                let idf = self.idf.get(tid as usize).copied().unwrap_or(0.0);
                (tid, tf as f32 * idf)
            })
            .collect();
        SparseVector::from_weights(weights)
    }
}

/// Document rows with their norms cached for cosine scoring.
#[derive(Debug, Clone, Default)]
pub struct WeightMatrix {
    rows: Vec<SparseVector>,
    norms: Vec<f32>,
}

impl WeightMatrix {
    pub fn new(rows: Vec<SparseVector>) -> Self {
        let norms = rows.iter().map(SparseVector::norm).collect();
        Self { rows, norms }
    }

    pub fn rows(&self) -> &[SparseVector] { &self.rows }
    pub fn norms(&self) -> &[f32] { &self.norms }
    pub fn num_rows(&self) -> usize { self.rows.len() }
}

#[derive(Debug, Clone, Default)]
pub struct VocabularyModel {
    pub vocabulary: Vocabulary,
    pub matrix: WeightMatrix,
}

impl VocabularyModel {
    /// Fit TF-IDF over `corpus`, one matrix row per document in corpus order.
    /// Term weight = tf * ln(N / df).
    pub fn fit<S: AsRef<str>>(corpus: &[S], options: FitOptions) -> Self {
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut doc_counts: Vec<HashMap<TermId, u32>> = Vec::with_capacity(corpus.len());

        for doc in corpus {
            let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
            let mut seen_in_doc: HashSet<TermId> = HashSet::new();
            for term in options.tokenizer.tokenize(doc.as_ref()) {
                let next_id = dictionary.len() as TermId;
                let tid = *dictionary.entry(term).or_insert(next_id);
                if df.len() <= tid as usize { df.resize(tid as usize + 1, 0); }
                *tf_counts.entry(tid).or_insert(0) += 1;
                if seen_in_doc.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
            doc_counts.push(tf_counts);
        }

        let n = corpus.len().max(1) as f32;
        let idf = df
            .iter()
            .map(|&df_t| {
                // every fitted term occurs in at least one document
                let df_t = df_t.max(1) as f32;
                if options.smoothed_idf { (1.0 + n / df_t).ln() } else { (n / df_t).ln() }
            })
            .collect();

        let vocabulary = Vocabulary { dictionary, idf, options };
        let rows = doc_counts.into_iter().map(|c| vocabulary.weigh(c)).collect();
        tracing::info!(num_docs = corpus.len(), num_terms = vocabulary.num_terms(), "fitted vector space");
        Self { vocabulary, matrix: WeightMatrix::new(rows) }
    }

    pub fn transform(&self, text: &str) -> SparseVector {
        self.vocabulary.transform(text)
    }

    pub fn num_docs(&self) -> usize { self.matrix.num_rows() }

    /// Check that the model is usable and that its rows line up with `titles`.
    pub fn validate(&self, titles: &[String]) -> Result<(), ModelLoadError> {
        let num_terms = self.vocabulary.num_terms();
        if self.num_docs() == 0 {
            return Err(ModelLoadError::Empty);
        }
        if self.num_docs() != titles.len() {
            return Err(ModelLoadError::Dimensions(format!(
                "{} matrix rows but {} titles",
                self.num_docs(),
                titles.len()
            )));
        }
        if self.vocabulary.dictionary.len() != num_terms {
            return Err(ModelLoadError::Dimensions(format!(
                "{} dictionary terms but {} idf entries",
                self.vocabulary.dictionary.len(),
                num_terms
            )));
        }
        if let Some((term, tid)) = self.vocabulary.dictionary.iter().find(|(_, t)| **t as usize >= num_terms) {
            return Err(ModelLoadError::Dimensions(format!("term {term:?} maps to column {tid} of {num_terms}")));
        }
        for (row, vector) in self.matrix.rows().iter().enumerate() {
            if let Some(max) = vector.max_term() {
                if max as usize >= num_terms {
                    return Err(ModelLoadError::Dimensions(format!(
                        "row {row} references column {max} of {num_terms}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(v: &SparseVector, model: &VocabularyModel, term: &str) -> f32 {
        let tid = model.vocabulary.dictionary[term];
        v.entries().iter().find(|(t, _)| *t == tid).map(|(_, w)| *w).unwrap_or(0.0)
    }

    #[test]
    fn fit_builds_one_row_per_document() {
        let corpus = ["breaking bad drug", "better call saul lawyer", "the office paper"];
        let model = VocabularyModel::fit(&corpus, FitOptions::default());
        assert_eq!(model.num_docs(), 3);
        assert_eq!(model.vocabulary.num_terms(), 10);
        let expected = (3.0f32).ln();
        assert!((weight(&model.matrix.rows()[0], &model, "drug") - expected).abs() < 1e-6);
    }

    #[test]
    fn term_in_every_document_weighs_zero() {
        let corpus = ["show alpha", "show beta"];
        let model = VocabularyModel::fit(&corpus, FitOptions::default());
        assert_eq!(weight(&model.matrix.rows()[0], &model, "show"), 0.0);
        let smoothed = VocabularyModel::fit(&corpus, FitOptions { smoothed_idf: true, ..Default::default() });
        assert!(weight(&smoothed.matrix.rows()[0], &smoothed, "show") > 0.0);
    }

    #[test]
    fn transform_drops_unknown_terms_and_counts_repeats() {
        let corpus = ["alpha beta", "gamma"];
        let model = VocabularyModel::fit(&corpus, FitOptions::default());
        let q = model.transform("alpha alpha zeta");
        assert_eq!(q.len(), 1);
        assert!((weight(&q, &model, "alpha") - 2.0 * (2.0f32).ln()).abs() < 1e-6);
        assert!(model.transform("zzzznonexistentzzzz").is_empty());
    }

    #[test]
    fn validate_rejects_misaligned_titles() {
        let model = VocabularyModel::fit(&["a b", "c"], FitOptions::default());
        assert!(model.validate(&["A".into(), "C".into()]).is_ok());
        assert!(matches!(model.validate(&["A".into()]), Err(ModelLoadError::Dimensions(_))));
        let empty = VocabularyModel::fit::<&str>(&[], FitOptions::default());
        assert!(matches!(empty.validate(&[]), Err(ModelLoadError::Empty)));
    }
}
