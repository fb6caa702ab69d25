pub mod engine;
pub mod error;
pub mod fusion;
pub mod index;
pub mod normalize;
pub mod persist;
pub mod rank;
pub mod recommend;
pub mod store;
pub mod tokenizer;
pub mod vector;

use serde::{Deserialize, Serialize};

pub use engine::{Engine, SearchConfig};
pub use error::ModelLoadError;
pub use index::{FitOptions, Vocabulary, VocabularyModel, WeightMatrix};
pub use vector::SparseVector;

pub type TermId = u32;
/// Row position in the weight matrix, aligned with the corpus-order title list.
pub type DocIndex = usize;

pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Canonical display title; identity within the catalog.
    pub title: String,
    /// Key as it came from upstream, possibly without spaces.
    pub raw_key: String,
    pub synopsis: Option<String>,
    pub image_ref: Option<String>,
}

impl CatalogItem {
    pub fn from_raw(raw_key: &str, synopsis: Option<String>, image_ref: Option<String>) -> Self {
        Self { title: normalize::normalize(raw_key), raw_key: raw_key.to_string(), synopsis, image_ref }
    }

    /// Text fitted into the vector space: folded key, display title, synopsis.
    /// The folded key lets a folded title used as a query hit its own row.
    pub fn document_text(&self) -> String {
        let mut text = format!("{} {}", normalize::fold_key(&self.title), self.title);
        if let Some(synopsis) = &self.synopsis {
            text.push(' ');
            text.push_str(synopsis);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub description: String,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub title: String,
    pub similarity: f32,
    pub boost: f32,
    /// similarity + boost
    pub score: f32,
}
