use anyhow::Result;
use seriesrec_core::normalize::normalize;
use seriesrec_core::store::{CatalogStore, LikesStore, SledStore};
use seriesrec_core::{Engine, ItemDetails, NO_DESCRIPTION};
use serde::Serialize;

pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub score: f32,
    pub similarity: f32,
    pub boost: f32,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub liked: usize,
    pub results: Vec<RecommendHit>,
}

#[derive(Debug, Serialize)]
pub struct RecommendHit {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: Vec<String>,
}

fn clamp_limit(limit: usize) -> usize { limit.clamp(1, MAX_LIMIT) }

fn details_or_default(catalog: &dyn CatalogStore, title: &str) -> Result<ItemDetails> {
    Ok(catalog.details(title)?.unwrap_or_else(|| ItemDetails {
        description: NO_DESCRIPTION.to_string(),
        image_ref: None,
    }))
}

pub fn search(engine: &Engine, catalog: &dyn CatalogStore, query: &str, limit: usize) -> Result<SearchResponse> {
    if query.trim().is_empty() {
        anyhow::bail!("please enter a query to search for");
    }
    let start = std::time::Instant::now();
    let scored = engine.search(query, clamp_limit(limit));
    let mut results = Vec::with_capacity(scored.len());
    for r in scored {
        let details = details_or_default(catalog, &r.title)?;
        results.push(SearchHit {
            title: r.title,
            score: r.score,
            similarity: r.similarity,
            boost: r.boost,
            description: details.description,
            image: details.image_ref,
        });
    }
    Ok(SearchResponse {
        query: query.to_string(),
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    })
}

pub fn recommend(engine: &Engine, catalog: &dyn CatalogStore, likes: &dyn LikesStore, limit: usize) -> Result<RecommendResponse> {
    let titles = engine.recommend_from(likes, clamp_limit(limit))?;
    let mut results = Vec::with_capacity(titles.len());
    for title in titles {
        let details = details_or_default(catalog, &title)?;
        results.push(RecommendHit { title, description: details.description, image: details.image_ref });
    }
    Ok(RecommendResponse { liked: likes.list_all()?.len(), results })
}

/// Catalog spelling when the catalog knows the title, else the ingestion normalization.
fn canonical(store: &SledStore, title: &str) -> Result<String> {
    match store.canonical_title(title)? {
        Some(canonical) => Ok(canonical),
        None => {
            tracing::warn!(title, "title not in catalog");
            Ok(normalize(title))
        }
    }
}

pub fn like(store: &SledStore, title: &str) -> Result<LikeResponse> {
    if title.trim().is_empty() {
        anyhow::bail!("title must not be empty");
    }
    let title = canonical(store, title)?;
    let success = store.add(&title)?;
    Ok(LikeResponse { success, title })
}

pub fn unlike(store: &SledStore, title: &str) -> Result<LikeResponse> {
    let title = canonical(store, title)?;
    store.remove(&title)?;
    Ok(LikeResponse { success: true, title })
}

pub fn list_likes(store: &dyn LikesStore) -> Result<LikesResponse> {
    Ok(LikesResponse { likes: store.list_all()?.into_iter().collect() })
}
