use seriesrec_core::persist::{save_model, IndexPaths};
use seriesrec_core::store::{LikesStore, MemoryLikesStore, SledStore};
use seriesrec_core::{CatalogItem, Engine, FitOptions, SearchConfig, VocabularyModel};
use tempfile::tempdir;

fn build_tiny_index(dir: &std::path::Path) -> SledStore {
    let items = vec![
        CatalogItem::from_raw("BreakingBad", Some("A chemistry teacher cooks meth.".into()), Some("breakingbad.jpg".into())),
        CatalogItem::from_raw("BetterCallSaul", Some("A lawyer in Albuquerque.".into()), None),
        CatalogItem::from_raw("TheOffice", None, None),
    ];
    let docs: Vec<String> = items.iter().map(CatalogItem::document_text).collect();
    let titles: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
    let model = VocabularyModel::fit(&docs, FitOptions::default());
    save_model(&IndexPaths::new(dir), &model, &titles, "2024-01-01T00:00:00Z".into()).unwrap();

    let store = SledStore::temporary().unwrap();
    store.replace_catalog(&items).unwrap();
    store
}

#[test]
fn search_returns_enriched_ranked_results() {
    let dir = tempdir().unwrap();
    let store = build_tiny_index(dir.path());
    let engine = Engine::load(&IndexPaths::new(dir.path()), SearchConfig::default()).unwrap();

    let resp = seriesrec_cli::search(&engine, &store, "breakingbad", 2).unwrap();
    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.results[0].title, "Breaking Bad");
    assert_eq!(resp.results[0].boost, 100.0);
    assert_eq!(resp.results[0].image.as_deref(), Some("breakingbad.jpg"));

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["results"][0]["description"], "A chemistry teacher cooks meth.");
}

#[test]
fn blank_query_is_rejected() {
    let dir = tempdir().unwrap();
    let store = build_tiny_index(dir.path());
    let engine = Engine::load(&IndexPaths::new(dir.path()), SearchConfig::default()).unwrap();
    assert!(seriesrec_cli::search(&engine, &store, "  ", 5).is_err());
}

#[test]
fn like_then_recommend_excludes_liked() {
    let dir = tempdir().unwrap();
    let store = build_tiny_index(dir.path());
    let engine = Engine::load(&IndexPaths::new(dir.path()), SearchConfig::default()).unwrap();

    let first = seriesrec_cli::like(&store, "breaking bad").unwrap();
    assert!(first.success);
    assert_eq!(first.title, "Breaking Bad");
    assert!(!seriesrec_cli::like(&store, "BreakingBad").unwrap().success);

    let resp = seriesrec_cli::recommend(&engine, &store, &store, 5).unwrap();
    assert_eq!(resp.liked, 1);
    let titles: Vec<&str> = resp.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Better Call Saul", "The Office"]);
    assert_eq!(resp.results[1].description, "No description available.");

    seriesrec_cli::unlike(&store, "Breaking Bad").unwrap();
    assert!(seriesrec_cli::list_likes(&store).unwrap().likes.is_empty());
    assert!(seriesrec_cli::recommend(&engine, &store, &store, 5).unwrap().results.is_empty());
}

#[test]
fn recommend_reads_likes_from_any_store() {
    let dir = tempdir().unwrap();
    let catalog = build_tiny_index(dir.path());
    let engine = Engine::load(&IndexPaths::new(dir.path()), SearchConfig::default()).unwrap();

    let likes = MemoryLikesStore::new();
    likes.add("The Office").unwrap();
    let resp = seriesrec_cli::recommend(&engine, &catalog, &likes, 5).unwrap();
    assert_eq!(resp.liked, 1);
    assert_eq!(resp.results.len(), 2);
    assert!(resp.results.iter().all(|r| r.title != "The Office"));
}
