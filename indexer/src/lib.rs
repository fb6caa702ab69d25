use anyhow::Result;
use seriesrec_core::normalize::fold_key;
use seriesrec_core::persist::{save_model, IndexPaths};
use seriesrec_core::store::SledStore;
use seriesrec_core::{CatalogItem, FitOptions, VocabularyModel};
use serde::Deserialize;
use walkdir::WalkDir;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One catalog record as dumped upstream. `title` is the raw key and may have no spaces.
#[derive(Debug, Deserialize)]
struct InputDoc {
    title: String,
    #[serde(default, alias = "overview", alias = "description")]
    synopsis: Option<String>,
    #[serde(default, alias = "image", alias = "image_path")]
    image_ref: Option<String>,
}

/// Read every `.json` / `.jsonl` catalog file under `input`, normalize titles
/// and drop records whose canonical title was already seen.
pub fn read_catalog(input: &Path) -> Result<Vec<CatalogItem>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input.display());
    }

    let mut docs = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(docs.len());
    for doc in docs {
        let item = CatalogItem::from_raw(doc.title.trim(), doc.synopsis, doc.image_ref);
        let key = fold_key(&item.title);
        if key.is_empty() {
            tracing::warn!(raw = %doc.title, "skipping record with empty title");
            continue;
        }
        if !seen.insert(key) {
            tracing::warn!(title = %item.title, "skipping duplicate title");
            continue;
        }
        items.push(item);
    }
    Ok(items)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line)?);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => docs.push(serde_json::from_value(json)?),
        _ => tracing::warn!(file = %file.display(), "ignoring file that is neither an object nor an array"),
    }
    Ok(())
}

/// Fit the vector space over the catalog, persist the model artifact and,
/// when `store` is given, replace the catalog store contents.
pub fn build_index(input: &Path, output: &Path, store: Option<&Path>, options: FitOptions) -> Result<usize> {
    let items = read_catalog(input)?;
    if items.is_empty() {
        anyhow::bail!("no catalog records found in {}", input.display());
    }
    tracing::info!(items = items.len(), "ingested catalog");

    let docs: Vec<String> = items.iter().map(CatalogItem::document_text).collect();
    let titles: Vec<String> = items.iter().map(|item| item.title.clone()).collect();
    let model = VocabularyModel::fit(&docs, options);

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_model(&IndexPaths::new(output), &model, &titles, created_at)?;

    if let Some(store_path) = store {
        SledStore::open(store_path)?.replace_catalog(&items)?;
    }

    tracing::info!(output = %output.display(), "index build complete");
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seriesrec_core::persist::load_model;
    use seriesrec_core::store::CatalogStore;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_json_and_jsonl_and_dedups() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"[{"title": "BreakingBad", "overview": "Chemistry teacher."}, {"title": "TheOffice"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b.jsonl"),
            "{\"title\": \"Breaking Bad\"}\n\n{\"title\": \"BetterCallSaul\", \"image\": \"saul.jpg\"}\n",
        )
        .unwrap();
        let items = read_catalog(dir.path()).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Breaking Bad", "The Office", "Better Call Saul"]);
        assert_eq!(items[0].synopsis.as_deref(), Some("Chemistry teacher."));
        assert_eq!(items[0].raw_key, "BreakingBad");
        assert_eq!(items[2].image_ref.as_deref(), Some("saul.jpg"));
    }

    #[test]
    fn build_writes_model_and_store() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("catalog.json");
        fs::write(&input, r#"[{"title": "BreakingBad"}, {"title": "TheOffice", "description": "Paper."}]"#).unwrap();
        let out = dir.path().join("index");
        let store = dir.path().join("store");

        let n = build_index(&input, &out, Some(&store), FitOptions::default()).unwrap();
        assert_eq!(n, 2);
        let (model, titles, _) = load_model(&IndexPaths::new(&out)).unwrap();
        assert_eq!(model.num_docs(), 2);
        assert_eq!(titles, vec!["Breaking Bad", "The Office"]);

        let store = SledStore::open(&store).unwrap();
        assert_eq!(store.details("theoffice").unwrap().unwrap().description, "Paper.");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("catalog.json");
        fs::write(&input, "[]").unwrap();
        assert!(build_index(&input, &dir.path().join("index"), None, FitOptions::default()).is_err());
    }
}
