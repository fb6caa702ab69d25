use crate::index::VocabularyModel;
use crate::normalize::fold_key;
use crate::rank::{rank_scores, similarities};
use std::collections::BTreeSet;

/// Recommend up to `limit` titles from the liked set.
///
/// Each liked title is folded and used as a pseudo-query; the per-row
/// similarities of all liked titles are averaged and rows are ranked by that
/// mean. Liked titles never come back. An empty liked set yields nothing.
pub fn recommend<I, S, T>(liked: I, model: &VocabularyModel, titles: &[T], limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let liked_keys: BTreeSet<String> = liked.into_iter().map(|t| fold_key(t.as_ref())).collect();
    if liked_keys.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut mean = vec![0.0f32; model.num_docs()];
    for key in &liked_keys {
        let sims = similarities(&model.transform(key), &model.matrix);
        for (acc, sim) in mean.iter_mut().zip(sims) {
            *acc += sim;
        }
    }
    let count = liked_keys.len() as f32;
    for acc in mean.iter_mut() {
        *acc /= count;
    }

    rank_scores(&mean, None)
        .into_iter()
        .filter_map(|(doc, _)| titles.get(doc).map(AsRef::<str>::as_ref))
        .filter(|title| !liked_keys.contains(&fold_key(title)))
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FitOptions;

    fn fixture() -> (VocabularyModel, Vec<String>) {
        let titles: Vec<String> = ["Breaking Bad", "Better Call Saul", "The Office", "Parks And Recreation"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let docs = [
            "breakingbad Breaking Bad chemistry teacher crime albuquerque",
            "bettercallsaul Better Call Saul lawyer crime albuquerque breakingbad",
            "theoffice The Office paper company comedy",
            "parksandrecreation Parks And Recreation government comedy",
        ];
        (VocabularyModel::fit(&docs, FitOptions::default()), titles)
    }

    #[test]
    fn empty_liked_set_gives_nothing() {
        let (model, titles) = fixture();
        assert!(recommend(Vec::<String>::new(), &model, &titles, 3).is_empty());
    }

    #[test]
    fn liked_titles_are_excluded_and_similar_rank_first() {
        let (model, titles) = fixture();
        let out = recommend(["breakingbad"], &model, &titles, 2);
        assert_eq!(out, vec!["Better Call Saul", "The Office"]);
    }

    #[test]
    fn liked_titles_match_after_folding() {
        let (model, titles) = fixture();
        let out = recommend(["The Office", "BREAKING BAD"], &model, &titles, 10);
        assert!(!out.iter().any(|t| t == "The Office" || t == "Breaking Bad"));
        assert_eq!(out.len(), 2);
    }
}
