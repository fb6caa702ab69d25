//! Title normalization.
//!
//! Catalog keys often arrive as concatenated tokens (`BreakingBad`). `normalize`
//! turns them into a display form by segmenting each alphanumeric run into the
//! most probable word sequence under a Zipf model of an embedded frequency list.
//! `fold_key` is the comparison key used for every title lookup.
//!
//! A token is only split when every letter is covered by dictionary words.
//! Anything else (`Sisters` with a missing plural, `Se7en`) is kept literally.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Frequency-ordered word list, most frequent first.
const WORDS: &str = include_str!("../data/words.txt");

struct WordModel {
    costs: HashMap<String, f64>,
    max_len: usize,
}

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{L}\p{N}']+").expect("valid regex");
    static ref MODEL: WordModel = {
        let words: Vec<&str> = WORDS
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .collect();
        let log_n = (words.len().max(2) as f64).ln();
        let mut costs = HashMap::with_capacity(words.len());
        let mut max_len = 0;
        for (rank, word) in words.iter().enumerate() {
            let word = word.to_lowercase();
            max_len = max_len.max(word.chars().count());
            // first occurrence keeps the better rank
            costs
                .entry(word)
                .or_insert_with(|| ((rank as f64 + 1.0) * log_n).ln());
        }
        WordModel { costs, max_len }
    };
}

/// Canonical display form of a catalog key.
///
/// Segments are joined with single spaces and only the first character is
/// uppercased. Never fails: a token the dictionary cannot fully cover is kept
/// as written.
pub fn normalize(raw: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for token in TOKEN_RE.find_iter(raw) {
        words.extend(segment_token(token.as_str()));
    }
    capitalize_first(&words.join(" "))
}

/// Lookup key: all whitespace removed, lowercased. Never used for display.
pub fn fold_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower(chars: &[char]) -> String {
    chars.iter().flat_map(|c| c.to_lowercase()).collect()
}

fn segment_token(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    if MODEL.costs.contains_key(&lower(&chars)) {
        return vec![token.to_string()];
    }

    // digit runs stand alone (`DoctorWho2005`), letter runs go through the word split
    let mut words: Vec<String> = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let numeric = chars[start].is_numeric();
        let end = chars[start..]
            .iter()
            .position(|c| c.is_numeric() != numeric)
            .map_or(chars.len(), |len| start + len);
        let run = &chars[start..end];
        if numeric {
            words.push(run.iter().collect());
        } else {
            match split_words(run) {
                Some(pieces) => words.extend(pieces),
                None => return vec![token.to_string()],
            }
        }
        start = end;
    }
    attach_apostrophes(words)
}

/// Cheapest cover of `chars` by dictionary words, or `None` if some character
/// cannot be covered.
fn split_words(chars: &[char]) -> Option<Vec<String>> {
    // best[i] = (cost of the cheapest cover of chars[..i], length of its last word)
    let n = chars.len();
    let mut best: Vec<Option<(f64, usize)>> = vec![None; n + 1];
    best[0] = Some((0.0, 0));
    for i in 1..=n {
        for k in 1..=MODEL.max_len.min(i) {
            let Some((prefix, _)) = best[i - k] else { continue };
            let Some(cost) = MODEL.costs.get(&lower(&chars[i - k..i])) else { continue };
            let total = prefix + cost;
            if best[i].map_or(true, |(current, _)| total < current) {
                best[i] = Some((total, k));
            }
        }
    }

    let mut words: Vec<String> = Vec::new();
    let mut i = n;
    while i > 0 {
        let (_, k) = best[i]?;
        words.push(chars[i - k..i].iter().collect());
        i -= k;
    }
    words.reverse();
    Some(words)
}

/// Clitics (`'s`, `'t`, ...) belong to the previous word (`Grey's`).
fn attach_apostrophes(words: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        match out.last_mut() {
            Some(last) if word.starts_with('\'') => last.push_str(&word),
            _ => out.push(word),
        }
    }
    out
}
