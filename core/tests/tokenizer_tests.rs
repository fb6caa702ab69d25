use seriesrec_core::tokenizer::{tokenize, TokenizerConfig};

#[test]
fn it_normalizes_unicode_and_case() {
    let words = tokenize("ＢＲＥＡＫＩＮＧ Bad");
    assert_eq!(words, vec!["breaking", "bad"]);
}

#[test]
fn it_filters_stopwords_when_enabled() {
    let cfg = TokenizerConfig { stem: false, stopwords: true };
    let words = cfg.tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"fox".to_string()));
}

#[test]
fn it_keeps_stopwords_by_default() {
    let words = tokenize("The Office");
    assert_eq!(words, vec!["the", "office"]);
}
