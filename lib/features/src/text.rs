//! Description tokenizer and term-weight extraction.
//!
//! Lowercases, splits on non-alphanumeric characters, drops single-character
//! tokens and stop words, then folds simple English plurals to their base
//! form. The same token stream backs both the [`TextVector`] and the match
//! explanation, so the two never disagree about what a "word" is.

use ahash::{AHashMap, AHashSet};
use lostfound_core::TextVector;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "an", "and", "any", "are", "around", "as", "at", "be", "been", "but", "by",
        "can", "could", "did", "do", "for", "from", "had", "has", "have", "he", "her", "his",
        "if", "in", "into", "is", "it", "its", "me", "mine", "my", "near", "no", "not", "of",
        "on", "or", "our", "she", "so", "some", "such", "that", "the", "their", "them", "then",
        "there", "these", "they", "this", "those", "to", "was", "we", "were", "which", "who",
        "will", "with", "you", "your",
        // report boilerplate
        "lost", "found", "item", "someone", "somewhere",
    ]
    .into_iter()
    .collect()
});

/// Tokenizer + term-frequency weighting for descriptions.
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor {
    stemming: bool,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self { stemming: true }
    }
}

impl TextExtractor {
    pub fn new(stemming: bool) -> Self {
        Self { stemming }
    }

    /// Normalized tokens in order of occurrence, duplicates kept.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() > 1 && !STOP_WORDS.contains(t))
            .map(|t| if self.stemming { stem(t) } else { t.to_string() })
            // folded plurals of boilerplate ("items") are stop words too
            .filter(|t| !STOP_WORDS.contains(t.as_str()))
            .collect()
    }

    /// Term-frequency vector, L2-normalized. Empty text gives an empty vector.
    pub fn extract(&self, text: &str) -> TextVector {
        let mut counts: AHashMap<String, u32> = AHashMap::new();
        for token in self.tokens(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        TextVector::from_counts(counts)
    }
}

/// Fold a plural to its singular. Short words and words ending in
/// `ss`, `us`, `is` are left alone.
fn stem(word: &str) -> String {
    let len = word.len();
    if len <= 3 || !word.is_ascii() {
        return word.to_string();
    }
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
    {
        return word[..len - 2].to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(stripped) = word.strip_suffix('s') {
        return stripped.to_string();
    }
    word.to_string()
}
