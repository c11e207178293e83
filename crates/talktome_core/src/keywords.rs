//! Tokenizer and keyword matching.
//!
//! Two primitives back every analysis in the workspace:
//! - [`tokenize`] / [`extract_keywords`]: significant words (lowercase ASCII
//!   letters, longer than three characters, not a stop word). The analysis
//!   keyword ranking uses [`analysis_tokens`], which also drops filler words.
//! - [`matches_any`] / [`count_matches`]: case-insensitive substring search
//!   against a keyword or phrase list
//!
//! Substring matching can fire inside unrelated words ("mad" in "made").
//! That is accepted: lexicon entries are short and may be phrases.

use std::collections::BTreeSet;

/// Function words and filler terms never treated as significant.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "i", "me", "my", "we", "our", "you",
    "your", "he", "she", "it", "they", "this", "that", "these", "those", "and", "but", "or", "so",
    "because", "if", "when", "where", "what", "which", "who", "how", "to", "from", "in", "on",
    "at", "for", "with", "about", "of", "by", "as", "not", "just", "like", "really", "very",
    "can", "get", "got", "feel", "feeling", "think", "know",
];

/// Conversational filler ignored when ranking frequent keywords. Entries that
/// share only one of these still link in the thought map.
pub const FILLER_WORDS: &[&str] = &[
    "want", "need", "going", "dont", "im", "its", "ive", "cant", "thats",
];

/// Tokens this short or shorter are never significant.
pub const MIN_SIGNIFICANT_LEN: usize = 3;

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Significant tokens of `text` in order of appearance, repeats included.
///
/// The text is lowercased, every character that is neither an ASCII letter
/// nor whitespace is dropped ("don't" becomes "dont"), and the rest is split
/// on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    significant_words(text, &[])
}

/// [`tokenize`] without [`FILLER_WORDS`].
pub fn analysis_tokens(text: &str) -> Vec<String> {
    significant_words(text, FILLER_WORDS)
}

fn significant_words(text: &str, extra_stop_words: &[&str]) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.len() > MIN_SIGNIFICANT_LEN && !is_stop_word(word))
        .filter(|word| !extra_stop_words.contains(word))
        .map(str::to_string)
        .collect()
}

/// Deduplicated significant tokens of `text`.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// True if any keyword or phrase occurs in `text`, ignoring case.
pub fn matches_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| lower.contains(&kw.as_ref().to_lowercase()))
}

/// Number of distinct keywords from the list that occur in `text`, ignoring case.
pub fn count_matches<S: AsRef<str>>(text: &str, keywords: &[S]) -> usize {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| lower.contains(&kw.as_ref().to_lowercase()))
        .count()
}
