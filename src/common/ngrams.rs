//! N-gram utilities shared by the oracle labeler, the trigram-blocking selection and ROUGE.

use std::collections::{HashMap, HashSet};

/// Lowercases a sequence of words and strips every character outside `[a-z0-9 ]`.
/// Words reduced to nothing disappear from the output.
///
/// # Example
///
/// ```
/// use bertsum::common::ngrams::normalize_words;
/// let words = normalize_words(&["The", "cat", "sat", "."]);
/// assert_eq!(words, vec!["the", "cat", "sat"]);
/// ```
pub fn normalize_words<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .iter()
        .flat_map(|word| normalize_text(word.as_ref()))
        .collect()
}

/// Same normalization as `normalize_words`, applied to raw text split on whitespace.
/// Characters other than ASCII letters and digits are removed in place, so `"U.S.-led"` becomes `"usled"`.
pub fn normalize_text(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Set of n-grams of a word sequence. N-grams are stored space-joined.
pub fn ngram_set<S: AsRef<str>>(n: usize, words: &[S]) -> HashSet<String> {
    if n == 0 || words.len() < n {
        return HashSet::new();
    }
    words
        .windows(n)
        .map(|window| join_ngram(window))
        .collect()
}

/// Multiset of n-grams of a word sequence, mapping each n-gram to its number of occurrences.
pub fn ngram_counts<S: AsRef<str>>(n: usize, words: &[S]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    if n == 0 || words.len() < n {
        return counts;
    }
    for window in words.windows(n) {
        *counts.entry(join_ngram(window)).or_insert(0) += 1;
    }
    counts
}

fn join_ngram<S: AsRef<str>>(window: &[S]) -> String {
    window
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}
