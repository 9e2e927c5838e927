//! Rule-based sentence splitting and word tokenization for raw news text.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    static ref ABBREVIATIONS: HashSet<&'static str> = [
        "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "gen.", "gov.", "sen.",
        "rep.", "col.", "lt.", "sgt.", "capt.", "vs.", "etc.", "inc.", "ltd.", "co.", "corp.",
        "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.",
        "dec.", "no.", "vol.", "fig.", "e.g.", "i.e.", "a.m.", "p.m.", "u.s.", "u.k.", "u.n.",
    ]
    .iter()
    .cloned()
    .collect();
}

const LEADING_PUNCTUATION: &[char] = &['"', '\'', '(', '[', '{', '`'];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', ')', ']', '}'];
const TERMINATORS: &[&str] = &[".", "!", "?", "...", "<q>"];
const CLOSING: &[&str] = &["\"", "'", ")", "]", "}", "''"];

/// Splits raw text into word tokens, detaching leading and trailing punctuation.
/// Known abbreviations (`Mr.`, `U.S.`) and dotted initialisms keep their final period.
///
/// # Example
///
/// ```
/// use bertsum::data::tokenize_words;
/// let words = tokenize_words("Mr. Smith (the mayor) said: \"Yes.\"");
/// assert_eq!(
///     words,
///     vec!["Mr.", "Smith", "(", "the", "mayor", ")", "said", ":", "\"", "Yes", ".", "\""]
/// );
/// ```
pub fn tokenize_words(text: &str) -> Vec<String> {
    let text = text.replace("<q>", " <q> ");
    let mut words = Vec::new();
    for raw in text.split_whitespace() {
        if raw == "<q>" {
            words.push(raw.to_string());
            continue;
        }
        let mut word = raw;
        while let Some(first) = word.chars().next() {
            if word.len() > 1 && LEADING_PUNCTUATION.contains(&first) {
                words.push(first.to_string());
                word = &word[first.len_utf8()..];
            } else {
                break;
            }
        }
        let mut trailing = Vec::new();
        while let Some(last) = word.chars().last() {
            if word.len() <= 1 || !TRAILING_PUNCTUATION.contains(&last) || keeps_period(word) {
                break;
            }
            if word.ends_with("...") {
                trailing.push("...".to_string());
                word = &word[..word.len() - 3];
                continue;
            }
            trailing.push(last.to_string());
            word = &word[..word.len() - last.len_utf8()];
        }
        if !word.is_empty() {
            words.push(word.to_string());
        }
        words.extend(trailing.into_iter().rev());
    }
    words
}

fn keeps_period(word: &str) -> bool {
    if !word.ends_with('.') {
        return false;
    }
    let lowered = word.to_lowercase();
    if ABBREVIATIONS.contains(lowered.as_str()) {
        return true;
    }
    // initialisms such as `J.` or `N.A.S.A.`
    let letters: Vec<&str> = word[..word.len() - 1].split('.').collect();
    letters
        .iter()
        .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
}

/// Splits raw text into sentences of word tokens. A sentence ends after a terminal punctuation
/// token, closing quotes or brackets that directly follow it stay in the same sentence.
/// The `<q>` marker used by preprocessed summaries is treated as an explicit boundary and dropped.
///
/// # Example
///
/// ```
/// use bertsum::data::split_sentences;
/// let sentences = split_sentences("The cat sat. It was sunny! Was it?");
/// assert_eq!(sentences.len(), 3);
/// assert_eq!(sentences[1], vec!["It", "was", "sunny", "!"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<Vec<String>> {
    let mut sentences = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut closing = false;
    for word in tokenize_words(text) {
        if closing {
            if CLOSING.contains(&word.as_str()) {
                current.push(word);
                continue;
            }
            sentences.push(std::mem::take(&mut current));
            closing = false;
        }
        if word == "<q>" {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }
        let terminal = TERMINATORS.contains(&word.as_str());
        current.push(word);
        if terminal {
            closing = true;
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}
