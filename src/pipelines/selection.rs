//! # Summary assembly from sentence scores
//! Sentences are accepted by decreasing score. With trigram blocking, a candidate sharing an
//! n-gram with an already accepted sentence is skipped, which removes most of the redundancy
//! between sentences reporting the same fact.

use crate::common::ngrams::ngram_set;
use crate::Config;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// # Order of the sentences in the output summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryOrder {
    /// Sentences appear in document order
    Source,
    /// Sentences appear by decreasing score
    Score,
}

/// # Configuration for sentence selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Maximum number of sentences in the summary (default: 3)
    pub max_sentences: usize,
    /// Optional maximum number of words in the summary (default: None)
    pub max_words: Option<usize>,
    /// Skip sentences sharing an n-gram with the summary built so far (default: true)
    pub block_trigrams: bool,
    /// Size of the n-grams used for blocking (default: 3)
    pub ngram_size: usize,
    /// Order of the accepted sentences (default: source order)
    pub order: SummaryOrder,
}

impl Config for SelectionConfig {}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            max_sentences: 3,
            max_words: None,
            block_trigrams: true,
            ngram_size: 3,
            order: SummaryOrder::Source,
        }
    }
}

/// # Sentence selection with n-gram blocking
#[derive(Debug, Clone, Default)]
pub struct SentenceSelection {
    config: SelectionConfig,
}

impl SentenceSelection {
    pub fn new(config: SelectionConfig) -> SentenceSelection {
        SentenceSelection { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Selects sentence indices from per-sentence scores.
    ///
    /// # Arguments
    ///
    /// * `sentences` - document sentences, tokens separated by whitespace
    /// * `scores` - one score per sentence. Extra scores (padding) are ignored, missing scores leave the sentence out.
    ///   Sentences with a non-finite score (NaN or infinite) are never selected.
    ///
    /// # Returns
    ///
    /// * indices of the accepted sentences, ordered according to `SelectionConfig::order`
    ///
    /// # Example
    ///
    /// ```
    /// use bertsum::pipelines::selection::SentenceSelection;
    ///
    /// let sentences = [
    ///     "the cat sat on the mat",
    ///     "the cat sat on the sofa",
    ///     "it was sunny",
    /// ];
    /// let selection = SentenceSelection::default().select(&sentences, &[0.9, 0.8, 0.1]);
    /// assert_eq!(selection, vec![0, 2]);
    /// ```
    pub fn select<S: AsRef<str>>(&self, sentences: &[S], scores: &[f64]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..sentences.len().min(scores.len()))
            .filter(|&index| scores[index].is_finite())
            .collect();
        ranked.sort_by_key(|&index| (Reverse(OrderedFloat(scores[index])), index));

        let mut accepted: Vec<usize> = Vec::new();
        let mut accepted_ngrams: HashSet<String> = HashSet::new();
        let mut num_words = 0;
        for index in ranked {
            if accepted.len() >= self.config.max_sentences {
                break;
            }
            let words: Vec<&str> = sentences[index].as_ref().split_whitespace().collect();
            if let Some(max_words) = self.config.max_words {
                if num_words + words.len() > max_words {
                    break;
                }
            }
            if self.config.block_trigrams {
                let ngrams = ngram_set(self.config.ngram_size, &words);
                if !ngrams.is_disjoint(&accepted_ngrams) {
                    continue;
                }
                accepted_ngrams.extend(ngrams);
            }
            num_words += words.len();
            accepted.push(index);
        }
        if self.config.order == SummaryOrder::Source {
            accepted.sort_unstable();
        }
        accepted
    }

    /// Builds the summary text: the selected sentences joined by `separator`.
    pub fn summarize<S: AsRef<str>>(&self, sentences: &[S], scores: &[f64], separator: &str) -> String {
        self.select(sentences, scores)
            .into_iter()
            .map(|index| sentences[index].as_ref())
            .collect::<Vec<&str>>()
            .join(separator)
    }
}
