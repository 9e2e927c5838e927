use crate::common::ngrams::{ngram_set, normalize_words};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// # Overlap metric used to score a candidate selection against the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMetric {
    /// Share of reference n-grams covered by the selection
    Recall,
    /// Harmonic mean of n-gram precision and recall
    FScore,
}

impl Default for OverlapMetric {
    fn default() -> Self {
        OverlapMetric::Recall
    }
}

/// # Overlap scorer
/// Pre-computes the unigram and bigram sets of every (normalized) source sentence and of the
/// reference, then scores sets of sentence indices with ROUGE-1 + ROUGE-2.
#[derive(Debug)]
pub struct OverlapScorer {
    metric: OverlapMetric,
    sentence_ngrams: Vec<[HashSet<String>; 2]>,
    reference_ngrams: [HashSet<String>; 2],
}

impl OverlapScorer {
    /// Builds a scorer for a document.
    ///
    /// # Arguments
    ///
    /// * `source` - source sentences as word tokens
    /// * `reference` - reference summary sentences as word tokens
    /// * `metric` - `OverlapMetric` applied to unigrams and bigrams
    pub fn new<S: AsRef<str>>(
        source: &[Vec<S>],
        reference: &[Vec<S>],
        metric: OverlapMetric,
    ) -> OverlapScorer {
        let sentence_ngrams = source
            .iter()
            .map(|sentence| {
                let words = normalize_words(sentence);
                [ngram_set(1, &words), ngram_set(2, &words)]
            })
            .collect();
        let reference_words: Vec<String> = reference
            .iter()
            .flat_map(|sentence| normalize_words(sentence))
            .collect();
        let reference_ngrams = [
            ngram_set(1, &reference_words),
            ngram_set(2, &reference_words),
        ];
        OverlapScorer {
            metric,
            sentence_ngrams,
            reference_ngrams,
        }
    }

    pub fn num_sentences(&self) -> usize {
        self.sentence_ngrams.len()
    }

    /// Combined ROUGE-1 + ROUGE-2 score of the selected sentences.
    /// Out of range indices are ignored.
    pub fn score(&self, selection: &[usize]) -> f64 {
        (0..2)
            .map(|order| {
                let candidate: HashSet<&String> = selection
                    .iter()
                    .filter_map(|&index| self.sentence_ngrams.get(index))
                    .flat_map(|ngrams| ngrams[order].iter())
                    .collect();
                self.overlap(&candidate, &self.reference_ngrams[order])
            })
            .sum()
    }

    fn overlap(&self, candidate: &HashSet<&String>, reference: &HashSet<String>) -> f64 {
        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        let matches = candidate
            .iter()
            .filter(|ngram| reference.contains(ngram.as_str()))
            .count() as f64;
        let recall = matches / reference.len() as f64;
        match self.metric {
            OverlapMetric::Recall => recall,
            OverlapMetric::FScore => {
                let precision = matches / candidate.len() as f64;
                if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                }
            }
        }
    }
}
