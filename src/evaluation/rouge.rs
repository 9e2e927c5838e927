use crate::common::error::BertSumError;
use crate::common::ngrams::{ngram_counts, normalize_text};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentence separator used in candidate and gold summaries
pub const SENTENCE_SEPARATOR: &str = "<q>";

/// Precision, recall and F1 of one ROUGE variant
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl RougeScore {
    fn from_counts(overlap: usize, candidate_count: usize, reference_count: usize) -> RougeScore {
        let precision = if candidate_count > 0 {
            overlap as f64 / candidate_count as f64
        } else {
            0.0
        };
        let recall = if reference_count > 0 {
            overlap as f64 / reference_count as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        RougeScore {
            precision,
            recall,
            f1,
        }
    }

    fn accumulate(&mut self, other: &RougeScore) {
        self.precision += other.precision;
        self.recall += other.recall;
        self.f1 += other.f1;
    }

    fn scale(&mut self, factor: f64) {
        self.precision *= factor;
        self.recall *= factor;
        self.f1 *= factor;
    }
}

/// ROUGE-1, ROUGE-2 and ROUGE-L scores
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge_1: RougeScore,
    pub rouge_2: RougeScore,
    pub rouge_l: RougeScore,
}

impl fmt::Display for RougeScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, score) in [
            ("ROUGE-1", &self.rouge_1),
            ("ROUGE-2", &self.rouge_2),
            ("ROUGE-L", &self.rouge_l),
        ]
        .iter()
        {
            writeln!(
                f,
                "{}: P: {:.2} R: {:.2} F1: {:.2}",
                name,
                score.precision * 100.0,
                score.recall * 100.0,
                score.f1 * 100.0
            )?;
        }
        Ok(())
    }
}

fn tokens(summary: &str) -> Vec<String> {
    normalize_text(&summary.replace(SENTENCE_SEPARATOR, " "))
}

/// ROUGE-N with clipped n-gram counts.
pub fn rouge_n<S: AsRef<str>>(candidate: &[S], reference: &[S], n: usize) -> RougeScore {
    let candidate_counts = ngram_counts(n, candidate);
    let reference_counts = ngram_counts(n, reference);
    let overlap = candidate_counts
        .iter()
        .map(|(ngram, &count)| count.min(reference_counts.get(ngram).copied().unwrap_or(0)))
        .sum();
    RougeScore::from_counts(
        overlap,
        candidate_counts.values().sum(),
        reference_counts.values().sum(),
    )
}

fn lcs_length<S: AsRef<str>>(first: &[S], second: &[S]) -> usize {
    let mut previous = vec![0usize; second.len() + 1];
    let mut current = vec![0usize; second.len() + 1];
    for a in first {
        for (j, b) in second.iter().enumerate() {
            current[j + 1] = if a.as_ref() == b.as_ref() {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[second.len()]
}

/// ROUGE-L from the longest common subsequence of the two token sequences.
pub fn rouge_l<S: AsRef<str>>(candidate: &[S], reference: &[S]) -> RougeScore {
    RougeScore::from_counts(
        lcs_length(candidate, reference),
        candidate.len(),
        reference.len(),
    )
}

/// ROUGE scores of a single candidate summary against its reference. Sentences may be separated by `<q>`.
///
/// # Example
///
/// ```
/// use bertsum::evaluation::score_summary;
///
/// let scores = score_summary("the cat sat on the mat", "the cat sat on the mat");
/// assert_eq!(scores.rouge_1.f1, 1.0);
/// assert_eq!(scores.rouge_l.recall, 1.0);
/// ```
pub fn score_summary(candidate: &str, reference: &str) -> RougeScores {
    let candidate = tokens(candidate);
    let reference = tokens(reference);
    RougeScores {
        rouge_1: rouge_n(&candidate, &reference, 1),
        rouge_2: rouge_n(&candidate, &reference, 2),
        rouge_l: rouge_l(&candidate, &reference),
    }
}

/// ROUGE scores averaged over documents.
///
/// # Arguments
///
/// * `candidates` - predicted summaries
/// * `references` - gold summaries, aligned with `candidates`
///
/// # Returns
///
/// * `RougeScores` averaged over the documents, all zero for empty inputs. Fails with
///   `LengthMismatch` when the two lists differ in length.
pub fn rouge_scores<S: AsRef<str>>(
    candidates: &[S],
    references: &[S],
) -> Result<RougeScores, BertSumError> {
    if candidates.len() != references.len() {
        return Err(BertSumError::LengthMismatch {
            candidates: candidates.len(),
            references: references.len(),
        });
    }
    let mut total = RougeScores::default();
    for (candidate, reference) in candidates.iter().zip(references.iter()) {
        let scores = score_summary(candidate.as_ref(), reference.as_ref());
        total.rouge_1.accumulate(&scores.rouge_1);
        total.rouge_2.accumulate(&scores.rouge_2);
        total.rouge_l.accumulate(&scores.rouge_l);
    }
    if !candidates.is_empty() {
        let factor = 1.0 / candidates.len() as f64;
        total.rouge_1.scale(factor);
        total.rouge_2.scale(factor);
        total.rouge_l.scale(factor);
    }
    Ok(total)
}
