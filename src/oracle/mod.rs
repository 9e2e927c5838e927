//! # Oracle sentence selection
//!
//! Extractive summarization models are trained on per-sentence binary labels. Since reference
//! summaries are abstractive, these labels are derived by searching the set of source sentences
//! maximizing the overlap (ROUGE-1 + ROUGE-2) with the reference summary. Two search policies are
//! available:
//! - `GreedySelector`: adds the best sentence one at a time, stops when the score stops increasing
//! - `CombinationSelector`: scores every subset up to a size cap among a bounded pool of candidates
//!
//! Both implement `SentenceSelector` and share the `OverlapScorer` utility.
//!
//! ```
//! use bertsum::data::Document;
//! use bertsum::oracle::{GreedySelector, SentenceSelector};
//!
//! let document = Document::from_text(
//!     "The cat sat. It was sunny. The cat slept.",
//!     "The cat sat. The cat slept.",
//! );
//! let labels = GreedySelector::default().label(&document.source, &document.target);
//! assert_eq!(labels, vec![true, false, true]);
//! ```

mod combination;
mod greedy;
mod scorer;

pub use combination::CombinationSelector;
pub use greedy::GreedySelector;
pub use scorer::{OverlapMetric, OverlapScorer};

use crate::Config;
use serde::{Deserialize, Serialize};

/// # Sentence selection policy computing oracle labels
pub trait SentenceSelector {
    /// Selects sentence indices (sorted ascending) given a pre-computed overlap scorer.
    fn select_with_scorer(&self, scorer: &OverlapScorer) -> Vec<usize>;

    /// Metric used to build the scorer for this selector.
    fn metric(&self) -> OverlapMetric;

    /// Selects the sentence indices (sorted ascending) best approximating the reference summary.
    fn select<S: AsRef<str>>(&self, source: &[Vec<S>], reference: &[Vec<S>]) -> Vec<usize>
    where
        Self: Sized,
    {
        let scorer = OverlapScorer::new(source, reference, self.metric());
        self.select_with_scorer(&scorer)
    }

    /// Binary inclusion label for each source sentence. The output always has one entry per
    /// source sentence, an empty document yields an empty vector.
    fn label<S: AsRef<str>>(&self, source: &[Vec<S>], reference: &[Vec<S>]) -> Vec<bool>
    where
        Self: Sized,
    {
        let scorer = OverlapScorer::new(source, reference, self.metric());
        labels_from_selection(source.len(), &self.select_with_scorer(&scorer))
    }
}

/// Converts selected indices into a label vector of length `num_sentences`.
pub fn labels_from_selection(num_sentences: usize, selection: &[usize]) -> Vec<bool> {
    let mut labels = vec![false; num_sentences];
    for &index in selection {
        if let Some(label) = labels.get_mut(index) {
            *label = true;
        }
    }
    labels
}

/// # Oracle search policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OraclePolicy {
    Greedy,
    Combination,
}

/// # Configuration for oracle labeling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Search policy (default: greedy)
    pub policy: OraclePolicy,
    /// Maximum number of selected sentences (default: 3)
    pub max_selected: usize,
    /// Size of the candidate pool for the combination policy (default: 20)
    pub max_candidates: usize,
    /// Overlap metric (default: recall)
    #[serde(default)]
    pub metric: OverlapMetric,
}

impl Config for OracleConfig {}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            policy: OraclePolicy::Greedy,
            max_selected: 3,
            max_candidates: 20,
            metric: OverlapMetric::Recall,
        }
    }
}

/// # Oracle labeler
/// Labeler built from an `OracleConfig`, dispatching to the configured policy.
#[derive(Debug, Clone)]
pub enum OracleLabeler {
    Greedy(GreedySelector),
    Combination(CombinationSelector),
}

impl OracleLabeler {
    pub fn new(config: &OracleConfig) -> OracleLabeler {
        match config.policy {
            OraclePolicy::Greedy => {
                OracleLabeler::Greedy(GreedySelector::new(config.max_selected, config.metric))
            }
            OraclePolicy::Combination => OracleLabeler::Combination(CombinationSelector::new(
                config.max_selected,
                config.max_candidates,
                config.metric,
            )),
        }
    }
}

impl SentenceSelector for OracleLabeler {
    fn select_with_scorer(&self, scorer: &OverlapScorer) -> Vec<usize> {
        match self {
            OracleLabeler::Greedy(selector) => selector.select_with_scorer(scorer),
            OracleLabeler::Combination(selector) => selector.select_with_scorer(scorer),
        }
    }

    fn metric(&self) -> OverlapMetric {
        match self {
            OracleLabeler::Greedy(selector) => selector.metric(),
            OracleLabeler::Combination(selector) => selector.metric(),
        }
    }
}
