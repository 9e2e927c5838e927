use crate::oracle::scorer::{OverlapMetric, OverlapScorer};
use crate::oracle::SentenceSelector;

/// # Greedy oracle
/// Adds, one at a time, the sentence bringing the largest increase of the combined ROUGE-1 + ROUGE-2
/// score, until no sentence improves the score or `max_selected` sentences have been picked.
/// Ties go to the sentence appearing first in the document.
#[derive(Debug, Clone)]
pub struct GreedySelector {
    pub max_selected: usize,
    pub metric: OverlapMetric,
}

impl GreedySelector {
    pub fn new(max_selected: usize, metric: OverlapMetric) -> GreedySelector {
        GreedySelector {
            max_selected,
            metric,
        }
    }
}

impl Default for GreedySelector {
    fn default() -> Self {
        GreedySelector::new(3, OverlapMetric::Recall)
    }
}

impl SentenceSelector for GreedySelector {
    fn select_with_scorer(&self, scorer: &OverlapScorer) -> Vec<usize> {
        let mut selected: Vec<usize> = Vec::with_capacity(self.max_selected);
        let mut max_score = 0.0;
        while selected.len() < self.max_selected {
            let mut best: Option<(usize, f64)> = None;
            for index in 0..scorer.num_sentences() {
                if selected.contains(&index) {
                    continue;
                }
                let candidate: Vec<usize> = selected
                    .iter()
                    .copied()
                    .chain(std::iter::once(index))
                    .collect();
                let score = scorer.score(&candidate);
                let current_best = best.map_or(max_score, |(_, value)| value);
                if score > current_best {
                    best = Some((index, score));
                }
            }
            match best {
                Some((index, score)) => {
                    selected.push(index);
                    max_score = score;
                }
                None => break,
            }
        }
        selected.sort_unstable();
        selected
    }

    fn metric(&self) -> OverlapMetric {
        self.metric
    }
}
