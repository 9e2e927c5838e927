use crate::oracle::scorer::{OverlapMetric, OverlapScorer};
use crate::oracle::SentenceSelector;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// # Combination oracle
/// Evaluates every subset of at most `max_selected` sentences drawn from a bounded candidate pool
/// and keeps the subset with the highest combined ROUGE-1 + ROUGE-2 score.
///
/// The pool holds the `max_candidates` sentences with the best individual score (sentences without
/// any overlap are left out), so at most `sum(C(max_candidates, k), k = 1..=max_selected)` subsets are scored.
/// Subsets are enumerated by increasing size and, for a given size, in lexicographic order of sentence
/// indices. A later subset replaces the current best only with a strictly higher score.
#[derive(Debug, Clone)]
pub struct CombinationSelector {
    pub max_selected: usize,
    pub max_candidates: usize,
    pub metric: OverlapMetric,
}

impl CombinationSelector {
    pub fn new(
        max_selected: usize,
        max_candidates: usize,
        metric: OverlapMetric,
    ) -> CombinationSelector {
        CombinationSelector {
            max_selected,
            max_candidates,
            metric,
        }
    }

    fn candidate_pool(&self, scorer: &OverlapScorer) -> Vec<usize> {
        let mut scored: Vec<(usize, f64)> = (0..scorer.num_sentences())
            .map(|index| (index, scorer.score(&[index])))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by_key(|&(index, score)| (Reverse(OrderedFloat(score)), index));
        let mut pool: Vec<usize> = scored
            .into_iter()
            .take(self.max_candidates)
            .map(|(index, _)| index)
            .collect();
        pool.sort_unstable();
        pool
    }
}

impl Default for CombinationSelector {
    fn default() -> Self {
        CombinationSelector::new(3, 20, OverlapMetric::Recall)
    }
}

impl SentenceSelector for CombinationSelector {
    fn select_with_scorer(&self, scorer: &OverlapScorer) -> Vec<usize> {
        let pool = self.candidate_pool(scorer);
        let mut best: Vec<usize> = Vec::new();
        let mut best_score = 0.0;
        for size in 1..=self.max_selected.min(pool.len()) {
            for positions in Combinations::new(pool.len(), size) {
                let subset: Vec<usize> = positions.iter().map(|&position| pool[position]).collect();
                let score = scorer.score(&subset);
                if score > best_score {
                    best_score = score;
                    best = subset;
                }
            }
        }
        best
    }

    fn metric(&self) -> OverlapMetric {
        self.metric
    }
}

/// Lexicographic enumeration of the `k`-element subsets of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Combinations {
        Combinations {
            n,
            indices: (0..k).collect(),
            first: true,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.indices.len();
        if k > self.n {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }
        let mut position = k;
        while position > 0 {
            position -= 1;
            if self.indices[position] < self.n - k + position {
                self.indices[position] += 1;
                for following in position + 1..k {
                    self.indices[following] = self.indices[following - 1] + 1;
                }
                return Some(self.indices.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combinations_are_lexicographic() {
        let subsets: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            subsets,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(Combinations::new(2, 3).count(), 0);
        assert_eq!(Combinations::new(5, 5).count(), 1);
    }
}
