use bertsum::common::ngrams::ngram_set;
use bertsum::pipelines::selection::{SelectionConfig, SentenceSelection, SummaryOrder};

const SENTENCES: [&str; 5] = [
    "the president met the prime minister on monday",
    "officials said the president met the prime minister",
    "the talks focused on trade",
    "protesters gathered outside the building",
    "a joint statement is expected later this week",
];

#[test]
fn trigram_blocking_skips_redundant_sentences() -> anyhow::Result<()> {
    let selection = SentenceSelection::default();
    let scores = [0.9, 0.8, 0.7, 0.6, 0.5];
    assert_eq!(selection.select(&SENTENCES, &scores), vec![0, 2, 3]);
    Ok(())
}

fn permutations(values: &[f64]) -> Vec<Vec<f64>> {
    if values.len() <= 1 {
        return vec![values.to_vec()];
    }
    let mut output = Vec::new();
    for index in 0..values.len() {
        let mut rest = values.to_vec();
        let first = rest.remove(index);
        for mut permutation in permutations(&rest) {
            permutation.insert(0, first);
            output.push(permutation);
        }
    }
    output
}

fn assert_no_shared_trigram(selected: &[usize]) {
    for (position, &first) in selected.iter().enumerate() {
        for &second in &selected[position + 1..] {
            let first_words: Vec<&str> = SENTENCES[first].split_whitespace().collect();
            let second_words: Vec<&str> = SENTENCES[second].split_whitespace().collect();
            assert!(
                ngram_set(3, &first_words).is_disjoint(&ngram_set(3, &second_words)),
                "sentences {} and {} share a trigram",
                first,
                second
            );
        }
    }
}

#[test]
fn accepted_sentences_never_share_a_trigram() -> anyhow::Result<()> {
    let selection = SentenceSelection::new(SelectionConfig {
        max_sentences: 5,
        ..Default::default()
    });
    let scores = [0.2, 0.9, 0.4, 0.1, 0.3];
    let selected = selection.select(&SENTENCES, &scores);
    assert!(selected.contains(&1));
    assert!(!selected.contains(&0));

    // every ordering of the scores, with and without ties
    for values in [[0.1, 0.2, 0.3, 0.4, 0.5], [0.5, 0.5, 0.2, 0.2, 0.9]].iter() {
        for scores in permutations(values) {
            let selected = selection.select(&SENTENCES, &scores);
            assert_no_shared_trigram(&selected);
            // 0 and 1 share "the president met", exactly one of them is kept
            assert_eq!(
                selected.iter().filter(|&&index| index < 2).count(),
                1,
                "scores {:?}",
                scores
            );
            assert_eq!(selected.len(), 4);
        }
    }
    Ok(())
}

#[test]
fn non_finite_scores_are_never_selected() -> anyhow::Result<()> {
    let sentences = ["a b c", "d e f", "g h i", "j k l"];
    let selection = SentenceSelection::default();
    assert_eq!(
        selection.select(&sentences, &[0.9, f64::NAN, 0.5, 0.4]),
        vec![0, 2, 3]
    );
    assert_eq!(
        selection.select(&sentences, &[f64::INFINITY, 0.1, f64::NEG_INFINITY, f64::NAN]),
        vec![1]
    );
    Ok(())
}

#[test]
fn without_blocking_takes_top_scores() -> anyhow::Result<()> {
    let selection = SentenceSelection::new(SelectionConfig {
        block_trigrams: false,
        ..Default::default()
    });
    let scores = [0.9, 0.8, 0.7, 0.6, 0.5];
    assert_eq!(selection.select(&SENTENCES, &scores), vec![0, 1, 2]);
    Ok(())
}

#[test]
fn score_order_and_ties() -> anyhow::Result<()> {
    let selection = SentenceSelection::new(SelectionConfig {
        order: SummaryOrder::Score,
        block_trigrams: false,
        max_sentences: 3,
        ..Default::default()
    });
    let scores = [0.1, 0.5, 0.5, 0.9, 0.2];
    assert_eq!(selection.select(&SENTENCES, &scores), vec![3, 1, 2]);
    Ok(())
}

#[test]
fn word_budget_stops_selection() -> anyhow::Result<()> {
    let selection = SentenceSelection::new(SelectionConfig {
        max_words: Some(12),
        ..Default::default()
    });
    let scores = [0.9, 0.1, 0.8, 0.7, 0.6];
    // 8 words, then 5 more would exceed the budget
    assert_eq!(selection.select(&SENTENCES, &scores), vec![0]);
    Ok(())
}

#[test]
fn padded_scores_are_ignored() -> anyhow::Result<()> {
    let selection = SentenceSelection::default();
    let sentences = ["the cat sat on the mat", "it was sunny"];
    assert_eq!(selection.select(&sentences, &[0.1, 0.2, 0.9, 0.9]), vec![0, 1]);
    assert_eq!(selection.select(&sentences, &[0.4]), vec![0]);
    assert!(selection.select(&[] as &[&str], &[0.5]).is_empty());
    Ok(())
}

#[test]
fn summary_joins_selected_sentences() -> anyhow::Result<()> {
    let selection = SentenceSelection::default();
    let scores = [0.9, 0.8, 0.7, 0.6, 0.5];
    assert_eq!(
        selection.summarize(&SENTENCES, &scores, "<q>"),
        "the president met the prime minister on monday<q>the talks focused on trade<q>protesters gathered outside the building"
    );
    Ok(())
}
