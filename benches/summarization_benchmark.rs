#[macro_use]
extern crate criterion;

use bertsum::evaluation::{rouge_scores, SENTENCE_SEPARATOR};
use bertsum::pipelines::selection::SentenceSelection;
use criterion::{black_box, Criterion};

fn documents() -> Vec<(Vec<String>, Vec<f64>, String)> {
    (0..100)
        .map(|document| {
            let sentences: Vec<String> = (0..40)
                .map(|sentence| {
                    format!(
                        "sentence {} of document {} repeats the words {} and {} again",
                        sentence,
                        document,
                        sentence % 7,
                        sentence % 5
                    )
                })
                .collect();
            let scores = (0..40)
                .map(|sentence| ((sentence * 37 + document) % 101) as f64 / 101.0)
                .collect();
            let reference = sentences[..3].join(SENTENCE_SEPARATOR);
            (sentences, scores, reference)
        })
        .collect()
}

fn bench_postprocessing(c: &mut Criterion) {
    let documents = documents();
    let selection = SentenceSelection::default();

    c.bench_function("Trigram blocking", |b| {
        b.iter(|| {
            for (sentences, scores, _) in documents.iter() {
                black_box(selection.select(sentences, scores));
            }
        })
    });

    let candidates: Vec<String> = documents
        .iter()
        .map(|(sentences, scores, _)| selection.summarize(sentences, scores, SENTENCE_SEPARATOR))
        .collect();
    let references: Vec<String> = documents
        .iter()
        .map(|(_, _, reference)| reference.clone())
        .collect();
    c.bench_function("ROUGE", |b| {
        b.iter(|| black_box(rouge_scores(&candidates, &references)))
    });
}

criterion_group! {
name = benches;
config = Criterion::default().sample_size(10);
targets = bench_postprocessing
}

criterion_main!(benches);
