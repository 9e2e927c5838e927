#![allow(dead_code)]

use bertsum::data::Document;
use bertsum::features::load_bert_tokenizer;
use rust_tokenizers::tokenizer::BertTokenizer;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

pub const VOCAB: &[&str] = &[
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "the", "cat", "sat", "on", "mat", "it", "was",
    "sunny", "dog", "ran", "home", "##s", ".", "a", "big", "day",
];

pub fn write_vocab(directory: &Path) -> anyhow::Result<std::path::PathBuf> {
    let path = directory.join("vocab.txt");
    let mut file = std::fs::File::create(&path)?;
    for token in VOCAB {
        writeln!(file, "{}", token)?;
    }
    Ok(path)
}

pub fn tokenizer() -> anyhow::Result<(TempDir, BertTokenizer)> {
    let directory = tempfile::tempdir()?;
    let vocab_path = write_vocab(directory.path())?;
    let tokenizer = load_bert_tokenizer(&vocab_path.into(), true)?;
    Ok((directory, tokenizer))
}

/// Three sentences of 7, 6 and 5 words
pub fn document() -> Document {
    Document::from_text(
        "The cat sat on the mat. It was a big day. The dog ran home.",
        "The cat sat on the mat.",
    )
}

/// Randomly initialized single-layer BERT matching the test vocabulary
pub fn tiny_bert_config() -> anyhow::Result<rust_bert::bert::BertConfig> {
    let config = serde_json::json!({
        "hidden_act": "gelu",
        "attention_probs_dropout_prob": 0.1,
        "hidden_dropout_prob": 0.1,
        "hidden_size": 16,
        "initializer_range": 0.02,
        "intermediate_size": 32,
        "max_position_embeddings": 64,
        "num_attention_heads": 2,
        "num_hidden_layers": 1,
        "type_vocab_size": 2,
        "vocab_size": VOCAB.len(),
    });
    Ok(serde_json::from_value(config)?)
}

/// Encoded versions of `document()` (3 sentences) and of a single sentence document
pub fn encoded_examples(
    tokenizer: BertTokenizer,
) -> anyhow::Result<Vec<bertsum::features::EncodedExample>> {
    use bertsum::features::{ConversionConfig, FeatureConverter};
    let converter = FeatureConverter::new(
        tokenizer,
        ConversionConfig {
            min_sentences: 1,
            ..Default::default()
        },
    )?;
    let short = Document::from_text("The dog ran home today.", "The dog ran home.");
    Ok(vec![
        converter
            .convert(&document(), &[true, false, true])?
            .ok_or_else(|| anyhow::anyhow!("document dropped"))?,
        converter
            .convert(&short, &[true])?
            .ok_or_else(|| anyhow::anyhow!("document dropped"))?,
    ])
}
