//! # Model inputs
//!
//! Documents are turned into encoder inputs the BertSum way: every sentence is bracketed by
//! `[CLS]` and `[SEP]`, sentences alternate between segment ids 0 and 1, and the offset of each
//! `[CLS]` token is recorded to read the sentence representation out of the encoder output.
//! Length limits (tokens per sentence, sentences per document, total subword length) are set by
//! a `ConversionConfig`. Encoded examples serialize to JSON lines so that prepared corpora can be
//! stored and reloaded.

mod batch;
mod converter;
mod tokenizer;

pub use batch::{Batch, Batcher};
pub use converter::{ConversionConfig, EncodedExample, FeatureConverter};
pub use tokenizer::{load_bert_tokenizer, SubwordTokenizer, CLS_TOKEN, PAD_TOKEN, SEP_TOKEN};

use crate::common::error::BertSumError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Writes encoded examples as JSON lines.
pub fn write_examples<P: AsRef<Path>>(
    path: P,
    examples: &[EncodedExample],
) -> Result<(), BertSumError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for example in examples {
        serde_json::to_writer(&mut writer, example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads encoded examples written by `write_examples`. Blank lines are skipped.
pub fn read_examples<P: AsRef<Path>>(path: P) -> Result<Vec<EncodedExample>, BertSumError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        BertSumError::IOError(format!("could not open {}: {}", path.display(), e))
    })?;
    let mut examples = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        examples.push(serde_json::from_str(&line)?);
    }
    Ok(examples)
}
