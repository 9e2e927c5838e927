//! # Raw corpora
//!
//! Line-aligned article/summary corpora (such as CNN / Daily Mail) are read into `Document`s:
//! articles and reference summaries split into sentences of word tokens by a rule-based
//! splitter. Remote archives are downloaded and extracted through the resource cache.

mod dataset;
mod sentences;

pub use dataset::{DatasetResources, Document, DocumentReader, Split, SummarizationDataset};
pub use sentences::{split_sentences, tokenize_words};
