//! # Extractive summarization with BERT encoders
//!
//! Rust implementation of BertSum-style extractive summarization on top of the BERT models of
//! [rust-bert](https://crates.io/crates/rust-bert) and the [tch-rs](https://github.com/LaurentMazare/tch-rs)
//! bindings to libtorch. The crate covers the full workflow:
//! - oracle labeling of article sentences against reference summaries (`oracle`)
//! - conversion of labelled documents into encoder inputs (`features`)
//! - a BERT encoder with a sentence scoring head (`model`)
//! - fine-tuning with a warmup schedule and gradient accumulation (`training`)
//! - summary assembly with trigram blocking and an end-to-end pipeline (`pipelines`)
//! - ROUGE-1, ROUGE-2 and ROUGE-L evaluation (`evaluation`)
//!
//! Line-aligned corpora such as CNN / Daily Mail are read (and downloaded when remote) by the `data` module.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use bertsum::data::{DatasetResources, Split, SummarizationDataset};
//! use bertsum::features::{load_bert_tokenizer, ConversionConfig, FeatureConverter};
//! use bertsum::oracle::GreedySelector;
//! use bertsum::resources::{BertVocabResources, RemoteResource, Resource};
//!
//! let dataset = SummarizationDataset::new(&Resource::Remote(RemoteResource::archive(
//!     DatasetResources::CNN_DM,
//! )))?;
//! let vocab = Resource::Remote(RemoteResource::from_pretrained(
//!     BertVocabResources::BERT_BASE_UNCASED,
//! ));
//! let converter = FeatureConverter::new(load_bert_tokenizer(&vocab, true)?, ConversionConfig::default())?;
//! let oracle = GreedySelector::default();
//!
//! let mut examples = Vec::new();
//! for document in dataset.load(Split::Validation, Some(100))? {
//!     if let Some(example) = converter.convert_with_oracle(&document, &oracle)? {
//!         examples.push(example);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Loading pretrained models
//!
//! Pretrained encoder weights are expected in the `.ot` format produced by rust-bert's
//! conversion utilities. Remote resources are cached under `~/.cache/.bertsum` (or the directory
//! set in the `BERTSUM_CACHE` environment variable).

pub mod common;
pub mod data;
pub mod evaluation;
pub mod features;
pub mod model;
pub mod oracle;
pub mod pipelines;
pub mod training;

pub use common::error::BertSumError;
pub use common::{resources, Config};
