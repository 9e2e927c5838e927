//! # BertSum: fine-tuned BERT for extractive summarization (Liu, 2019)
//!
//! Implementation of the extractive summarizer described in [Fine-tune BERT for Extractive Summarization](https://arxiv.org/abs/1903.10318).
//! The document is read by a BERT encoder with a `[CLS]` token in front of every sentence; the hidden
//! states of these tokens are scored by one of several heads:
//! - Linear classifier: `EncoderType::Classifier`
//! - Inter-sentence transformer: `EncoderType::Transformer`
//! - Bidirectional LSTM: `EncoderType::Rnn`
//! - Non-pretrained small BERT with a linear classifier: `EncoderType::Baseline`
//!
//! # Model set-up and pre-trained weights loading
//!
//! The encoder weights are expected to follow the variable names of the rust-bert BERT models
//! (`bert.embeddings...`). Weights for the scoring head are randomly initialized until a
//! fine-tuned checkpoint is loaded.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use bertsum::model::{load_pretrained_encoder, BertSumConfig, ExtractiveSummarizer};
//! use bertsum::resources::{BertConfigResources, BertModelResources, RemoteResource, Resource};
//! use bertsum::Config;
//! use rust_bert::bert::BertConfig;
//! use tch::{nn, Device};
//!
//! let config_resource = Resource::Remote(RemoteResource::from_pretrained(
//!     BertConfigResources::BERT_BASE_UNCASED,
//! ));
//! let weights_resource = Resource::Remote(RemoteResource::from_pretrained(
//!     BertModelResources::BERT_BASE_UNCASED,
//! ));
//! let mut vs = nn::VarStore::new(Device::cuda_if_available());
//! let encoder_config = BertConfig::from_file(config_resource.get_local_path()?)?;
//! let summarizer = ExtractiveSummarizer::new(&vs.root(), &BertSumConfig::default(), &encoder_config)?;
//! load_pretrained_encoder(&mut vs, &weights_resource)?;
//! # Ok(())
//! # }
//! ```

mod attention;
mod config;
mod scorers;
mod summarizer;

pub use config::{BertSumConfig, EncoderType};
pub use scorers::{
    build_scorer, sinusoidal_positions, InterSentenceTransformer, LinearClassifier,
    RecurrentScorer, SentenceScorer,
};
pub use summarizer::{ExtractiveSummarizer, SummarizerOutput};

use crate::common::error::BertSumError;
use crate::resources::Resource;
use tch::nn::VarStore;
use tracing::{debug, warn};

/// Loads pretrained encoder weights into the variables of a summarizer.
/// Variables absent from the weight file (the scoring head) keep their initialization.
///
/// # Returns
///
/// * names of the variables that were not found in the weight file
pub fn load_pretrained_encoder(
    var_store: &mut VarStore,
    weights: &Resource,
) -> Result<Vec<String>, BertSumError> {
    let weights_path = weights.get_local_path()?;
    let missing = var_store.load_partial(&weights_path)?;
    let missing_encoder: Vec<&String> = missing
        .iter()
        .filter(|name| name.starts_with("bert."))
        .collect();
    if !missing_encoder.is_empty() {
        warn!(
            "{} encoder variables missing from {}: {:?}",
            missing_encoder.len(),
            weights_path.display(),
            missing_encoder
        );
    }
    debug!("{} variables left to their initial values", missing.len());
    Ok(missing)
}
