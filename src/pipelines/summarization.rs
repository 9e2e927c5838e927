// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Extractive summarization pipeline
//! Scores the sentences of raw articles with a fine-tuned summarizer and assembles the
//! highest scoring ones into a summary, skipping sentences redundant with the ones already picked.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use bertsum::pipelines::summarization::{ExtractiveSummarizationModel, SummarizationConfig};
//!
//! let config = SummarizationConfig::from_checkpoint_dir("path/to/checkpoints", 50000)?;
//! let model = ExtractiveSummarizationModel::new(config)?;
//!
//! let input = ["In findings published Tuesday in Cornell University's arXiv by a team of scientists \
//! from the University of Montreal and a separate report published Wednesday in Nature Astronomy by a team \
//! from University College London (UCL), the presence of water vapour was confirmed in the atmosphere of K2-18b, \
//! a planet circling a star in the constellation Leo. This is the first such discovery in a planet in its star's \
//! habitable zone. Scientists have long hoped to find such a planet."];
//! let output = model.summarize(&input)?;
//! # Ok(())
//! # }
//! ```

use crate::common::error::BertSumError;
use crate::data::Document;
use crate::features::{
    load_bert_tokenizer, Batch, Batcher, ConversionConfig, EncodedExample, FeatureConverter,
    SubwordTokenizer,
};
use crate::model::{BertSumConfig, ExtractiveSummarizer};
use crate::pipelines::selection::{SelectionConfig, SentenceSelection};
use crate::resources::{BertConfigResources, BertVocabResources, RemoteResource, Resource};
use crate::training::{checkpoint_name, load_checkpoint, ENCODER_CONFIG_FILE, MODEL_CONFIG_FILE};
use crate::Config;
use rust_bert::bert::BertConfig;
use rust_tokenizers::tokenizer::BertTokenizer;
use std::path::Path;
use tch::nn::VarStore;
use tch::{no_grad, Device};

/// # Configuration for extractive summarization
/// Contains information regarding the model to load, the conversion of documents and the
/// selection of sentences.
pub struct SummarizationConfig {
    /// Fine-tuned summarizer checkpoint (`model_step_<n>.ot`)
    pub weights_resource: Resource,
    /// Encoder configuration (default: bert-base-uncased)
    pub config_resource: Resource,
    /// Summarization head configuration. `BertSumConfig::default()` is used when absent.
    pub model_config_resource: Option<Resource>,
    /// Vocabulary resource (default: bert-base-uncased)
    pub vocab_resource: Resource,
    /// Automatically lower case all input upon tokenization (assumes a lower-cased model)
    pub lower_case: bool,
    /// Document length limits
    pub conversion_config: ConversionConfig,
    /// Sentence selection settings
    pub selection_config: SelectionConfig,
    /// String placed between the selected sentences (default: a space)
    pub separator: String,
    /// Number of documents scored together (default: 8)
    pub batch_size: usize,
    /// Device to place the model on (default: CUDA/GPU when available)
    pub device: Device,
}

impl SummarizationConfig {
    /// Configuration for a checkpoint fine-tuned from `bert-base-uncased` with the default head.
    ///
    /// # Arguments
    ///
    /// * `weights_resource` - `Resource` pointing to the fine-tuned checkpoint
    pub fn new(weights_resource: Resource) -> SummarizationConfig {
        SummarizationConfig {
            weights_resource,
            config_resource: Resource::Remote(RemoteResource::from_pretrained(
                BertConfigResources::BERT_BASE_UNCASED,
            )),
            model_config_resource: None,
            vocab_resource: Resource::Remote(RemoteResource::from_pretrained(
                BertVocabResources::BERT_BASE_UNCASED,
            )),
            lower_case: true,
            conversion_config: ConversionConfig::default(),
            selection_config: SelectionConfig::default(),
            separator: " ".to_string(),
            batch_size: 8,
            device: Device::cuda_if_available(),
        }
    }

    /// Configuration for the checkpoint saved after `step` optimizer steps in a training output
    /// directory. The head and encoder configurations saved next to the checkpoints are used.
    pub fn from_checkpoint_dir<P: AsRef<Path>>(
        checkpoint_dir: P,
        step: usize,
    ) -> Result<SummarizationConfig, BertSumError> {
        let checkpoint_dir = checkpoint_dir.as_ref();
        let weights_path = checkpoint_dir.join(checkpoint_name(step));
        if !weights_path.is_file() {
            return Err(BertSumError::IOError(format!(
                "checkpoint {} not found",
                weights_path.display()
            )));
        }
        Ok(SummarizationConfig {
            config_resource: checkpoint_dir.join(ENCODER_CONFIG_FILE).into(),
            model_config_resource: Some(checkpoint_dir.join(MODEL_CONFIG_FILE).into()),
            ..SummarizationConfig::new(weights_path.into())
        })
    }
}

/// # ExtractiveSummarizationModel to perform extractive summarization
pub struct ExtractiveSummarizationModel {
    converter: FeatureConverter<BertTokenizer>,
    model: ExtractiveSummarizer,
    selection: SentenceSelection,
    separator: String,
    batch_size: usize,
    var_store: VarStore,
}

impl ExtractiveSummarizationModel {
    /// Build a new `ExtractiveSummarizationModel`
    ///
    /// # Arguments
    ///
    /// * `config` - `SummarizationConfig` object containing the resource references (checkpoint, vocabulary, configurations) and device placement (CPU/GPU)
    pub fn new(config: SummarizationConfig) -> Result<ExtractiveSummarizationModel, BertSumError> {
        let config_path = config.config_resource.get_local_path()?;
        let weights_path = config.weights_resource.get_local_path()?;
        let model_config = match &config.model_config_resource {
            Some(resource) => BertSumConfig::from_file(resource.get_local_path()?)?,
            None => BertSumConfig::default(),
        };
        let encoder_config = BertConfig::from_file(config_path)?;

        let tokenizer = load_bert_tokenizer(&config.vocab_resource, config.lower_case)?;
        let converter = FeatureConverter::new(tokenizer, config.conversion_config)?;

        let mut var_store = VarStore::new(config.device);
        let model = ExtractiveSummarizer::new(&var_store.root(), &model_config, &encoder_config)?;
        load_checkpoint(&mut var_store, weights_path)?;

        Ok(ExtractiveSummarizationModel {
            converter,
            model,
            selection: SentenceSelection::new(config.selection_config),
            separator: config.separator,
            batch_size: config.batch_size.max(1),
            var_store,
        })
    }

    /// Sentence scores for encoded documents, one score per kept source sentence.
    pub fn predict(&self, examples: &[EncodedExample]) -> Result<Vec<Vec<f64>>, BertSumError> {
        let device = self.var_store.device();
        let pad_id = self.converter.tokenizer().pad_id();
        let mut batcher = Batcher::new(examples, self.batch_size, None);
        let mut all_scores = Vec::with_capacity(examples.len());
        for group in batcher.epoch() {
            let batch = Batch::from_examples(&group, pad_id, device)?;
            let scores = no_grad(|| self.model.forward_t(&batch, false))?;
            for (row, &num_sentences) in batch.num_sentences.iter().enumerate() {
                all_scores.push(
                    (0..num_sentences)
                        .map(|column| scores.double_value(&[row as i64, column as i64]))
                        .collect(),
                );
            }
        }
        Ok(all_scores)
    }

    /// Summaries of encoded documents, built from their kept source sentences.
    pub fn summarize_examples(
        &self,
        examples: &[EncodedExample],
        separator: &str,
    ) -> Result<Vec<String>, BertSumError> {
        let scores = self.predict(examples)?;
        Ok(examples
            .iter()
            .zip(scores.iter())
            .map(|(example, scores)| {
                self.selection
                    .summarize(&example.source_sentences, scores, separator)
            })
            .collect())
    }

    /// Summarize texts provided
    ///
    /// # Arguments
    ///
    /// * `texts` - `&[&str]` Array of texts to summarize.
    ///
    /// # Returns
    /// * `Vec<String>` Summarized texts. Articles without any usable sentence give an empty summary.
    pub fn summarize(&self, texts: &[&str]) -> Result<Vec<String>, BertSumError> {
        let (indices, examples): (Vec<usize>, Vec<EncodedExample>) = texts
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                self.converter
                    .convert_for_inference(&Document::from_text(text, ""))
                    .map(|example| (index, example))
            })
            .unzip();
        let summaries = self.summarize_examples(&examples, &self.separator)?;
        let mut output = vec![String::new(); texts.len()];
        for (index, summary) in indices.into_iter().zip(summaries) {
            output[index] = summary;
        }
        Ok(output)
    }
}
