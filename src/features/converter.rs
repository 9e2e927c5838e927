use crate::common::error::BertSumError;
use crate::data::Document;
use crate::features::tokenizer::{SubwordTokenizer, CLS_TOKEN, SEP_TOKEN};
use crate::oracle::SentenceSelector;
use crate::Config;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// # Configuration for the conversion of documents into model inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Source sentences with fewer word tokens are dropped (default: 5)
    pub min_tokens_per_sentence: usize,
    /// Source sentences are truncated to this number of word tokens (default: 200)
    pub max_tokens_per_sentence: usize,
    /// Documents with fewer sentences left after filtering are dropped (default: 3)
    pub min_sentences: usize,
    /// Documents are truncated to this number of sentences (default: 100)
    pub max_sentences: usize,
    /// Maximum length of the subword sequence fed to the encoder (default: 512)
    pub max_length: usize,
}

impl Config for ConversionConfig {}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            min_tokens_per_sentence: 5,
            max_tokens_per_sentence: 200,
            min_sentences: 3,
            max_sentences: 100,
            max_length: 512,
        }
    }
}

/// # Encoded document
/// Model-ready representation of a document: every sentence is bracketed by `[CLS]` and `[SEP]`,
/// segment ids alternate between sentences and `cls_positions` points to the `[CLS]` of each sentence.
/// `labels`, `cls_positions` and `source_sentences` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub token_ids: Vec<i64>,
    pub segment_ids: Vec<i64>,
    pub cls_positions: Vec<i64>,
    pub labels: Vec<bool>,
    /// Source sentences kept after truncation, words joined by spaces
    pub source_sentences: Vec<String>,
    /// Reference summary, sentences joined by `<q>`
    pub target: String,
}

impl EncodedExample {
    pub fn num_sentences(&self) -> usize {
        self.cls_positions.len()
    }

    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}

/// # Feature converter
/// Turns labelled documents into `EncodedExample`s using a subword tokenizer.
pub struct FeatureConverter<T: SubwordTokenizer> {
    tokenizer: T,
    config: ConversionConfig,
}

impl<T: SubwordTokenizer> FeatureConverter<T> {
    /// Build a new `FeatureConverter`
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - `SubwordTokenizer` splitting sentences into subwords
    /// * `config` - `ConversionConfig` holding the length limits
    pub fn new(tokenizer: T, config: ConversionConfig) -> Result<FeatureConverter<T>, BertSumError> {
        if config.max_length < 2 {
            return Err(BertSumError::InvalidConfigurationError(format!(
                "max_length must allow at least one [CLS] [SEP] pair, got {}",
                config.max_length
            )));
        }
        Ok(FeatureConverter { tokenizer, config })
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Converts a document and its oracle labels.
    ///
    /// Returns `Ok(None)` when the document is empty, has fewer than `min_sentences` sentences
    /// after filtering, or when no sentence survives the length cap. Fails if the label vector does
    /// not have one entry per source sentence.
    pub fn convert(
        &self,
        document: &Document,
        labels: &[bool],
    ) -> Result<Option<EncodedExample>, BertSumError> {
        if labels.len() != document.source.len() {
            return Err(BertSumError::ValueError(format!(
                "expected {} labels (one per source sentence), got {}",
                document.source.len(),
                labels.len()
            )));
        }
        Ok(self.encode(document, labels, self.config.min_sentences))
    }

    /// Labels a document with an oracle selector and converts it.
    pub fn convert_with_oracle<S: SentenceSelector>(
        &self,
        document: &Document,
        selector: &S,
    ) -> Result<Option<EncodedExample>, BertSumError> {
        let labels = selector.label(&document.source, &document.target);
        self.convert(document, &labels)
    }

    /// Converts an unlabelled document for inference. All labels are false and the
    /// minimum sentence count is not enforced.
    pub fn convert_for_inference(&self, document: &Document) -> Option<EncodedExample> {
        let labels = vec![false; document.source.len()];
        self.encode(document, &labels, 1)
    }

    fn encode(
        &self,
        document: &Document,
        labels: &[bool],
        min_sentences: usize,
    ) -> Option<EncodedExample> {
        let (sentences, labels): (Vec<&[String]>, Vec<bool>) = document
            .source
            .iter()
            .zip(labels.iter())
            .filter(|(sentence, _)| sentence.len() >= self.config.min_tokens_per_sentence)
            .map(|(sentence, &label)| {
                let end = sentence.len().min(self.config.max_tokens_per_sentence);
                (&sentence[..end], label)
            })
            .take(self.config.max_sentences)
            .unzip();

        if sentences.is_empty() || sentences.len() < min_sentences {
            debug!(
                "dropping document with {} usable sentences (minimum {})",
                sentences.len(),
                min_sentences
            );
            return None;
        }

        let cls_id = self.tokenizer.token_to_id(CLS_TOKEN);
        let sep_id = self.tokenizer.token_to_id(SEP_TOKEN);
        let mut token_ids = Vec::new();
        let mut segment_ids = Vec::new();
        let mut cls_positions = Vec::with_capacity(sentences.len());
        for (index, sentence) in sentences.iter().enumerate() {
            let subwords = self.tokenizer.tokenize(&sentence.join(" "));
            let segment = (index % 2) as i64;
            cls_positions.push(token_ids.len() as i64);
            token_ids.push(cls_id);
            token_ids.extend(self.tokenizer.tokens_to_ids(&subwords));
            token_ids.push(sep_id);
            segment_ids.resize(token_ids.len(), segment);
        }

        let max_length = self.config.max_length;
        if token_ids.len() > max_length {
            token_ids.truncate(max_length - 1);
            token_ids.push(sep_id);
            segment_ids.truncate(max_length);
        }
        let surviving = cls_positions
            .iter()
            .take_while(|&&position| (position as usize) < token_ids.len() - 1)
            .count();
        if surviving == 0 {
            debug!("dropping document: no sentence fits in {} tokens", max_length);
            return None;
        }
        cls_positions.truncate(surviving);
        let mut labels = labels;
        labels.truncate(surviving);
        let source_sentences = sentences
            .iter()
            .take(surviving)
            .map(|sentence| sentence.join(" "))
            .collect();

        Some(EncodedExample {
            token_ids,
            segment_ids,
            cls_positions,
            labels,
            source_sentences,
            target: document.target_text(),
        })
    }
}
