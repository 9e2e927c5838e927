use crate::common::error::BertSumError;
use crate::Config;
use rust_bert::bert::BertConfig;
use serde::{Deserialize, Serialize};

/// # Sentence scoring architecture placed on top of the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderType {
    /// Linear layer and sigmoid on top of each `[CLS]` vector
    Classifier,
    /// Inter-sentence transformer layers followed by a linear layer and sigmoid
    Transformer,
    /// Bidirectional LSTM over the sentence vectors followed by a linear layer and sigmoid
    Rnn,
    /// Small randomly initialized BERT encoder with a linear classifier, trained from scratch
    Baseline,
}

/// # BertSum model configuration
/// Defines the summarization head and, for the baseline, the size of the non-pretrained encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BertSumConfig {
    /// Scoring head (default: classifier)
    pub encoder: EncoderType,
    /// Dropout probability in the scoring head (default: 0.1)
    pub dropout: f64,
    /// Number of inter-sentence transformer layers (default: 2)
    pub inter_layers: i64,
    /// Number of attention heads in the inter-sentence transformer (default: 8)
    pub inter_heads: i64,
    /// Feed-forward size of the inter-sentence transformer and of the baseline encoder (default: 2048)
    pub ff_size: i64,
    /// Output size of the bidirectional LSTM, must equal the encoder hidden size (default: 768)
    pub rnn_size: i64,
    /// Maximum number of sentences handled by the inter-sentence position encoding (default: 512)
    pub max_sentences: i64,
    /// Hidden size of the baseline encoder (default: 128)
    pub hidden_size: i64,
    /// Number of layers of the baseline encoder (default: 6)
    pub baseline_layers: i64,
    /// Number of attention heads of the baseline encoder (default: 8)
    pub baseline_heads: i64,
}

impl Config for BertSumConfig {}

impl Default for BertSumConfig {
    fn default() -> Self {
        BertSumConfig {
            encoder: EncoderType::Classifier,
            dropout: 0.1,
            inter_layers: 2,
            inter_heads: 8,
            ff_size: 2048,
            rnn_size: 768,
            max_sentences: 512,
            hidden_size: 128,
            baseline_layers: 6,
            baseline_heads: 8,
        }
    }
}

impl BertSumConfig {
    /// Encoder configuration for the `Baseline` architecture: a BERT encoder of `baseline_layers`
    /// layers of size `hidden_size` sharing the vocabulary of `pretrained`.
    pub fn baseline_encoder_config(
        &self,
        pretrained: &BertConfig,
    ) -> Result<BertConfig, BertSumError> {
        let config = serde_json::json!({
            "hidden_act": "gelu",
            "attention_probs_dropout_prob": self.dropout,
            "hidden_dropout_prob": self.dropout,
            "hidden_size": self.hidden_size,
            "initializer_range": 0.02,
            "intermediate_size": self.ff_size,
            "max_position_embeddings": pretrained.max_position_embeddings,
            "num_attention_heads": self.baseline_heads,
            "num_hidden_layers": self.baseline_layers,
            "type_vocab_size": pretrained.type_vocab_size,
            "vocab_size": pretrained.vocab_size,
        });
        Ok(serde_json::from_value(config)?)
    }

    /// Checks the head dimensions against the encoder hidden size.
    pub fn validate(&self, encoder_hidden_size: i64) -> Result<(), BertSumError> {
        let positive = [
            ("inter_heads", self.inter_heads),
            ("baseline_heads", self.baseline_heads),
            ("max_sentences", self.max_sentences),
            ("ff_size", self.ff_size),
            ("rnn_size", self.rnn_size),
            ("hidden_size", self.hidden_size),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| *value <= 0) {
            return Err(BertSumError::InvalidConfigurationError(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if self.inter_layers < 0 || self.baseline_layers < 0 {
            return Err(BertSumError::InvalidConfigurationError(format!(
                "layer counts must not be negative, got {} inter-sentence and {} baseline layers",
                self.inter_layers, self.baseline_layers
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(BertSumError::InvalidConfigurationError(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        match self.encoder {
            EncoderType::Transformer if encoder_hidden_size % self.inter_heads != 0 => {
                Err(BertSumError::InvalidConfigurationError(format!(
                    "hidden size {} is not a multiple of the number of inter-sentence heads {}",
                    encoder_hidden_size, self.inter_heads
                )))
            }
            EncoderType::Rnn if self.rnn_size != encoder_hidden_size || self.rnn_size % 2 != 0 => {
                Err(BertSumError::InvalidConfigurationError(format!(
                    "rnn size {} must be even and equal to the encoder hidden size {}",
                    self.rnn_size, encoder_hidden_size
                )))
            }
            EncoderType::Baseline if self.hidden_size % self.baseline_heads != 0 => {
                Err(BertSumError::InvalidConfigurationError(format!(
                    "baseline hidden size {} is not a multiple of the number of heads {}",
                    self.hidden_size, self.baseline_heads
                )))
            }
            _ => Ok(()),
        }
    }
}
