use crate::common::dropout::Dropout;
use crate::common::error::BertSumError;
use crate::model::attention::InterSentenceLayer;
use crate::model::config::{BertSumConfig, EncoderType};
use std::borrow::Borrow;
use tch::nn::RNN;
use tch::{nn, Kind, Tensor};

/// # Sentence scorer
/// Maps the sentence vectors of a batch of documents to inclusion probabilities.
///
/// * `sentence_vectors` - (*batch size*, *sentences*, *hidden size*), zero for padded sentences
/// * `sentence_mask` - (*batch size*, *sentences*), 1.0 for real sentences
///
/// Returns probabilities of shape (*batch size*, *sentences*), zero for padded sentences.
pub trait SentenceScorer {
    fn forward_t(
        &self,
        sentence_vectors: &Tensor,
        sentence_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor, BertSumError>;
}

/// Builds the scorer for the architecture selected in the configuration.
pub fn build_scorer<'p, P>(
    p: P,
    config: &BertSumConfig,
    hidden_size: i64,
) -> Result<Box<dyn SentenceScorer>, BertSumError>
where
    P: Borrow<nn::Path<'p>>,
{
    config.validate(hidden_size)?;
    let p = p.borrow();
    let scorer: Box<dyn SentenceScorer> = match config.encoder {
        EncoderType::Classifier | EncoderType::Baseline => {
            Box::new(LinearClassifier::new(p / "classifier", hidden_size))
        }
        EncoderType::Transformer => Box::new(InterSentenceTransformer::new(
            p / "transformer",
            config,
            hidden_size,
        )),
        EncoderType::Rnn => Box::new(RecurrentScorer::new(p / "rnn", config, hidden_size)),
    };
    Ok(scorer)
}

/// Linear projection of each sentence vector followed by a sigmoid.
#[derive(Debug)]
pub struct LinearClassifier {
    linear: nn::Linear,
}

impl LinearClassifier {
    pub fn new<'p, P>(p: P, hidden_size: i64) -> LinearClassifier
    where
        P: Borrow<nn::Path<'p>>,
    {
        let linear = nn::linear(p.borrow() / "linear", hidden_size, 1, Default::default());
        LinearClassifier { linear }
    }
}

impl SentenceScorer for LinearClassifier {
    fn forward_t(
        &self,
        sentence_vectors: &Tensor,
        sentence_mask: &Tensor,
        _train: bool,
    ) -> Result<Tensor, BertSumError> {
        Ok(sentence_vectors.apply(&self.linear).select(-1, 0).sigmoid() * sentence_mask)
    }
}

/// Stack of inter-sentence transformer layers over position-encoded sentence vectors.
#[derive(Debug)]
pub struct InterSentenceTransformer {
    position_encoding: Tensor,
    layers: Vec<InterSentenceLayer>,
    layer_norm: nn::LayerNorm,
    output: nn::Linear,
    dropout: Dropout,
}

impl InterSentenceTransformer {
    pub fn new<'p, P>(p: P, config: &BertSumConfig, hidden_size: i64) -> InterSentenceTransformer
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let position_encoding =
            sinusoidal_positions(config.max_sentences, hidden_size).to(p.device());
        let p_layers = p / "transformer_inter";
        let layers = (0..config.inter_layers)
            .map(|layer_index| {
                InterSentenceLayer::new(
                    &p_layers / layer_index,
                    hidden_size,
                    config.inter_heads,
                    config.ff_size,
                    config.dropout,
                )
            })
            .collect();
        let layer_norm_config = nn::LayerNormConfig {
            eps: 1e-6,
            ..Default::default()
        };
        InterSentenceTransformer {
            position_encoding,
            layers,
            layer_norm: nn::layer_norm(p / "layer_norm", vec![hidden_size], layer_norm_config),
            output: nn::linear(p / "wo", hidden_size, 1, Default::default()),
            dropout: Dropout::new(config.dropout),
        }
    }
}

impl SentenceScorer for InterSentenceTransformer {
    fn forward_t(
        &self,
        sentence_vectors: &Tensor,
        sentence_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor, BertSumError> {
        let num_sentences = sentence_vectors.size()[1];
        let max_sentences = self.position_encoding.size()[0];
        if num_sentences > max_sentences {
            return Err(BertSumError::ValueError(format!(
                "{} sentences exceed the {} positions of the inter-sentence encoder",
                num_sentences, max_sentences
            )));
        }
        let padding_mask = sentence_mask.eq(0.0);
        let positions = self
            .position_encoding
            .narrow(0, 0, num_sentences)
            .unsqueeze(0);
        let mut hidden_state =
            (sentence_vectors * sentence_mask.unsqueeze(-1) + positions).apply_t(&self.dropout, train);
        for (layer_index, layer) in self.layers.iter().enumerate() {
            hidden_state = layer.forward_t(layer_index, &hidden_state, &padding_mask, train);
        }
        let scores = hidden_state
            .apply(&self.layer_norm)
            .apply(&self.output)
            .select(-1, 0)
            .sigmoid();
        Ok(scores * sentence_mask)
    }
}

/// Sinusoidal position encoding table of shape (`max_positions`, `dim`).
pub fn sinusoidal_positions(max_positions: i64, dim: i64) -> Tensor {
    let mut table = vec![0f32; (max_positions * dim) as usize];
    for position in 0..max_positions {
        for index in (0..dim).step_by(2) {
            let angle = position as f64 / 10000f64.powf(index as f64 / dim as f64);
            let offset = (position * dim + index) as usize;
            table[offset] = angle.sin() as f32;
            if index + 1 < dim {
                table[offset + 1] = angle.cos() as f32;
            }
        }
    }
    Tensor::of_slice(&table)
        .view((max_positions, dim))
        .to_kind(Kind::Float)
}

/// Bidirectional LSTM over the sentence vectors with a residual connection.
pub struct RecurrentScorer {
    lstm: nn::LSTM,
    output: nn::Linear,
    dropout: Dropout,
}

impl RecurrentScorer {
    pub fn new<'p, P>(p: P, config: &BertSumConfig, hidden_size: i64) -> RecurrentScorer
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let rnn_config = nn::RNNConfig {
            bidirectional: true,
            batch_first: true,
            ..Default::default()
        };
        let lstm = nn::lstm(&(p / "lstm"), hidden_size, config.rnn_size / 2, rnn_config);
        RecurrentScorer {
            lstm,
            output: nn::linear(p / "wo", config.rnn_size, 1, Default::default()),
            dropout: Dropout::new(config.dropout),
        }
    }
}

impl SentenceScorer for RecurrentScorer {
    fn forward_t(
        &self,
        sentence_vectors: &Tensor,
        sentence_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor, BertSumError> {
        let inputs = sentence_vectors * sentence_mask.unsqueeze(-1);
        let (memory_bank, _) = self.lstm.seq(&inputs);
        let memory_bank = memory_bank.apply_t(&self.dropout, train) + &inputs;
        let scores = memory_bank.apply(&self.output).select(-1, 0).sigmoid();
        Ok(scores * sentence_mask)
    }
}
