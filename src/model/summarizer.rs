use crate::common::error::BertSumError;
use crate::features::Batch;
use crate::model::config::{BertSumConfig, EncoderType};
use crate::model::scorers::{build_scorer, SentenceScorer};
use rust_bert::bert::{BertConfig, BertEmbeddings, BertModel};
use std::borrow::Borrow;
use tch::{nn, Kind, Reduction, Tensor};

/// # Extractive summarizer
/// BERT encoder reading the whole document, followed by a sentence scorer applied to the
/// hidden states of the `[CLS]` token placed in front of every sentence.
/// It is made of the following blocks:
/// - `bert`: `BertModel` (pretrained, or a small randomly initialized encoder for the baseline)
/// - `scorer`: `SentenceScorer` selected from `BertSumConfig::encoder`
pub struct ExtractiveSummarizer {
    bert: BertModel<BertEmbeddings>,
    scorer: Box<dyn SentenceScorer>,
    config: BertSumConfig,
    encoder_config: BertConfig,
}

/// Output of the summarizer when labels are available
pub struct SummarizerOutput {
    /// Sentence probabilities, shape (*batch size*, *sentences*)
    pub scores: Tensor,
    /// Sum of the binary cross entropy over real sentences
    pub loss: Tensor,
}

impl ExtractiveSummarizer {
    /// Build a new `ExtractiveSummarizer`
    ///
    /// # Arguments
    ///
    /// * `p` - Variable store path for the root of the summarizer. The encoder lives under `bert`,
    ///   matching the variable names of the pretrained BERT weights.
    /// * `config` - `BertSumConfig` selecting the scoring head
    /// * `encoder_config` - `BertConfig` of the pretrained encoder. The baseline reuses its vocabulary size only.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use bertsum::model::{BertSumConfig, EncoderType, ExtractiveSummarizer};
    /// use bertsum::Config;
    /// use rust_bert::bert::BertConfig;
    /// use tch::{nn, Device};
    ///
    /// let vs = nn::VarStore::new(Device::Cpu);
    /// let encoder_config = BertConfig::from_file("path/to/config.json")?;
    /// let config = BertSumConfig {
    ///     encoder: EncoderType::Transformer,
    ///     ..Default::default()
    /// };
    /// let summarizer = ExtractiveSummarizer::new(&vs.root(), &config, &encoder_config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<'p, P>(
        p: P,
        config: &BertSumConfig,
        encoder_config: &BertConfig,
    ) -> Result<ExtractiveSummarizer, BertSumError>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let encoder_config = match config.encoder {
            EncoderType::Baseline => config.baseline_encoder_config(encoder_config)?,
            _ => encoder_config.clone(),
        };
        let scorer = build_scorer(p / "ext_layer", config, encoder_config.hidden_size)?;
        let bert = BertModel::<BertEmbeddings>::new(p / "bert", &encoder_config);
        Ok(ExtractiveSummarizer {
            bert,
            scorer,
            config: config.clone(),
            encoder_config,
        })
    }

    pub fn encoder_type(&self) -> EncoderType {
        self.config.encoder
    }

    pub fn config(&self) -> &BertSumConfig {
        &self.config
    }

    /// Configuration of the encoder actually built (the derived one for the baseline)
    pub fn encoder_config(&self) -> &BertConfig {
        &self.encoder_config
    }

    /// Forward pass through the model
    ///
    /// # Arguments
    ///
    /// * `batch` - `Batch` of encoded documents
    /// * `train` - boolean flag to turn on/off the dropout layers in the model. Should be set to false for inference.
    ///
    /// # Returns
    ///
    /// * `scores` - `Tensor` of shape (*batch size*, *sentences*) with the inclusion probability of every sentence, zero for padding
    pub fn forward_t(&self, batch: &Batch, train: bool) -> Result<Tensor, BertSumError> {
        let encoder_output = self.bert.forward_t(
            Some(&batch.token_ids),
            Some(&batch.attention_mask),
            Some(&batch.segment_ids),
            None,
            None,
            None,
            None,
            train,
        )?;
        let hidden_state = encoder_output.hidden_state;
        let hidden_size = hidden_state.size()[2];
        let cls_size = batch.cls_positions.size();
        let index = batch
            .cls_positions
            .unsqueeze(-1)
            .expand(&[cls_size[0], cls_size[1], hidden_size], true);
        let sentence_vectors =
            hidden_state.gather(1, &index, false) * batch.sentence_mask.unsqueeze(-1);
        self.scorer
            .forward_t(&sentence_vectors, &batch.sentence_mask, train)
    }

    /// Forward pass and binary cross entropy against the oracle labels of the batch.
    pub fn forward_with_loss(
        &self,
        batch: &Batch,
        train: bool,
    ) -> Result<SummarizerOutput, BertSumError> {
        let scores = self.forward_t(batch, train)?;
        let loss = scores
            .binary_cross_entropy::<Tensor>(&batch.labels, None, Reduction::None)
            * &batch.sentence_mask;
        Ok(SummarizerOutput {
            scores,
            loss: loss.sum(Kind::Float),
        })
    }
}
