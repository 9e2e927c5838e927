use crate::common::error::BertSumError;
use crate::features::converter::EncodedExample;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tch::{Device, Kind, Tensor};

/// # Padded batch of encoded documents
pub struct Batch {
    /// Token ids, shape (*batch size*, *max tokens*), padded with the pad id
    pub token_ids: Tensor,
    /// Segment ids, shape (*batch size*, *max tokens*), padded with 0
    pub segment_ids: Tensor,
    /// Attention mask, 1 for real tokens, shape (*batch size*, *max tokens*)
    pub attention_mask: Tensor,
    /// Offsets of the `[CLS]` tokens, shape (*batch size*, *max sentences*), padded with 0
    pub cls_positions: Tensor,
    /// Sentence mask, 1.0 for real sentences, shape (*batch size*, *max sentences*)
    pub sentence_mask: Tensor,
    /// Oracle labels as floats, shape (*batch size*, *max sentences*), padded with 0
    pub labels: Tensor,
    /// Number of real sentences per document
    pub num_sentences: Vec<usize>,
}

impl Batch {
    /// Pads a non-empty slice of examples into tensors placed on `device`.
    pub fn from_examples(
        examples: &[&EncodedExample],
        pad_id: i64,
        device: Device,
    ) -> Result<Batch, BertSumError> {
        if examples.is_empty() {
            return Err(BertSumError::ValueError(
                "cannot build a batch from an empty list of examples".into(),
            ));
        }
        let max_tokens = examples.iter().map(|example| example.len()).max().unwrap_or(0);
        let max_sentences = examples
            .iter()
            .map(|example| example.num_sentences())
            .max()
            .unwrap_or(0);

        let pad = |values: &[i64], length: usize, value: i64| -> Tensor {
            let mut padded = values.to_vec();
            padded.resize(length, value);
            Tensor::of_slice(&padded)
        };

        let token_ids = examples
            .iter()
            .map(|example| pad(&example.token_ids, max_tokens, pad_id))
            .collect::<Vec<Tensor>>();
        let segment_ids = examples
            .iter()
            .map(|example| pad(&example.segment_ids, max_tokens, 0))
            .collect::<Vec<Tensor>>();
        let cls_positions = examples
            .iter()
            .map(|example| pad(&example.cls_positions, max_sentences, 0))
            .collect::<Vec<Tensor>>();
        let sentence_mask = examples
            .iter()
            .map(|example| pad(&vec![1; example.num_sentences()], max_sentences, 0))
            .collect::<Vec<Tensor>>();
        let labels = examples
            .iter()
            .map(|example| {
                let labels: Vec<i64> = example.labels.iter().map(|&label| label as i64).collect();
                pad(&labels, max_sentences, 0)
            })
            .collect::<Vec<Tensor>>();

        let token_ids = Tensor::stack(&token_ids, 0).to(device);
        let attention_mask = token_ids.ne(pad_id).to_kind(Kind::Int64);
        Ok(Batch {
            token_ids,
            segment_ids: Tensor::stack(&segment_ids, 0).to(device),
            attention_mask,
            cls_positions: Tensor::stack(&cls_positions, 0).to(device),
            sentence_mask: Tensor::stack(&sentence_mask, 0)
                .to_kind(Kind::Float)
                .to(device),
            labels: Tensor::stack(&labels, 0).to_kind(Kind::Float).to(device),
            num_sentences: examples
                .iter()
                .map(|example| example.num_sentences())
                .collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.num_sentences.len()
    }
}

/// # Batcher
/// Groups examples into batches of at most `batch_size` documents. When a seed is provided, the
/// order of the examples is shuffled at the start of every epoch.
pub struct Batcher<'a> {
    examples: &'a [EncodedExample],
    batch_size: usize,
    rng: Option<StdRng>,
}

impl<'a> Batcher<'a> {
    pub fn new(
        examples: &'a [EncodedExample],
        batch_size: usize,
        shuffle_seed: Option<u64>,
    ) -> Batcher<'a> {
        Batcher {
            examples,
            batch_size: batch_size.max(1),
            rng: shuffle_seed.map(StdRng::seed_from_u64),
        }
    }

    /// Example groups for one pass over the data.
    pub fn epoch(&mut self) -> Vec<Vec<&'a EncodedExample>> {
        let mut order: Vec<&'a EncodedExample> = self.examples.iter().collect();
        if let Some(rng) = self.rng.as_mut() {
            order.shuffle(rng);
        }
        order
            .chunks(self.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    pub fn num_batches(&self) -> usize {
        (self.examples.len() + self.batch_size - 1) / self.batch_size
    }
}
