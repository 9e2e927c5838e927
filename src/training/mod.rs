//! # Fine-tuning of the extractive summarizer
//!
//! The summarizer is trained as a binary classifier over the sentences of a document, the
//! targets being the oracle labels stored in the encoded examples. Training uses Adam with a
//! Noam (or linear warmup and decay) schedule and accumulates gradients over several
//! mini-batches before each optimizer step. Progress is reported through `tracing` and the
//! variable store is saved as `model_step_<n>.ot` every `save_checkpoint_steps` steps.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use bertsum::features::read_examples;
//! use bertsum::model::{BertSumConfig, ExtractiveSummarizer};
//! use bertsum::training::{Trainer, TrainingConfig};
//! use bertsum::Config;
//! use rust_bert::bert::BertConfig;
//! use tch::{nn, Device};
//!
//! let vs = nn::VarStore::new(Device::cuda_if_available());
//! let encoder_config = BertConfig::from_file("path/to/config.json")?;
//! let model = ExtractiveSummarizer::new(&vs.root(), &BertSumConfig::default(), &encoder_config)?;
//! let examples = read_examples("path/to/train.jsonl")?;
//!
//! let trainer = Trainer::new(TrainingConfig::default())?;
//! let checkpoint = trainer.train(&model, &vs, &examples, 0)?;
//! # Ok(())
//! # }
//! ```

mod schedule;
mod trainer;

pub use schedule::{LearningRateSchedule, ScheduleType};
pub use trainer::{
    checkpoint_name, load_checkpoint, Statistics, Trainer, TrainingConfig, ENCODER_CONFIG_FILE,
    MODEL_CONFIG_FILE,
};
