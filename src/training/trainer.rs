use crate::common::error::BertSumError;
use crate::features::{Batch, Batcher, EncodedExample};
use crate::model::ExtractiveSummarizer;
use crate::training::schedule::{LearningRateSchedule, ScheduleType};
use crate::Config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tch::nn::{OptimizerConfig, VarStore};
use tch::{nn, Device};
use tracing::info;

/// # Configuration for fine-tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of documents per mini-batch (default: 8)
    pub batch_size: usize,
    /// Number of mini-batches accumulated before an optimizer step (default: 2)
    pub accumulation_steps: usize,
    /// Number of optimizer steps (default: 50000)
    pub train_steps: usize,
    /// Peak learning rate (default: 2e-3)
    pub learning_rate: f64,
    /// Number of warmup steps (default: 10000)
    pub warmup_steps: usize,
    /// Learning rate schedule (default: Noam)
    pub schedule: ScheduleType,
    /// Maximum global gradient norm, 0 disables clipping (default: 0)
    pub max_grad_norm: f64,
    /// Log the running loss every `report_every` optimizer steps (default: 50)
    pub report_every: usize,
    /// Save a checkpoint every `save_checkpoint_steps` optimizer steps (default: 1000)
    pub save_checkpoint_steps: usize,
    /// Directory receiving the checkpoints (default: `checkpoints`)
    pub checkpoint_dir: PathBuf,
    /// Seed for the example order and the torch random generator (default: 666)
    pub seed: u64,
}

impl Config for TrainingConfig {}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            batch_size: 8,
            accumulation_steps: 2,
            train_steps: 50000,
            learning_rate: 2e-3,
            warmup_steps: 10000,
            schedule: ScheduleType::Noam,
            max_grad_norm: 0.0,
            report_every: 50,
            save_checkpoint_steps: 1000,
            checkpoint_dir: PathBuf::from("checkpoints"),
            seed: 666,
        }
    }
}

/// Summarization head configuration written next to the checkpoints
pub const MODEL_CONFIG_FILE: &str = "config.json";
/// Encoder configuration written next to the checkpoints
pub const ENCODER_CONFIG_FILE: &str = "encoder_config.json";

/// File name of the checkpoint saved after `step` optimizer steps.
pub fn checkpoint_name(step: usize) -> String {
    format!("model_step_{}.ot", step)
}

/// Loads a checkpoint into an existing variable store.
/// A missing file is reported as an `IOError`, an unreadable one as a `TchError`.
pub fn load_checkpoint<P: AsRef<Path>>(
    var_store: &mut VarStore,
    path: P,
) -> Result<(), BertSumError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(BertSumError::IOError(format!(
            "checkpoint {} not found",
            path.display()
        )));
    }
    var_store.load(path)?;
    Ok(())
}

/// Statistics accumulated between two reports
#[derive(Debug, Default, Clone, Copy)]
pub struct Statistics {
    pub loss: f64,
    pub num_documents: usize,
    pub num_sentences: usize,
}

impl Statistics {
    fn update(&mut self, loss: f64, batch: &Batch) {
        self.loss += loss;
        self.num_documents += batch.size();
        self.num_sentences += batch.num_sentences.iter().sum::<usize>();
    }

    /// Loss per document, as reported by BertSum (`xent`)
    pub fn mean_loss(&self) -> f64 {
        if self.num_documents == 0 {
            0.0
        } else {
            self.loss / self.num_documents as f64
        }
    }
}

/// # Trainer
/// Fine-tunes an `ExtractiveSummarizer` on encoded examples with Adam, gradient accumulation and
/// a warmup schedule. Checkpoints are written to `TrainingConfig::checkpoint_dir`.
pub struct Trainer {
    config: TrainingConfig,
    schedule: LearningRateSchedule,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Trainer, BertSumError> {
        if config.batch_size == 0 || config.accumulation_steps == 0 {
            return Err(BertSumError::InvalidConfigurationError(
                "batch size and accumulation steps must be positive".into(),
            ));
        }
        let schedule = LearningRateSchedule::new(
            config.schedule,
            config.learning_rate,
            config.warmup_steps,
            config.train_steps,
        );
        Ok(Trainer { config, schedule })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs `train_steps` optimizer steps, cycling over the examples.
    ///
    /// # Arguments
    ///
    /// * `model` - summarizer whose variables live in `var_store`
    /// * `var_store` - variable store holding the trainable parameters
    /// * `examples` - encoded training examples with oracle labels
    /// * `pad_id` - padding token id of the tokenizer
    ///
    /// # Returns
    ///
    /// * path of the last checkpoint written
    pub fn train(
        &self,
        model: &ExtractiveSummarizer,
        var_store: &VarStore,
        examples: &[EncodedExample],
        pad_id: i64,
    ) -> Result<PathBuf, BertSumError> {
        if examples.is_empty() {
            return Err(BertSumError::ValueError(
                "no training examples provided".into(),
            ));
        }
        fs::create_dir_all(&self.config.checkpoint_dir)?;
        model
            .config()
            .to_file(self.config.checkpoint_dir.join(MODEL_CONFIG_FILE))?;
        model
            .encoder_config()
            .to_file(self.config.checkpoint_dir.join(ENCODER_CONFIG_FILE))?;
        tch::manual_seed(self.config.seed as i64);
        let device = var_store.device();
        let mut optimizer = nn::Adam::default().build(var_store, self.config.learning_rate)?;
        let mut batcher = Batcher::new(examples, self.config.batch_size, Some(self.config.seed));

        info!(
            "Training on {} examples, {} batches per epoch, {} steps",
            examples.len(),
            batcher.num_batches(),
            self.config.train_steps
        );

        let start = Instant::now();
        let mut step = 0;
        let mut accumulated = 0;
        let mut statistics = Statistics::default();
        let mut last_checkpoint = None;
        optimizer.zero_grad();
        while step < self.config.train_steps {
            for group in batcher.epoch() {
                let batch = Batch::from_examples(&group, pad_id, device)?;
                let output = model.forward_with_loss(&batch, true)?;
                let loss = &output.loss / output.loss.numel() as f64;
                loss.backward();
                statistics.update(output.loss.double_value(&[]), &batch);
                accumulated += 1;
                if accumulated < self.config.accumulation_steps {
                    continue;
                }
                accumulated = 0;
                step += 1;

                if self.config.max_grad_norm > 0.0 {
                    optimizer.clip_grad_norm(self.config.max_grad_norm);
                }
                let learning_rate = self.schedule.learning_rate(step);
                optimizer.set_lr(learning_rate);
                optimizer.step();
                optimizer.zero_grad();

                if step % self.config.report_every.max(1) == 0 {
                    info!(
                        "Step {}/{}; xent: {:.4}; lr: {:.7}; {} docs; {:.0} sec",
                        step,
                        self.config.train_steps,
                        statistics.mean_loss(),
                        learning_rate,
                        statistics.num_documents,
                        start.elapsed().as_secs_f64()
                    );
                    statistics = Statistics::default();
                }
                if step % self.config.save_checkpoint_steps.max(1) == 0
                    || step == self.config.train_steps
                {
                    last_checkpoint = Some(self.save_checkpoint(var_store, step)?);
                }
                if step >= self.config.train_steps {
                    break;
                }
            }
        }
        match last_checkpoint {
            Some(path) => Ok(path),
            None => self.save_checkpoint(var_store, step),
        }
    }

    /// Mean loss per document on held-out examples, without dropout or gradients.
    pub fn validate(
        &self,
        model: &ExtractiveSummarizer,
        examples: &[EncodedExample],
        pad_id: i64,
        device: Device,
    ) -> Result<Statistics, BertSumError> {
        let mut statistics = Statistics::default();
        let mut batcher = Batcher::new(examples, self.config.batch_size, None);
        for group in batcher.epoch() {
            let batch = Batch::from_examples(&group, pad_id, device)?;
            let output = tch::no_grad(|| model.forward_with_loss(&batch, false))?;
            statistics.update(output.loss.double_value(&[]), &batch);
        }
        info!(
            "Validation xent: {:.4} on {} documents",
            statistics.mean_loss(),
            statistics.num_documents
        );
        Ok(statistics)
    }

    fn save_checkpoint(&self, var_store: &VarStore, step: usize) -> Result<PathBuf, BertSumError> {
        let path = self.config.checkpoint_dir.join(checkpoint_name(step));
        var_store.save(&path)?;
        info!("Saving checkpoint {}", path.display());
        Ok(path)
    }
}
