use serde::{Deserialize, Serialize};

/// # Learning rate schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// `lr * min(step^-0.5, step * warmup^-1.5)`
    Noam,
    /// Linear increase to `lr` over the warmup steps, then linear decrease to 0 at the last step
    LinearWarmupDecay,
}

/// Learning rate as a function of the optimizer step (starting at 1).
#[derive(Debug, Clone, Copy)]
pub struct LearningRateSchedule {
    schedule_type: ScheduleType,
    learning_rate: f64,
    warmup_steps: usize,
    total_steps: usize,
}

impl LearningRateSchedule {
    pub fn new(
        schedule_type: ScheduleType,
        learning_rate: f64,
        warmup_steps: usize,
        total_steps: usize,
    ) -> LearningRateSchedule {
        LearningRateSchedule {
            schedule_type,
            learning_rate,
            warmup_steps,
            total_steps,
        }
    }

    /// # Example
    ///
    /// ```
    /// use bertsum::training::{LearningRateSchedule, ScheduleType};
    ///
    /// let schedule = LearningRateSchedule::new(ScheduleType::LinearWarmupDecay, 1e-3, 10, 110);
    /// assert!((schedule.learning_rate(5) - 5e-4).abs() < 1e-12);
    /// assert!((schedule.learning_rate(60) - 5e-4).abs() < 1e-12);
    /// assert_eq!(schedule.learning_rate(110), 0.0);
    /// ```
    pub fn learning_rate(&self, step: usize) -> f64 {
        let step = step.max(1) as f64;
        match self.schedule_type {
            ScheduleType::Noam => {
                let warmup = self.warmup_steps.max(1) as f64;
                self.learning_rate * step.powf(-0.5).min(step * warmup.powf(-1.5))
            }
            ScheduleType::LinearWarmupDecay => {
                let warmup = self.warmup_steps as f64;
                let total = self.total_steps as f64;
                if step < warmup {
                    self.learning_rate * step / warmup
                } else if total > warmup {
                    self.learning_rate * ((total - step) / (total - warmup)).max(0.0)
                } else {
                    self.learning_rate
                }
            }
        }
    }
}
