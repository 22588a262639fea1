//! Configuration of [`Trainer`](super::Trainer).
use crate::error::RolloutError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Source of the transitions fed to the learner in each epoch.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LearnFrom {
    /// A batch sampled from the replay buffer, once it holds at least `batch_size` items.
    #[default]
    Replay,

    /// The transitions collected in the epoch, for on-policy learners.
    Rollout,
}

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of environment instances stepped in parallel.
    pub num_processes: usize,

    /// The number of steps each instance takes per epoch.
    pub rollout_steps: usize,

    /// Budget of environment steps over all instances.
    ///
    /// The number of epochs is `num_total_steps / rollout_steps / num_processes`.
    pub num_total_steps: usize,

    /// The number of transitions in a batch sampled from the replay buffer.
    pub batch_size: usize,

    /// Capacity of the replay buffer.
    pub buffer_size: usize,

    /// Random seed.
    pub seed: u64,

    /// Where to save the learner's parameters.
    #[serde(default)]
    pub save_dir: Option<String>,

    /// Interval of saving the learner's parameters in epochs.
    pub save_interval: usize,

    /// Interval of evaluation in epochs.
    ///
    /// Not used by the training loop.
    pub eval_interval: usize,

    /// Source of learning batches.
    #[serde(default)]
    pub learn_from: LearnFrom,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_processes: 1,
            rollout_steps: 1,
            num_total_steps: 0,
            batch_size: 128,
            buffer_size: 10000,
            seed: 42,
            save_dir: None,
            save_interval: 1000,
            eval_interval: 500,
            learn_from: LearnFrom::Replay,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of environment instances.
    pub fn num_processes(mut self, v: usize) -> Self {
        self.num_processes = v;
        self
    }

    /// Sets the number of steps per instance per epoch.
    pub fn rollout_steps(mut self, v: usize) -> Self {
        self.rollout_steps = v;
        self
    }

    /// Sets the budget of environment steps.
    pub fn num_total_steps(mut self, v: usize) -> Self {
        self.num_total_steps = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the capacity of the replay buffer.
    pub fn buffer_size(mut self, v: usize) -> Self {
        self.buffer_size = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory where parameters are saved.
    pub fn save_dir(mut self, v: impl Into<String>) -> Self {
        self.save_dir = Some(v.into());
        self
    }

    /// Sets the interval of saving in epochs.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the interval of evaluation in epochs.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the source of learning batches.
    pub fn learn_from(mut self, v: LearnFrom) -> Self {
        self.learn_from = v;
        self
    }

    /// Returns the number of epochs the budget allows.
    pub fn n_epochs(&self) -> usize {
        match self.rollout_steps * self.num_processes {
            0 => 0,
            n => self.num_total_steps / n,
        }
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("num_processes", self.num_processes),
            ("rollout_steps", self.rollout_steps),
            ("batch_size", self.batch_size),
            ("buffer_size", self.buffer_size),
            ("save_interval", self.save_interval),
        ];
        for (name, v) in positive {
            if v == 0 {
                return Err(RolloutError::InvalidConfig(format!("{} must be positive", name)).into());
            }
        }

        if self.batch_size > self.buffer_size {
            return Err(RolloutError::InvalidConfig(format!(
                "batch_size ({}) exceeds buffer_size ({}), learning would never start",
                self.batch_size, self.buffer_size
            ))
            .into());
        }

        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .num_processes(16)
            .rollout_steps(5)
            .num_total_steps(1_600_000)
            .save_dir("some/directory")
            .learn_from(LearnFrom::Rollout);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_n_epochs() {
        let config = TrainerConfig::default()
            .num_processes(16)
            .rollout_steps(5)
            .num_total_steps(1_600_000);
        assert_eq!(config.n_epochs(), 20000);

        // The budget is rounded down.
        let config = config.num_total_steps(1_600_079);
        assert_eq!(config.n_epochs(), 20000);
    }

    #[test]
    fn test_validate() {
        let config = TrainerConfig::default().num_processes(2).rollout_steps(5);
        assert!(config.clone().num_total_steps(10).validate().is_ok());
        assert!(config.clone().num_total_steps(100).batch_size(0).validate().is_err());

        // A budget smaller than one epoch runs no epoch.
        assert!(config.clone().num_total_steps(9).validate().is_ok());
        assert_eq!(config.clone().num_total_steps(9).n_epochs(), 0);
    }

    #[test]
    fn test_batch_size_must_fit_in_buffer() {
        let config = TrainerConfig::default().num_total_steps(100);
        for learn_from in [LearnFrom::Replay, LearnFrom::Rollout] {
            let config = config.clone().learn_from(learn_from);
            assert!(config.clone().batch_size(128).buffer_size(100).validate().is_err());
            assert!(config.clone().batch_size(100).buffer_size(100).validate().is_ok());
        }
    }
}
