//! Configuration of A2C learner.
use crate::{opt::OptimizerConfig, Device};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`A2c`](super::A2c).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct A2cConfig {
    /// Units of the hidden layers of the policy and the value function.
    pub hidden_units: Vec<usize>,

    /// Optimizer of all parameters.
    pub opt_config: OptimizerConfig,

    /// Discount factor.
    pub gamma: f64,

    /// Decay of the generalized advantage estimate.
    ///
    /// `1.0` uses the discounted return up to the end of the segment, `0.0`
    /// the one-step TD error.
    #[serde(default = "default_lmbda")]
    pub lmbda: f64,

    /// Coefficient of the value loss.
    pub alpha: f64,

    /// Coefficient of the entropy bonus.
    pub beta: f64,

    /// Seed of action sampling.
    pub seed: u64,

    /// Device.
    pub device: Device,
}

fn default_lmbda() -> f64 {
    1.0
}

impl Default for A2cConfig {
    fn default() -> Self {
        Self {
            hidden_units: vec![64, 64],
            opt_config: OptimizerConfig::default().learning_rate(3e-4),
            gamma: 0.99,
            lmbda: default_lmbda(),
            alpha: 0.5,
            beta: 1e-3,
            seed: 42,
            device: Device::Cpu,
        }
    }
}

impl A2cConfig {
    /// Sets the hidden units.
    pub fn hidden_units(mut self, v: Vec<usize>) -> Self {
        self.hidden_units = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.opt_config = self.opt_config.learning_rate(lr);
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the decay of the advantage estimate.
    pub fn lmbda(mut self, v: f64) -> Self {
        self.lmbda = v;
        self
    }

    /// Sets the coefficient of the value loss.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the coefficient of the entropy bonus.
    pub fn beta(mut self, v: f64) -> Self {
        self.beta = v;
        self
    }

    /// Sets the seed of action sampling.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`A2cConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`A2cConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
