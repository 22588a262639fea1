//! Configuration of DDPG learner.
use crate::{opt::OptimizerConfig, Device};
use anyhow::Result;
use rollout_core::OuNoiseConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Ddpg`](super::Ddpg).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DdpgConfig {
    /// Units of the hidden layers of the actor and the critic.
    pub hidden_units: Vec<usize>,

    /// Optimizer of the actor.
    pub actor_opt_config: OptimizerConfig,

    /// Optimizer of the critic.
    pub critic_opt_config: OptimizerConfig,

    /// Discount factor.
    pub gamma: f64,

    /// Soft update coefficient of the target networks.
    pub tau: f64,

    /// Exploration noise.
    pub noise: OuNoiseConfig,

    /// Seed of the exploration noise.
    pub seed: u64,

    /// Device.
    pub device: Device,
}

impl Default for DdpgConfig {
    fn default() -> Self {
        Self {
            hidden_units: vec![400, 300],
            actor_opt_config: OptimizerConfig::default().learning_rate(1e-4),
            critic_opt_config: OptimizerConfig::default().learning_rate(1e-3),
            gamma: 0.99,
            tau: 1e-3,
            noise: OuNoiseConfig::default(),
            seed: 42,
            device: Device::Cpu,
        }
    }
}

impl DdpgConfig {
    /// Sets the hidden units.
    pub fn hidden_units(mut self, v: Vec<usize>) -> Self {
        self.hidden_units = v;
        self
    }

    /// Sets the learning rate of the actor.
    pub fn actor_lr(mut self, lr: f64) -> Self {
        self.actor_opt_config = self.actor_opt_config.learning_rate(lr);
        self
    }

    /// Sets the learning rate of the critic.
    pub fn critic_lr(mut self, lr: f64) -> Self {
        self.critic_opt_config = self.critic_opt_config.learning_rate(lr);
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the soft update coefficient.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Sets the exploration noise.
    pub fn noise(mut self, v: OuNoiseConfig) -> Self {
        self.noise = v;
        self
    }

    /// Sets the seed of the exploration noise.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`DdpgConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DdpgConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
