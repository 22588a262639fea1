//! Hyperparameters of experiments and the registry of named hyperparameter sets.
use anyhow::{bail, Context, Result};
use rollout_candle_agent::{a2c::A2cConfig, ddpg::DdpgConfig, Device};
use rollout_classic_control::env_spec;
use rollout_core::{LearnFrom, OuNoiseConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Names of the registered hyperparameter sets.
pub const HPARAM_SETS: [&str; 4] = ["base_pg", "base_ddpg", "a2c-cartpole", "ddpg-pendulum"];

/// Hyperparameters of a training run.
///
/// Shared by all problems; each learner reads the fields it needs.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HParams {
    /// Environment id.
    pub env: String,

    /// The number of environment instances stepped in parallel.
    pub num_processes: usize,

    /// Steps per instance per epoch.
    pub rollout_steps: usize,

    /// Episode length cap. The default of the environment id is used when not set.
    pub max_episode_steps: Option<usize>,

    /// Budget of environment steps over all instances.
    pub num_total_steps: usize,

    /// Batch size of replay learning.
    pub batch_size: usize,

    /// Capacity of the replay buffer.
    pub buffer_size: usize,

    /// Learning rate of the actor, also used as the only learning rate of A2C.
    pub actor_lr: f64,

    /// Learning rate of the critic.
    pub critic_lr: f64,

    /// Discount factor.
    pub gamma: f64,

    /// Decay of the advantage estimate in A2C.
    pub lmbda: f64,

    /// Soft update coefficient of target networks.
    pub tau: f64,

    /// Mean of the OU noise.
    pub ou_mu: f32,

    /// Scale of the OU noise.
    pub ou_sigma: f32,

    /// Mean reversion rate of the OU noise.
    pub ou_theta: f32,

    /// Coefficient of the value loss in A2C.
    pub alpha: f64,

    /// Coefficient of the entropy bonus in A2C.
    pub beta: f64,

    /// Hidden layers of the networks.
    pub hidden_units: Vec<usize>,

    /// Source of learning batches.
    pub learn_from: LearnFrom,

    /// Random seed.
    pub seed: u64,

    /// Where to save the learner's parameters.
    pub save_dir: Option<String>,

    /// Interval of saving in epochs.
    pub save_interval: usize,

    /// Where to write metrics.
    pub log_dir: Option<String>,

    /// Place the networks on the first GPU.
    pub cuda: bool,

    /// Interval of evaluation in epochs. Not used by the training loop.
    pub eval_interval: usize,
}

/// Base of policy gradient learners.
pub fn base_pg() -> HParams {
    HParams {
        env: "CartPole-v0".into(),
        num_processes: 1,
        rollout_steps: 5,
        max_episode_steps: None,
        num_total_steps: 100_000,
        batch_size: 32,
        buffer_size: 10_000,
        actor_lr: 1e-3,
        critic_lr: 1e-3,
        gamma: 0.99,
        lmbda: 1.0,
        tau: 1e-2,
        ou_mu: 0.0,
        ou_sigma: 0.2,
        ou_theta: 0.15,
        alpha: 0.5,
        beta: 1e-2,
        hidden_units: vec![64, 64],
        learn_from: LearnFrom::Rollout,
        seed: 42,
        save_dir: None,
        save_interval: 1000,
        log_dir: None,
        cuda: false,
        eval_interval: 500,
    }
}

/// Base of DDPG.
pub fn base_ddpg() -> HParams {
    HParams {
        env: "Pendulum-v0".into(),
        rollout_steps: 1,
        batch_size: 128,
        buffer_size: 1_000_000,
        actor_lr: 1e-4,
        critic_lr: 1e-3,
        tau: 1e-3,
        hidden_units: vec![400, 300],
        learn_from: LearnFrom::Replay,
        ..base_pg()
    }
}

/// A2C on CartPole.
pub fn a2c_cartpole() -> HParams {
    HParams {
        seed: 1,
        num_processes: 16,
        rollout_steps: 5,
        max_episode_steps: Some(500),
        num_total_steps: 1_600_000,
        alpha: 0.5,
        gamma: 0.99,
        lmbda: 1.0,
        beta: 1e-3,
        batch_size: 128,
        tau: 1e-2,
        actor_lr: 3e-4,
        eval_interval: 500,
        ..base_pg()
    }
}

/// DDPG on Pendulum.
pub fn ddpg_pendulum() -> HParams {
    HParams {
        num_processes: 4,
        num_total_steps: 200_000,
        batch_size: 64,
        buffer_size: 100_000,
        tau: 1e-2,
        hidden_units: vec![64, 64],
        save_interval: 5000,
        ..base_ddpg()
    }
}

/// Returns the hyperparameter set registered as `name`.
pub fn hparam_set(name: &str) -> Result<HParams> {
    match name {
        "base_pg" => Ok(base_pg()),
        "base_ddpg" => Ok(base_ddpg()),
        "a2c-cartpole" => Ok(a2c_cartpole()),
        "ddpg-pendulum" => Ok(ddpg_pendulum()),
        _ => bail!(
            "Unknown hyperparameter set {}, expected one of {:?}",
            name,
            HPARAM_SETS
        ),
    }
}

impl HParams {
    /// Returns the episode length cap, falling back to the default of the environment id.
    pub fn episode_cap(&self) -> Result<usize> {
        match self.max_episode_steps {
            Some(n) => Ok(n),
            None => Ok(env_spec(&self.env)?.max_episode_steps),
        }
    }

    /// Checks the hyperparameters before training.
    pub fn validate(&self) -> Result<()> {
        env_spec(&self.env)?;
        self.trainer_config().validate()?;

        if self.max_episode_steps == Some(0) {
            bail!("max_episode_steps must be positive");
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            bail!("gamma must be in [0, 1], got {}", self.gamma);
        }
        if !(0.0..=1.0).contains(&self.lmbda) {
            bail!("lmbda must be in [0, 1], got {}", self.lmbda);
        }
        if !(self.tau > 0.0 && self.tau <= 1.0) {
            bail!("tau must be in (0, 1], got {}", self.tau);
        }
        if self.actor_lr <= 0.0 || self.critic_lr <= 0.0 {
            bail!("learning rates must be positive");
        }
        if self.hidden_units.iter().any(|&n| n == 0) {
            bail!("hidden_units must be positive");
        }

        Ok(())
    }

    /// Returns the configuration of the training loop.
    pub fn trainer_config(&self) -> TrainerConfig {
        let config = TrainerConfig::default()
            .num_processes(self.num_processes)
            .rollout_steps(self.rollout_steps)
            .num_total_steps(self.num_total_steps)
            .batch_size(self.batch_size)
            .buffer_size(self.buffer_size)
            .seed(self.seed)
            .save_interval(self.save_interval)
            .eval_interval(self.eval_interval)
            .learn_from(self.learn_from);
        match &self.save_dir {
            Some(dir) => config.save_dir(dir.as_str()),
            None => config,
        }
    }

    /// Returns the configuration of a DDPG learner.
    pub fn ddpg_config(&self) -> DdpgConfig {
        DdpgConfig::default()
            .hidden_units(self.hidden_units.clone())
            .actor_lr(self.actor_lr)
            .critic_lr(self.critic_lr)
            .gamma(self.gamma)
            .tau(self.tau)
            .noise(
                OuNoiseConfig::default()
                    .mu(self.ou_mu)
                    .sigma(self.ou_sigma)
                    .theta(self.ou_theta),
            )
            .seed(self.seed)
            .device(Device::from_cuda_flag(self.cuda))
    }

    /// Returns the configuration of an A2C learner.
    pub fn a2c_config(&self) -> A2cConfig {
        A2cConfig::default()
            .hidden_units(self.hidden_units.clone())
            .learning_rate(self.actor_lr)
            .gamma(self.gamma)
            .lmbda(self.lmbda)
            .alpha(self.alpha)
            .beta(self.beta)
            .seed(self.seed)
            .device(Device::from_cuda_flag(self.cuda))
    }

    /// Overrides fields with those given in a YAML file.
    ///
    /// The file may set any subset of the fields.
    pub fn override_with(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let overrides: Value = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {:?}", path))?;
        let overrides = match overrides {
            Value::Mapping(m) => m,
            Value::Null => return Ok(self),
            _ => bail!("{:?} is not a mapping of hyperparameters", path),
        };

        let mut hparams = match serde_yaml::to_value(&self)? {
            Value::Mapping(m) => m,
            _ => bail!("Hyperparameters are not serialized as a mapping"),
        };
        for (k, v) in overrides {
            if !hparams.contains_key(&k) {
                bail!("Unknown hyperparameter {:?} in {:?}", k, path);
            }
            hparams.insert(k, v);
        }

        Ok(serde_yaml::from_value(Value::Mapping(hparams))?)
    }

    /// Constructs [`HParams`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HParams`] as YAML file.
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
    fn test_a2c_cartpole() -> Result<()> {
        let hparams = hparam_set("a2c-cartpole")?;
        assert_eq!(hparams.seed, 1);
        assert_eq!(hparams.num_processes, 16);
        assert_eq!(hparams.rollout_steps, 5);
        assert_eq!(hparams.max_episode_steps, Some(500));
        assert_eq!(hparams.num_total_steps, 1_600_000);
        assert_eq!(hparams.alpha, 0.5);
        assert_eq!(hparams.gamma, 0.99);
        assert_eq!(hparams.lmbda, 1.0);
        assert_eq!(hparams.a2c_config().lmbda, 1.0);
        assert_eq!(hparams.beta, 1e-3);
        assert_eq!(hparams.batch_size, 128);
        assert_eq!(hparams.tau, 1e-2);
        assert_eq!(hparams.actor_lr, 3e-4);
        assert_eq!(hparams.eval_interval, 500);
        assert_eq!(hparams.trainer_config().n_epochs(), 20_000);
        hparams.validate()
    }

    #[test]
    fn test_registered_sets_are_valid() -> Result<()> {
        for name in HPARAM_SETS {
            hparam_set(name)?.validate()?;
        }
        assert!(hparam_set("ppo-cartpole").is_err());
        Ok(())
    }

    #[test]
    fn test_episode_cap_falls_back_to_env() -> Result<()> {
        let hparams = base_ddpg();
        assert_eq!(hparams.episode_cap()?, 200);
        let hparams = HParams {
            max_episode_steps: Some(50),
            ..hparams
        };
        assert_eq!(hparams.episode_cap()?, 50);
        Ok(())
    }

    #[test]
    fn test_validate() {
        let invalid = [
            HParams {
                env: "MountainCar-v0".into(),
                ..base_pg()
            },
            HParams {
                num_processes: 0,
                ..base_pg()
            },
            HParams {
                batch_size: 20_000,
                ..base_pg()
            },
            HParams {
                gamma: 1.5,
                ..base_pg()
            },
            HParams {
                lmbda: -0.1,
                ..base_pg()
            },
            HParams {
                max_episode_steps: Some(0),
                ..base_pg()
            },
        ];
        for hparams in invalid.iter() {
            assert!(hparams.validate().is_err(), "{:?}", hparams);
        }

        // A budget below one epoch runs no epoch.
        let hparams = HParams {
            num_total_steps: 4,
            ..base_pg()
        };
        assert!(hparams.validate().is_ok());
        assert_eq!(hparams.trainer_config().n_epochs(), 0);
    }

    #[test]
    fn test_override_with_yaml() -> Result<()> {
        let dir = TempDir::new("hparams")?;
        let path = dir.path().join("overrides.yaml");
        std::fs::write(&path, "num_processes: 2\nlearn_from: replay\nsave_dir: /tmp/model\n")?;

        let hparams = a2c_cartpole().override_with(&path)?;
        assert_eq!(hparams.num_processes, 2);
        assert_eq!(hparams.learn_from, LearnFrom::Replay);
        assert_eq!(hparams.save_dir.as_deref(), Some("/tmp/model"));
        assert_eq!(hparams.rollout_steps, 5);

        std::fs::write(&path, "num_procs: 2\n")?;
        assert!(a2c_cartpole().override_with(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_serde_hparams() -> Result<()> {
        let dir = TempDir::new("hparams")?;
        let path = dir.path().join("hparams.yaml");
        let hparams = ddpg_pendulum();
        hparams.save(&path)?;
        assert_eq!(HParams::load(&path)?, hparams);
        Ok(())
    }
}
