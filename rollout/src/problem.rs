//! Registered problems: an environment family paired with a learner.
use crate::HParams;
use anyhow::{bail, Result};
use log::{info, warn};
use rollout_candle_agent::{a2c::A2c, ddpg::Ddpg};
use rollout_classic_control::{get_gym_spaces, CartPole, ClassicControlConfig, Pendulum};
use rollout_core::{
    record::{NullRecorder, Recorder},
    replay_buffer::ReplayBuffer,
    runner::{MultiEpisodeRunner, RunnerPool},
    Env, LearnFrom, Learner, Trainer, TrainerState,
};
use rollout_tensorboard::TensorboardRecorder;

/// Names of the registered problems.
pub const PROBLEMS: [&str; 2] = ["a2c-cartpole-v0", "ddpg-pendulum-v0"];

/// A training problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Problem {
    /// A2C on `CartPole-v0`, learning from each epoch's rollouts.
    A2cCartPole,

    /// DDPG on Pendulum, learning from the replay buffer.
    DdpgPendulum,
}

impl Problem {
    /// Returns the problem registered as `name`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "a2c-cartpole-v0" => Ok(Self::A2cCartPole),
            "ddpg-pendulum-v0" => Ok(Self::DdpgPendulum),
            _ => bail!("Unknown problem {}, expected one of {:?}", name, PROBLEMS),
        }
    }

    /// Returns the registered name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::A2cCartPole => "a2c-cartpole-v0",
            Self::DdpgPendulum => "ddpg-pendulum-v0",
        }
    }

    /// Returns the name of the hyperparameter set used when none is given.
    pub fn default_hparam_set(&self) -> &'static str {
        match self {
            Self::A2cCartPole => "a2c-cartpole",
            Self::DdpgPendulum => "ddpg-pendulum",
        }
    }

    /// Applies the settings the problem fixes regardless of the hyperparameter set.
    pub fn configure(&self, hparams: HParams) -> HParams {
        match self {
            Self::A2cCartPole => {
                if hparams.env != "CartPole-v0" {
                    warn!("{} runs on CartPole-v0, ignoring env {}", self.name(), hparams.env);
                }
                HParams {
                    env: "CartPole-v0".into(),
                    learn_from: LearnFrom::Rollout,
                    ..hparams
                }
            }
            Self::DdpgPendulum => HParams {
                learn_from: LearnFrom::Replay,
                ..hparams
            },
        }
    }

    /// Trains the learner of the problem.
    ///
    /// Metrics are written to `log_dir` when it is set. The learner's
    /// parameters are saved in `save_dir` every `save_interval` epochs.
    pub fn run(&self, hparams: &HParams) -> Result<TrainerState> {
        let hparams = self.configure(hparams.clone());
        hparams.validate()?;
        info!("Problem {} on {}", self.name(), hparams.env);

        let (obs_space, act_space) = get_gym_spaces(&hparams.env)?;
        match self {
            Self::A2cCartPole => {
                let mut agent =
                    A2c::<CartPole>::build(hparams.a2c_config(), &obs_space, &act_space)?;
                train::<CartPole, _>(&hparams, &mut agent)
            }
            Self::DdpgPendulum => {
                let mut agent =
                    Ddpg::<Pendulum>::build(hparams.ddpg_config(), &obs_space, &act_space)?;
                train::<Pendulum, _>(&hparams, &mut agent)
            }
        }
    }
}

fn create_recorder(hparams: &HParams) -> Box<dyn Recorder> {
    match &hparams.log_dir {
        Some(log_dir) => Box::new(TensorboardRecorder::new(log_dir)),
        None => Box::new(NullRecorder {}),
    }
}

fn train<E, A>(hparams: &HParams, agent: &mut A) -> Result<TrainerState>
where
    E: Env<Config = ClassicControlConfig> + 'static,
    A: Learner<E>,
{
    let env_config = ClassicControlConfig::new(hparams.env.as_str());
    let mut trainer = Trainer::build(hparams.trainer_config())?;
    let mut runner = MultiEpisodeRunner::<E>::build(
        &env_config,
        Some(hparams.episode_cap()?),
        hparams.num_processes,
        hparams.seed,
    )?;
    let mut buffer = ReplayBuffer::build(&trainer.replay_buffer_config())?;
    let mut recorder = create_recorder(hparams);

    let state = trainer.train(agent, &mut runner, &mut buffer, recorder.as_mut())?;
    runner.stop()?;

    Ok(state)
}
