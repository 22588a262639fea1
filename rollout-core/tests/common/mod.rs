//! Environment, policy and learner used in tests.
#![allow(dead_code)]
use anyhow::{bail, Result};
use rollout_core::{
    record::{Record, Recorder},
    replay_buffer::TransitionBatch,
    Act, Env, Learner, Obs, Policy, Space, Step,
};
use std::{fs::File, io::Write, path::Path};

/// Instance `ix` terminates its episodes after `episode_lengths[ix]` steps.
///
/// The instance index is recovered from the seed, whose upper 32 bits hold it.
#[derive(Clone, Debug)]
pub struct CountingEnvConfig {
    pub episode_lengths: Vec<usize>,
    pub fail_build: bool,
}

impl CountingEnvConfig {
    pub fn new(episode_lengths: Vec<usize>) -> Self {
        Self {
            episode_lengths,
            fail_build: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountingObs {
    pub ix: usize,
    pub t: usize,
    pub seed: u64,
}

impl Obs for CountingObs {}

#[derive(Clone, Debug, PartialEq)]
pub struct CountingAct(pub f32);

impl Act for CountingAct {
    fn to_vec_f32(&self) -> Vec<f32> {
        vec![self.0]
    }
}

pub struct CountingEnv {
    episode_length: usize,
    ix: usize,
    t: usize,
    seed: u64,
}

impl Env for CountingEnv {
    type Config = CountingEnvConfig;
    type Obs = CountingObs;
    type Act = CountingAct;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        if config.fail_build {
            bail!("failed to build the environment");
        }
        let ix = (seed >> 32) as usize;
        Ok(Self {
            episode_length: config.episode_lengths[ix],
            ix,
            t: 0,
            seed,
        })
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.t = 0;
        if let Some(seed) = seed {
            self.seed = seed;
        }
        Ok(self.obs())
    }

    fn step(&mut self, _act: &Self::Act) -> Result<Step<Self>> {
        self.t += 1;
        let is_terminated = self.t >= self.episode_length;
        Ok(Step::new(self.obs(), 1.0, is_terminated, false))
    }

    fn observation_space(&self) -> Space {
        Space::Box {
            low: vec![0.0],
            high: vec![f32::MAX],
        }
    }

    fn action_space(&self) -> Space {
        Space::Box {
            low: vec![0.0],
            high: vec![f32::MAX],
        }
    }
}

impl CountingEnv {
    fn obs(&self) -> CountingObs {
        CountingObs {
            ix: self.ix,
            t: self.t,
            seed: self.seed,
        }
    }
}

/// Takes the time step of the observation as its action and logs the queried instances.
#[derive(Default)]
pub struct CountingPolicy {
    pub queried: Vec<usize>,
}

impl Policy<CountingEnv> for CountingPolicy {
    fn sample(&mut self, obs: &CountingObs) -> Result<CountingAct> {
        self.queried.push(obs.ix);
        Ok(CountingAct(obs.t as f32))
    }
}

/// Learner counting the calls it receives.
#[derive(Default)]
pub struct MockLearner {
    pub policy: CountingPolicy,
    pub is_train: bool,
    pub batch_sizes: Vec<usize>,
    pub segment_ends: Vec<Vec<i8>>,
    pub n_resets: usize,

    /// The `n`-th call of `learn`, counted from 1, fails.
    pub fail_learn_at: Option<usize>,

    /// `save_params` fails.
    pub fail_save: bool,
}

impl Policy<CountingEnv> for MockLearner {
    fn sample(&mut self, obs: &CountingObs) -> Result<CountingAct> {
        self.policy.sample(obs)
    }
}

impl Learner<CountingEnv> for MockLearner {
    fn train(&mut self) {
        self.is_train = true;
    }

    fn eval(&mut self) {
        self.is_train = false;
    }

    fn is_train(&self) -> bool {
        self.is_train
    }

    fn learn(&mut self, batch: TransitionBatch<CountingObs, CountingAct>) -> Result<Record> {
        if self.fail_learn_at == Some(self.batch_sizes.len() + 1) {
            bail!("failed to learn");
        }
        self.batch_sizes.push(batch.len());
        self.segment_ends.push(batch.is_segment_end);
        Ok(Record::from_scalar("loss_critic", 0.5))
    }

    fn reset(&mut self) {
        self.n_resets += 1;
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        if self.fail_save {
            bail!("failed to save");
        }
        let mut file = File::create(path.join("mock.txt"))?;
        writeln!(file, "{}", self.batch_sizes.len())?;
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Recorder whose `n`-th write, counted from 1, fails.
pub struct FailingRecorder {
    pub fail_at: usize,
    pub n_writes: usize,
}

impl FailingRecorder {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            n_writes: 0,
        }
    }
}

impl Recorder for FailingRecorder {
    fn write(&mut self, _step: usize, _record: Record) -> Result<()> {
        self.n_writes += 1;
        if self.n_writes == self.fail_at {
            bail!("failed to write");
        }
        Ok(())
    }
}
