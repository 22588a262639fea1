use super::{episode_seed, History, RunnerPool};
use crate::{error::RolloutError, replay_buffer::Transition, Env, Policy};
use anyhow::Result;
use log::trace;

/// Runs episodes on a single environment instance.
///
/// The runner keeps the current observation of the instance and enforces the
/// episode length cap: the step reaching `max_episode_steps` is marked as
/// truncated unless the environment terminated on it.
pub struct EpisodeRunner<E: Env> {
    env: E,
    obs: E::Obs,
    index: usize,
    base_seed: u64,

    /// Number of episodes started so far, including the first one.
    n_resets: u64,

    max_episode_steps: Option<usize>,
    episode_steps: usize,
    is_done: bool,
}

impl<E: Env> EpisodeRunner<E> {
    /// Builds the environment of instance `index` and starts its first episode.
    pub fn build(
        config: &E::Config,
        index: usize,
        max_episode_steps: Option<usize>,
        base_seed: u64,
    ) -> Result<Self> {
        if max_episode_steps == Some(0) {
            return Err(
                RolloutError::InvalidConfig("max_episode_steps must be positive".into()).into(),
            );
        }

        let seed = episode_seed(base_seed, index, 0);
        let mut env = E::build(config, seed)?;
        let obs = env.reset(Some(seed))?;

        Ok(Self {
            env,
            obs,
            index,
            base_seed,
            n_resets: 1,
            max_episode_steps,
            episode_steps: 0,
            is_done: false,
        })
    }

    /// Applies `act` to the environment.
    ///
    /// Fails with [`RolloutError::EpisodeFinished`] if the episode has already ended.
    pub fn step(&mut self, act: E::Act) -> Result<Transition<E::Obs, E::Act>> {
        if self.is_done {
            return Err(RolloutError::EpisodeFinished(self.index).into());
        }

        let step = self.env.step(&act)?;
        self.episode_steps += 1;

        let is_terminated = step.is_terminated;
        let at_cap = matches!(self.max_episode_steps, Some(n) if self.episode_steps >= n);
        let is_truncated = step.is_truncated || (!is_terminated && at_cap);
        let obs = std::mem::replace(&mut self.obs, step.obs.clone());
        self.is_done = is_terminated || is_truncated;

        Ok(Transition {
            obs,
            act,
            reward: step.reward,
            next_obs: step.obs,
            is_terminated,
            is_truncated,
        })
    }

    /// Starts a new episode with the next seed of this instance.
    pub fn reset_episode(&mut self) -> Result<&E::Obs> {
        let seed = episode_seed(self.base_seed, self.index, self.n_resets);
        trace!("Reset runner {} with seed {}", self.index, seed);
        self.obs = self.env.reset(Some(seed))?;
        self.n_resets += 1;
        self.episode_steps = 0;
        self.is_done = false;
        Ok(&self.obs)
    }

    /// Returns the current observation.
    pub fn obs(&self) -> &E::Obs {
        &self.obs
    }

    /// Returns `true` if the current episode has ended.
    pub fn is_episode_done(&self) -> bool {
        self.is_done
    }

    /// Returns the number of steps taken in the current episode.
    pub fn episode_steps(&self) -> usize {
        self.episode_steps
    }

    /// Returns the index of the instance.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns a reference to the environment.
    pub fn env(&self) -> &E {
        &self.env
    }
}

impl<E: Env> RunnerPool<E> for EpisodeRunner<E> {
    fn run<P: Policy<E>>(
        &mut self,
        policy: &mut P,
        steps: usize,
        store: bool,
    ) -> Result<Vec<History<E::Obs, E::Act>>> {
        let mut history = History::new(store);
        for _ in 0..steps {
            if self.is_done {
                break;
            }
            let act = policy.sample(&self.obs)?;
            history.push(self.step(act)?);
        }
        Ok(vec![history])
    }

    fn is_done(&self) -> Vec<bool> {
        vec![self.is_done]
    }

    fn reset(&mut self, ix: usize) -> Result<()> {
        if ix != 0 {
            return Err(RolloutError::InvalidRunnerIndex(ix).into());
        }
        self.reset_episode()?;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> usize {
        1
    }
}
