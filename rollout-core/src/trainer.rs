//! Train [`Learner`].
mod config;
mod stats;
use crate::{
    error::RolloutError,
    record::{Record, RecordValue::Scalar, Recorder},
    replay_buffer::{ReplayBuffer, ReplayBufferConfig, Transition, TransitionBatch},
    runner::RunnerPool,
    Env, Learner,
};
use anyhow::Result;
pub use config::{LearnFrom, TrainerConfig};
use log::{debug, info, trace, warn};
pub use stats::EpisodeStats;
use std::{path::Path, time::Instant};

/// Counters of a training run.
///
/// The counters only increase during a run. They are used as step indices of
/// the records written by [`Trainer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainerState {
    /// The number of finished epochs.
    pub epoch: usize,

    /// The number of finished episodes over all instances.
    pub n_episodes: usize,

    /// The number of environment steps over all instances.
    pub n_timesteps: usize,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop over a pool of environment instances.
///
/// # Training loop
///
/// [`Trainer::train()`] runs `num_total_steps / rollout_steps / num_processes`
/// epochs, numbered from 1. Each epoch does the following:
///
/// 1. Collect: every running instance of the [`RunnerPool`] takes up to
///    `rollout_steps` steps with actions sampled from the learner. The wall-clock
///    time of the collection is measured.
/// 2. Buffer: the transitions are concatenated in instance order and pushed into
///    the [`ReplayBuffer`].
/// 3. Learn: only if the buffer holds at least `batch_size` transitions. With
///    [`LearnFrom::Replay`], a batch is sampled and passed to [`Learner::learn`].
///    With [`LearnFrom::Rollout`], the transitions of the epoch are passed instead,
///    the window of each instance as one segment of the batch.
/// 4. Per-instance bookkeeping: the steps, rewards and actions of the window are
///    added to the instance's [`EpisodeStats`]. For every instance whose episode
///    ended, the episode counter is incremented, `episode_length`, `episode_reward`
///    and `agent_actions` are written at step `n_episodes`, the stats are cleared,
///    and the instance and the learner are reset.
/// 5. Global bookkeeping: the timestep counter is advanced and `total_timesteps`
///    and `steps_per_sec` are written at step `epoch`, together with the record
///    returned by the learner.
/// 6. Checkpoint: if `save_dir` is given and `epoch % save_interval == 0`, the
///    learner's parameters are saved in `save_dir`, overwriting earlier files.
///
/// Any error aborts the run.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Learner]-->|Env::Act|B[RunnerPool]
///     B -->|Transition|C[ReplayBuffer]
///     C -->|TransitionBatch|A
///     B -->|EpisodeStats|D[Recorder]
///     A -->|Record|D
/// ```
///
/// [`Trainer::train()`]: Trainer::train
pub struct Trainer {
    config: TrainerConfig,
    state: TrainerState,

    /// One entry per instance.
    stats: Vec<EpisodeStats>,
}

impl Trainer {
    /// Constructs a trainer, failing if the configuration is invalid.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let stats = vec![EpisodeStats::default(); config.num_processes];
        Ok(Self {
            config,
            state: TrainerState::default(),
            stats,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Returns the counters.
    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    /// Returns the statistics of the running episodes, one per instance.
    pub fn stats(&self) -> &[EpisodeStats] {
        &self.stats
    }

    /// Returns the number of epochs of [`Trainer::train()`].
    pub fn n_epochs(&self) -> usize {
        self.config.n_epochs()
    }

    /// Returns the configuration of a replay buffer with `buffer_size` capacity.
    pub fn replay_buffer_config(&self) -> ReplayBufferConfig {
        ReplayBufferConfig::default()
            .capacity(self.config.buffer_size)
            .seed(self.config.seed)
    }

    /// Train the learner.
    ///
    /// Returns the counters at the end of the run.
    pub fn train<E, A, R>(
        &mut self,
        agent: &mut A,
        runner: &mut R,
        buffer: &mut ReplayBuffer<Transition<E::Obs, E::Act>>,
        recorder: &mut dyn Recorder,
    ) -> Result<TrainerState>
    where
        E: Env,
        A: Learner<E>,
        R: RunnerPool<E>,
    {
        self.check_runner::<E, R>(runner)?;

        let n_epochs = self.n_epochs();
        if n_epochs == 0 {
            warn!(
                "num_total_steps ({}) is smaller than the steps of one epoch ({}), no epoch runs",
                self.config.num_total_steps,
                self.config.rollout_steps * self.config.num_processes
            );
        }
        info!(
            "Starts training: {} epochs, {} instances, {} steps per window",
            n_epochs, self.config.num_processes, self.config.rollout_steps
        );
        agent.train();

        for _ in 0..n_epochs {
            self.train_epoch(agent, runner, buffer, recorder)?;
        }
        recorder.flush()?;

        info!(
            "Finished training: {} epochs, {} episodes, {} timesteps",
            self.state.epoch, self.state.n_episodes, self.state.n_timesteps
        );
        Ok(self.state.clone())
    }

    fn check_runner<E: Env, R: RunnerPool<E>>(&self, runner: &R) -> Result<()> {
        match runner.len() == self.config.num_processes {
            true => Ok(()),
            false => Err(RolloutError::InvalidConfig(format!(
                "runner has {} instances, num_processes is {}",
                runner.len(),
                self.config.num_processes
            ))
            .into()),
        }
    }

    /// Performs one epoch of the training loop.
    ///
    /// Fails without stepping if the runner does not have `num_processes` instances.
    pub fn train_epoch<E, A, R>(
        &mut self,
        agent: &mut A,
        runner: &mut R,
        buffer: &mut ReplayBuffer<Transition<E::Obs, E::Act>>,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        E: Env,
        A: Learner<E>,
        R: RunnerPool<E>,
    {
        self.check_runner::<E, R>(runner)?;
        self.state.epoch += 1;
        let epoch = self.state.epoch;

        // Collect
        let timer = Instant::now();
        let histories = runner.run(agent, self.config.rollout_steps, true)?;
        let is_done = runner.is_done();
        let elapsed = timer.elapsed().as_secs_f32();

        for (stats, history) in self.stats.iter_mut().zip(histories.iter()) {
            stats.add_window(history);
        }
        let windows = histories
            .into_iter()
            .map(|h| h.into_transitions())
            .collect::<Vec<_>>();
        let epoch_steps = windows.iter().map(Vec::len).sum::<usize>();
        trace!("Epoch {}: collected {} transitions", epoch, epoch_steps);

        // Buffer and learn
        buffer.extend(windows.iter().flatten().cloned());
        let mut record = match self.config.learn_from {
            _ if buffer.len() < self.config.batch_size => {
                trace!(
                    "Skip learning: {} transitions in buffer, batch size {}",
                    buffer.len(),
                    self.config.batch_size
                );
                Record::empty()
            }
            LearnFrom::Replay => {
                let batch: TransitionBatch<_, _> =
                    buffer.sample(self.config.batch_size)?.into_iter().collect();
                agent.learn(batch)?
            }
            LearnFrom::Rollout if epoch_steps == 0 => Record::empty(),
            LearnFrom::Rollout => {
                let mut batch = TransitionBatch::with_capacity(epoch_steps);
                for window in windows {
                    batch.extend_segment(window);
                }
                agent.learn(batch)?
            }
        };

        // Per-instance bookkeeping
        for (ix, _) in is_done.iter().enumerate().filter(|(_, done)| **done) {
            self.state.n_episodes += 1;
            let stats = std::mem::take(&mut self.stats[ix]);
            debug!(
                "Episode {} finished on instance {}: length = {}, reward = {}",
                self.state.n_episodes, ix, stats.length, stats.reward
            );
            recorder.write(self.state.n_episodes, stats.into_record())?;
            runner.reset(ix)?;
            agent.reset();
        }

        // Global bookkeeping
        self.state.n_timesteps += epoch_steps;
        record.insert("total_timesteps", Scalar(self.state.n_timesteps as f32));
        record.insert(
            "steps_per_sec",
            Scalar(epoch_steps as f32 / elapsed.max(f32::EPSILON)),
        );
        recorder.write(epoch, record)?;

        // Checkpoint
        if let Some(save_dir) = self.config.save_dir.as_ref() {
            if epoch % self.config.save_interval == 0 {
                std::fs::create_dir_all(save_dir)?;
                agent.save_params(Path::new(save_dir))?;
                info!("Saved the model in {:?} at epoch {}", save_dir, epoch);
            }
        }

        Ok(())
    }
}
