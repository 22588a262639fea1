//! Environment.
use super::{Act, Obs, Step};
use crate::Space;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Environments are not required to be `Send`: a
/// [`MultiEpisodeRunner`](crate::runner::MultiEpisodeRunner) builds each
/// instance inside the worker thread that owns it.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation.
    ///
    /// If `seed` is given, the random number generator of the environment is
    /// reseeded before the initial state is drawn.
    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs>;

    /// Performs an environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Space of observations.
    fn observation_space(&self) -> Space;

    /// Space of actions.
    fn action_space(&self) -> Space;
}
