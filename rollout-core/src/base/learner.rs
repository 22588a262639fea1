//! Learner.
use super::{Env, Policy};
use crate::{record::Record, replay_buffer::TransitionBatch};
use anyhow::Result;
use std::path::Path;

/// A trainable policy on an environment.
///
/// Device placement is fixed when a learner is constructed; the training loop
/// never branches on it.
pub trait Learner<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step on a batch of transitions.
    ///
    /// The returned record holds scalar diagnostics such as losses.
    fn learn(&mut self, batch: TransitionBatch<E::Obs, E::Act>) -> Result<Record>;

    /// Resets per-episode internal state, e.g. exploration noise.
    fn reset(&mut self);

    /// Save the parameters of the learner in the given directory.
    ///
    /// Files already in the directory are overwritten.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the learner from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
