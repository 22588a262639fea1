//! Runners advancing environment instances in windows of steps.
//!
//! A [`RunnerPool`] manages a fixed, indexed set of environment instances.
//! Each call to [`RunnerPool::run`] advances every instance whose episode is
//! still running by up to the given number of steps and returns one
//! [`History`] per instance.
//!
//! An instance whose episode ends inside a window stops stepping for the rest
//! of that window, so its history may be shorter than requested. It stays done
//! until [`RunnerPool::reset`] is called for it.
mod episode;
mod history;
mod multi;
use crate::{Env, Policy};
use anyhow::Result;
pub use episode::EpisodeRunner;
pub use history::History;
pub use multi::MultiEpisodeRunner;

/// Interface of a pool of environment instances.
pub trait RunnerPool<E: Env> {
    /// Advances every running instance by up to `steps` transitions.
    ///
    /// Actions are taken from `policy`. If `store` is `false`, histories only
    /// count steps and rewards and keep no transitions.
    /// The call blocks until all instances have finished their window.
    fn run<P: Policy<E>>(
        &mut self,
        policy: &mut P,
        steps: usize,
        store: bool,
    ) -> Result<Vec<History<E::Obs, E::Act>>>;

    /// Returns the done flags of the instances after the most recent [`RunnerPool::run`].
    fn is_done(&self) -> Vec<bool>;

    /// Discards the episode of instance `ix` and starts a fresh one.
    fn reset(&mut self, ix: usize) -> Result<()>;

    /// Releases all resources of the instances.
    fn stop(&mut self) -> Result<()>;

    /// Returns the number of instances.
    fn len(&self) -> usize;

    /// Returns `true` if the pool has no instance.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Seed of the `n`-th episode of instance `ix`.
///
/// Distinct for every `(ix, n)` below `2^32` given the same `base_seed`.
pub fn episode_seed(base_seed: u64, ix: usize, n: u64) -> u64 {
    base_seed
        .wrapping_add((ix as u64) << 32)
        .wrapping_add(n)
}

#[cfg(test)]
mod tests {
    use super::episode_seed;
    use std::collections::HashSet;

    #[test]
    fn test_episode_seeds_are_distinct() {
        let seeds: HashSet<u64> = (0..8)
            .flat_map(|ix| (0..100).map(move |n| episode_seed(1, ix, n)))
            .collect();
        assert_eq!(seeds.len(), 800);
        assert_eq!(episode_seed(1, 3, 5), episode_seed(1, 3, 5));
    }
}
