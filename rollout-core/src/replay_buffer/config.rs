//! Configuration of [`ReplayBuffer`](super::ReplayBuffer).
use serde::{Deserialize, Serialize};

/// Configuration of [`ReplayBuffer`](super::ReplayBuffer).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReplayBufferConfig {
    /// The maximum number of items.
    pub capacity: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,
}

impl Default for ReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
