//! Ring buffer with uniform sampling.
use super::ReplayBufferConfig;
use crate::error::RolloutError;
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A fixed-capacity buffer evicting its oldest items first.
///
/// Items are sampled uniformly at random with replacement.
pub struct ReplayBuffer<T> {
    capacity: usize,

    /// Index where the next item is written.
    i: usize,

    data: Vec<T>,
    rng: StdRng,
}

impl<T: Clone> ReplayBuffer<T> {
    /// Builds a replay buffer.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(
                RolloutError::InvalidConfig("replay buffer capacity must be positive".into()).into(),
            );
        }

        Ok(Self {
            capacity: config.capacity,
            i: 0,
            data: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Pushes an item, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, item: T) {
        if self.data.len() < self.capacity {
            self.data.push(item);
        } else {
            self.data[self.i] = item;
        }
        self.i = (self.i + 1) % self.capacity;
    }

    /// Pushes items in order.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    /// Draws `n` items independently and uniformly with replacement.
    ///
    /// Fails with [`RolloutError::InsufficientData`] if `n` exceeds the number of stored items.
    pub fn sample(&mut self, n: usize) -> Result<Vec<T>> {
        let size = self.data.len();
        if n > size {
            return Err(RolloutError::InsufficientData {
                requested: n,
                available: size,
            }
            .into());
        }

        Ok((0..n)
            .map(|_| self.data[self.rng.gen_range(0..size)].clone())
            .collect())
    }

    /// Returns an iterator over the items from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        // Until the buffer first fills up, `i` equals the length and the split is trivial.
        let (newer, older) = self.data.split_at(self.i % self.data.len().max(1));
        older.iter().chain(newer.iter())
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no item is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
