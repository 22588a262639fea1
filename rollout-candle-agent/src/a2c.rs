//! Advantage actor-critic (A2C) learner for discrete actions.
//!
//! The policy and the value function are separate MLPs sharing one optimizer.
//! Advantages are generalized advantage estimates computed over the segments
//! of the batch given to [`Learner::learn`](rollout_core::Learner::learn).
//! A rollout batch holds the window of each instance as one segment. Replayed
//! transitions are segments of their own, which reduces the estimate to the
//! one-step TD error.
mod base;
mod config;
pub use base::A2c;
pub use config::A2cConfig;
