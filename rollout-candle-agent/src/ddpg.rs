//! Deep deterministic policy gradient (DDPG) learner.
//!
//! The actor maps observations to actions in `[-1, 1]`, rescaled to the bounds
//! of the action space when the action is passed to the environment. During
//! training, Ornstein-Uhlenbeck noise is added to the actor's output before
//! clipping. The critic and the targets see actions in `[-1, 1]`.
mod base;
mod config;
pub use base::Ddpg;
pub use config::DdpgConfig;
