#![warn(missing_docs)]
//! Core of rollout: interfaces between environments and learners, a replay buffer,
//! parallel episode runners and the training loop that sequences them.
//!
//! The main entry point is [`Trainer`], which drives epochs of
//! collect → buffer → learn → bookkeeping over a [`RunnerPool`](runner::RunnerPool).
pub mod error;
pub mod record;
pub mod replay_buffer;
pub mod runner;

mod base;
pub use base::{Act, Env, Learner, Obs, Policy, Step};

mod noise;
pub use noise::{OuNoise, OuNoiseConfig};

mod space;
pub use space::Space;

mod trainer;
pub use trainer::{EpisodeStats, LearnFrom, Trainer, TrainerConfig, TrainerState};
