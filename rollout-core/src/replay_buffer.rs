//! Fixed-capacity replay buffer of transitions.
mod base;
mod batch;
mod config;
mod transition;
pub use base::ReplayBuffer;
pub use batch::TransitionBatch;
pub use config::ReplayBufferConfig;
pub use transition::Transition;
