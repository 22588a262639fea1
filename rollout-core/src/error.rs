//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum RolloutError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The replay buffer holds fewer items than requested.
    #[error("Insufficient data in replay buffer: requested {requested}, available {available}")]
    InsufficientData {
        /// Number of items requested.
        requested: usize,
        /// Number of items in the buffer.
        available: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A runner worker thread hung up.
    #[error("Runner worker {0} disconnected")]
    WorkerDisconnected(usize),

    /// A step was requested on an instance whose episode has already ended.
    #[error("Episode of runner {0} has finished; reset it before stepping")]
    EpisodeFinished(usize),

    /// No runner instance with the given index.
    #[error("No runner with index {0}")]
    InvalidRunnerIndex(usize),
}
