use thiserror::Error;

/// Errors of classic control environments.
#[derive(Error, Debug, PartialEq)]
pub enum ClassicControlError {
    /// The environment id is not registered.
    #[error("Unknown environment id: {0}")]
    UnknownEnv(String),

    /// The action is not in the action space.
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}
