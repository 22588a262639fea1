//! Registered environment ids.
use crate::{cartpole, pendulum, ClassicControlError};
use anyhow::Result;
use rollout_core::Space;

/// Properties of a registered environment id.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvSpec {
    /// Environment id.
    pub id: &'static str,

    /// Default episode length cap.
    pub max_episode_steps: usize,

    /// Average episode reward regarded as solving the task.
    pub reward_threshold: Option<f32>,
}

/// All registered environments.
pub static ENV_SPECS: [EnvSpec; 4] = [
    EnvSpec {
        id: "CartPole-v0",
        max_episode_steps: 200,
        reward_threshold: Some(195.0),
    },
    EnvSpec {
        id: "CartPole-v1",
        max_episode_steps: 500,
        reward_threshold: Some(475.0),
    },
    EnvSpec {
        id: "Pendulum-v0",
        max_episode_steps: 200,
        reward_threshold: None,
    },
    EnvSpec {
        id: "Pendulum-v1",
        max_episode_steps: 200,
        reward_threshold: None,
    },
];

/// Looks up a registered environment id.
pub fn env_spec(id: &str) -> Result<&'static EnvSpec, ClassicControlError> {
    ENV_SPECS
        .iter()
        .find(|spec| spec.id == id)
        .ok_or_else(|| ClassicControlError::UnknownEnv(id.to_string()))
}

/// Returns the observation and action spaces of the environment `id`.
pub fn get_gym_spaces(id: &str) -> Result<(Space, Space)> {
    let spec = env_spec(id)?;
    if spec.id.starts_with("CartPole") {
        Ok((cartpole::observation_space(), cartpole::action_space()))
    } else {
        Ok((pendulum::observation_space(), pendulum::action_space()))
    }
}
