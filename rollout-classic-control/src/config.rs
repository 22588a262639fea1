//! Configuration of classic control environments.
use serde::{Deserialize, Serialize};

/// Configuration of [`CartPole`](crate::CartPole) and [`Pendulum`](crate::Pendulum).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClassicControlConfig {
    /// Environment id, e.g. `CartPole-v0`.
    pub name: String,
}

impl ClassicControlConfig {
    /// Constructs a configuration for the environment `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Sets the environment id.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
