//! Classic control environments.
//!
//! [`CartPole`] and [`Pendulum`] follow the dynamics of the environments with
//! the same ids in OpenAI gym. [`get_gym_spaces`] returns the observation and
//! action spaces of a registered environment id.
//!
//! ```rust
//! use rollout_classic_control::{CartPole, ClassicControlConfig, DiscreteAct};
//! use rollout_core::Env;
//!
//! let config = ClassicControlConfig::new("CartPole-v0");
//! let mut env = CartPole::build(&config, 42).unwrap();
//! let obs = env.reset(None).unwrap();
//! assert_eq!(obs.as_ref().len(), 4);
//! let step = env.step(&DiscreteAct(1)).unwrap();
//! assert_eq!(step.reward, 1.0);
//! ```
mod act;
mod cartpole;
mod config;
mod error;
mod obs;
mod pendulum;
mod registry;
pub use act::{ContinuousAct, DiscreteAct};
pub use cartpole::CartPole;
pub use config::ClassicControlConfig;
pub use error::ClassicControlError;
pub use obs::ArrayObs;
pub use pendulum::Pendulum;
pub use registry::{env_spec, get_gym_spaces, EnvSpec, ENV_SPECS};
