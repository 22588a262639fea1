//! Cart-pole balancing.
use crate::{ArrayObs, ClassicControlConfig, ClassicControlError, DiscreteAct};
use anyhow::Result;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rollout_core::{Env, Space, Step};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;

/// Half the pole's length.
const LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * LENGTH;
const FORCE_MAG: f32 = 10.0;

/// Seconds between state updates.
const TAU: f32 = 0.02;

const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;
const X_THRESHOLD: f32 = 2.4;

pub(crate) fn observation_space() -> Space {
    let high = vec![X_THRESHOLD * 2.0, f32::MAX, THETA_THRESHOLD * 2.0, f32::MAX];
    Space::Box {
        low: high.iter().map(|v| -v).collect(),
        high,
    }
}

pub(crate) fn action_space() -> Space {
    Space::Discrete { n: 2 }
}

/// A pole attached to a cart moving along a frictionless track.
///
/// The observation is `[x, x_dot, theta, theta_dot]`. Action 0 pushes the cart
/// to the left, action 1 to the right. The reward is 1 for every step. The
/// episode terminates when the pole is more than 12 degrees from upright or the
/// cart is more than 2.4 units from the center.
pub struct CartPole {
    state: [f32; 4],
    rng: StdRng,
}

impl CartPole {
    /// Returns the state `[x, x_dot, theta, theta_dot]`.
    pub fn state(&self) -> [f32; 4] {
        self.state
    }

    fn obs(&self) -> ArrayObs {
        ArrayObs(self.state.to_vec())
    }
}

impl Env for CartPole {
    type Config = ClassicControlConfig;
    type Obs = ArrayObs;
    type Act = DiscreteAct;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        if !config.name.starts_with("CartPole") {
            return Err(ClassicControlError::UnknownEnv(config.name.clone()).into());
        }
        crate::env_spec(&config.name)?;

        Ok(Self {
            state: [0.0; 4],
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<ArrayObs> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        for v in self.state.iter_mut() {
            *v = self.rng.gen_range(-0.05..0.05);
        }
        trace!("CartPole reset: {:?}", self.state);
        Ok(self.obs())
    }

    fn step(&mut self, act: &DiscreteAct) -> Result<Step<Self>> {
        let force = match act.0 {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            a => {
                return Err(ClassicControlError::InvalidAction(format!(
                    "{} is not in Discrete(2)",
                    a
                ))
                .into())
            }
        };

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin, cos) = theta.sin_cos();
        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        // Euler integration
        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];

        let [x, _, theta, _] = self.state;
        let is_terminated = !(-X_THRESHOLD..=X_THRESHOLD).contains(&x)
            || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta);

        Ok(Step::new(self.obs(), 1.0, is_terminated, false))
    }

    fn observation_space(&self) -> Space {
        observation_space()
    }

    fn action_space(&self) -> Space {
        action_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> CartPole {
        CartPole::build(&ClassicControlConfig::new("CartPole-v0"), 0).unwrap()
    }

    #[test]
    fn test_reset_is_small_and_seeded() -> Result<()> {
        let mut env = env();
        let obs1 = env.reset(Some(3))?;
        assert!(obs1.0.iter().all(|v| v.abs() <= 0.05));
        let obs2 = env.reset(Some(3))?;
        assert_eq!(obs1, obs2);
        let obs3 = env.reset(Some(4))?;
        assert_ne!(obs1, obs3);
        Ok(())
    }

    #[test]
    fn test_pushing_one_way_terminates() -> Result<()> {
        let mut env = env();
        env.reset(Some(0))?;
        let mut n = 0;
        loop {
            let step = env.step(&DiscreteAct(1))?;
            n += 1;
            assert_eq!(step.reward, 1.0);
            if step.is_terminated {
                break;
            }
            assert!(n < 200);
        }
        // The pole falls within a few dozen steps.
        assert!(n < 50);
        Ok(())
    }

    #[test]
    fn test_push_direction() -> Result<()> {
        let mut env = env();
        env.reset(Some(0))?;
        let x_dot = env.state()[1];
        env.step(&DiscreteAct(1))?;
        assert!(env.state()[1] > x_dot);

        env.reset(Some(0))?;
        env.step(&DiscreteAct(0))?;
        assert!(env.state()[1] < x_dot);
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = env();
        env.reset(None)?;
        assert!(env.step(&DiscreteAct(2)).is_err());
        Ok(())
    }

    #[test]
    fn test_wrong_env_id() {
        assert!(CartPole::build(&ClassicControlConfig::new("Pendulum-v0"), 0).is_err());
        assert!(CartPole::build(&ClassicControlConfig::new("CartPole-v9"), 0).is_err());
    }
}
