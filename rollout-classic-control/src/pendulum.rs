//! Inverted pendulum swing-up.
use crate::{ArrayObs, ClassicControlConfig, ClassicControlError, ContinuousAct};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rollout_core::{Env, Space, Step};
use std::f32::consts::PI;

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const GRAVITY: f32 = 10.0;
const MASS: f32 = 1.0;
const LENGTH: f32 = 1.0;

pub(crate) fn observation_space() -> Space {
    let high = vec![1.0, 1.0, MAX_SPEED];
    Space::Box {
        low: high.iter().map(|v| -v).collect(),
        high,
    }
}

pub(crate) fn action_space() -> Space {
    Space::Box {
        low: vec![-MAX_TORQUE],
        high: vec![MAX_TORQUE],
    }
}

/// Wraps an angle into `[-pi, pi)`.
fn angle_normalize(x: f32) -> f32 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

/// A pendulum starting at a random angle, to be swung up and kept upright.
///
/// The observation is `[cos(theta), sin(theta), theta_dot]` and the action is a
/// torque clipped to `[-2, 2]`. The reward is
/// `-(theta^2 + 0.1 * theta_dot^2 + 0.001 * torque^2)` with `theta` normalized
/// to `[-pi, pi)`. The episode never terminates.
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
    rng: StdRng,
}

impl Pendulum {
    /// Returns the state `(theta, theta_dot)`.
    pub fn state(&self) -> (f32, f32) {
        (self.theta, self.theta_dot)
    }

    fn obs(&self) -> ArrayObs {
        let (sin, cos) = self.theta.sin_cos();
        ArrayObs(vec![cos, sin, self.theta_dot])
    }
}

impl Env for Pendulum {
    type Config = ClassicControlConfig;
    type Obs = ArrayObs;
    type Act = ContinuousAct;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        if !config.name.starts_with("Pendulum") {
            return Err(ClassicControlError::UnknownEnv(config.name.clone()).into());
        }
        crate::env_spec(&config.name)?;

        Ok(Self {
            theta: 0.0,
            theta_dot: 0.0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<ArrayObs> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.theta = self.rng.gen_range(-PI..PI);
        self.theta_dot = self.rng.gen_range(-1.0..1.0);
        Ok(self.obs())
    }

    fn step(&mut self, act: &ContinuousAct) -> Result<Step<Self>> {
        let u = match act.0.as_slice() {
            [u] if u.is_finite() => u.clamp(-MAX_TORQUE, MAX_TORQUE),
            _ => {
                return Err(ClassicControlError::InvalidAction(format!(
                    "{:?} is not a finite torque",
                    act.0
                ))
                .into())
            }
        };

        let (th, thdot) = (self.theta, self.theta_dot);
        let cost = angle_normalize(th).powi(2) + 0.1 * thdot.powi(2) + 0.001 * u.powi(2);

        let thdot = thdot
            + (3.0 * GRAVITY / (2.0 * LENGTH) * th.sin() + 3.0 / (MASS * LENGTH.powi(2)) * u) * DT;
        let thdot = thdot.clamp(-MAX_SPEED, MAX_SPEED);
        self.theta = th + thdot * DT;
        self.theta_dot = thdot;

        Ok(Step::new(self.obs(), -cost, false, false))
    }

    fn observation_space(&self) -> Space {
        observation_space()
    }

    fn action_space(&self) -> Space {
        action_space()
    }
}
