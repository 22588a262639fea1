use crate::{Env, Step};

/// A transition `(o_t, a_t, r_t, o_t+1, done_t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<O, A> {
    /// Observation `o_t`.
    pub obs: O,

    /// Action `a_t`.
    pub act: A,

    /// Reward `r_t`.
    pub reward: f32,

    /// Observation `o_t+1`.
    pub next_obs: O,

    /// The episode reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut by a time limit.
    pub is_truncated: bool,
}

impl<O, A> Transition<O, A> {
    /// Creates a transition from the previous observation, the action and the resulting step.
    pub fn from_step<E>(obs: O, act: A, step: Step<E>) -> Self
    where
        E: Env<Obs = O, Act = A>,
    {
        Self {
            obs,
            act,
            reward: step.reward,
            next_obs: step.obs,
            is_terminated: step.is_terminated,
            is_truncated: step.is_truncated,
        }
    }

    /// Terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
