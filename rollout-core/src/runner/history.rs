use crate::{replay_buffer::Transition, Act};

/// Transitions collected from one instance over one window, in order.
#[derive(Clone, Debug)]
pub struct History<O, A> {
    transitions: Vec<Transition<O, A>>,
    store: bool,
    n_steps: usize,
    reward: f32,
}

impl<O, A> History<O, A> {
    /// Creates an empty history.
    ///
    /// If `store` is `false`, pushed transitions are counted and dropped.
    pub fn new(store: bool) -> Self {
        Self {
            transitions: vec![],
            store,
            n_steps: 0,
            reward: 0.0,
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<O, A>) {
        self.n_steps += 1;
        self.reward += tr.reward;
        if self.store {
            self.transitions.push(tr);
        }
    }

    /// Returns the number of steps taken in the window.
    pub fn len(&self) -> usize {
        self.n_steps
    }

    /// Returns `true` if no step was taken.
    pub fn is_empty(&self) -> bool {
        self.n_steps == 0
    }

    /// Returns the sum of rewards in the window.
    pub fn total_reward(&self) -> f32 {
        self.reward
    }

    /// Returns the stored transitions.
    pub fn transitions(&self) -> &[Transition<O, A>] {
        &self.transitions
    }

    /// Consumes the history, returning the stored transitions.
    pub fn into_transitions(self) -> Vec<Transition<O, A>> {
        self.transitions
    }
}

impl<O, A: Act> History<O, A> {
    /// Returns the components of the stored actions, flattened in order.
    pub fn action_values(&self) -> Vec<f32> {
        self.transitions
            .iter()
            .flat_map(|tr| tr.act.to_vec_f32())
            .collect()
    }
}
