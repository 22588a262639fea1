use crate::{
    record::{Record, RecordValue},
    runner::History,
    Act,
};

/// Statistics of the running episode of one instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeStats {
    /// The number of steps so far.
    pub length: usize,

    /// The sum of rewards so far.
    pub reward: f32,

    /// Components of the actions taken so far, flattened.
    pub actions: Vec<f32>,
}

impl EpisodeStats {
    /// Accumulates the steps of a window.
    pub fn add_window<O, A: Act>(&mut self, history: &History<O, A>) {
        self.length += history.len();
        self.reward += history.total_reward();
        self.actions.extend(history.action_values());
    }

    /// Converts the statistics into `episode_length`, `episode_reward` and `agent_actions`.
    pub fn into_record(self) -> Record {
        Record::from_slice(&[
            ("episode_length", RecordValue::Scalar(self.length as f32)),
            ("episode_reward", RecordValue::Scalar(self.reward)),
            ("agent_actions", RecordValue::Histogram(self.actions)),
        ])
    }
}
