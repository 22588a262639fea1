use super::Transition;
use std::iter::FromIterator;

/// Transitions laid out as per-field arrays.
///
/// This is what a [`Learner`](crate::Learner) consumes in an optimization step.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch<O, A> {
    /// Observations.
    pub obs: Vec<O>,

    /// Actions.
    pub act: Vec<A>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Next observations.
    pub next_obs: Vec<O>,

    /// Termination flags.
    pub is_terminated: Vec<i8>,

    /// Truncation flags.
    pub is_truncated: Vec<i8>,

    /// `1` where the next transition in the batch does not follow from this one.
    ///
    /// Transitions pushed one by one each end their own segment. A window of
    /// consecutive steps of one instance, added with
    /// [`TransitionBatch::extend_segment`], ends only at its last transition.
    pub is_segment_end: Vec<i8>,
}

impl<O, A> TransitionBatch<O, A> {
    /// Creates an empty batch with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            next_obs: Vec::with_capacity(capacity),
            is_terminated: Vec::with_capacity(capacity),
            is_truncated: Vec::with_capacity(capacity),
            is_segment_end: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<O, A>) {
        self.obs.push(tr.obs);
        self.act.push(tr.act);
        self.reward.push(tr.reward);
        self.next_obs.push(tr.next_obs);
        self.is_terminated.push(tr.is_terminated as i8);
        self.is_truncated.push(tr.is_truncated as i8);
        self.is_segment_end.push(1);
    }

    /// Appends consecutive transitions of one trajectory as a single segment.
    pub fn extend_segment<I: IntoIterator<Item = Transition<O, A>>>(&mut self, segment: I) {
        let start = self.len();
        for tr in segment {
            self.push(tr);
        }
        let end = self.len();
        if end > start {
            for e in self.is_segment_end[start..end - 1].iter_mut() {
                *e = 0;
            }
        }
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch holds no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Unpack the data `(o_t, a_t, r_t, o_t+1, is_terminated_t, is_truncated_t)`.
    #[allow(clippy::type_complexity)]
    pub fn unpack(self) -> (Vec<O>, Vec<A>, Vec<f32>, Vec<O>, Vec<i8>, Vec<i8>) {
        (
            self.obs,
            self.act,
            self.reward,
            self.next_obs,
            self.is_terminated,
            self.is_truncated,
        )
    }
}

impl<O, A> FromIterator<Transition<O, A>> for TransitionBatch<O, A> {
    fn from_iter<I: IntoIterator<Item = Transition<O, A>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut batch = Self::with_capacity(iter.size_hint().0);
        for tr in iter {
            batch.push(tr);
        }
        batch
    }
}
