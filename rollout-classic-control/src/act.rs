use rollout_core::Act;

/// Index of a discrete action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscreteAct(pub usize);

impl Act for DiscreteAct {
    fn to_vec_f32(&self) -> Vec<f32> {
        vec![self.0 as f32]
    }
}

impl From<usize> for DiscreteAct {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<DiscreteAct> for usize {
    fn from(act: DiscreteAct) -> Self {
        act.0
    }
}

/// Continuous action.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousAct(pub Vec<f32>);

impl Act for ContinuousAct {
    fn to_vec_f32(&self) -> Vec<f32> {
        self.0.clone()
    }
}

impl AsRef<[f32]> for ContinuousAct {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for ContinuousAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}
