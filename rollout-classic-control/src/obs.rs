use rollout_core::Obs;

/// Observation as a flat array.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayObs(pub Vec<f32>);

impl Obs for ArrayObs {}

impl AsRef<[f32]> for ArrayObs {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for ArrayObs {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}
