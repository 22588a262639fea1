//! Observation and action spaces.
use serde::{Deserialize, Serialize};

/// Descriptor of a set of valid observations or actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Space {
    /// Integers `0..n`.
    Discrete {
        /// The number of elements.
        n: usize,
    },

    /// A box in `R^d` with per-dimension bounds.
    Box {
        /// Lower bounds.
        low: Vec<f32>,

        /// Upper bounds.
        high: Vec<f32>,
    },
}

impl Space {
    /// Returns the shape of an element of the space.
    ///
    /// A discrete space has scalar elements, hence an empty shape.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Discrete { .. } => vec![],
            Self::Box { low, .. } => vec![low.len()],
        }
    }

    /// Returns the number of floats needed to represent an element.
    pub fn flat_dim(&self) -> usize {
        self.shape().iter().product()
    }

    /// Returns the number of elements of a discrete space.
    pub fn n(&self) -> Option<usize> {
        match self {
            Self::Discrete { n } => Some(*n),
            Self::Box { .. } => None,
        }
    }

    /// Returns `true` for a box space.
    pub fn is_box(&self) -> bool {
        matches!(self, Self::Box { .. })
    }

    /// Checks if `x` is an element of the space.
    ///
    /// For a discrete space, `x` must hold a single non-negative integer value.
    pub fn contains(&self, x: &[f32]) -> bool {
        match self {
            Self::Discrete { n } => {
                x.len() == 1 && x[0] >= 0.0 && x[0].fract() == 0.0 && (x[0] as usize) < *n
            }
            Self::Box { low, high } => {
                x.len() == low.len()
                    && x.iter()
                        .zip(low.iter().zip(high.iter()))
                        .all(|(v, (l, h))| l <= v && v <= h)
            }
        }
    }
}
