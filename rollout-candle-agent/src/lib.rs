//! RL learners implemented with [candle](https://crates.io/crates/candle-core).
//!
//! * [`ddpg::Ddpg`]: deep deterministic policy gradient for continuous actions.
//! * [`a2c::A2c`]: advantage actor-critic for discrete actions.
pub mod a2c;
pub mod ddpg;
pub mod mlp;
pub mod opt;
pub mod util;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl Device {
    /// Returns the first GPU if `cuda` is `true`, the CPU otherwise.
    pub fn from_cuda_flag(cuda: bool) -> Self {
        match cuda {
            true => Self::Cuda(0),
            false => Self::Cpu,
        }
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = anyhow::Error;

    /// Fails if the GPU is not available.
    fn try_from(device: Device) -> Result<Self> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => Ok(candle_core::Device::new_cuda(n)?),
        }
    }
}

/// Activation function of an output layer.
#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
pub enum Activation {
    /// No activation.
    None,

    /// Hyperbolic tangent.
    Tanh,
}

impl Activation {
    /// Applies the activation function.
    pub fn forward(&self, xs: &candle_core::Tensor) -> Result<candle_core::Tensor> {
        match self {
            Self::None => Ok(xs.clone()),
            Self::Tanh => Ok(xs.tanh()?),
        }
    }
}
