//! Multilayer perceptron.
use crate::Activation;
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`].
pub struct MlpConfig {
    /// Input dimension.
    pub in_dim: usize,

    /// Units of the hidden layers.
    pub units: Vec<usize>,

    /// Output dimension.
    pub out_dim: usize,

    /// Activation of the output layer.
    pub activation_out: Activation,
}

impl MlpConfig {
    /// Creates configuration of MLP.
    pub fn new(in_dim: usize, units: Vec<usize>, out_dim: usize, activation_out: Activation) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
            activation_out,
        }
    }
}

/// Returns vector of linear modules from [`MlpConfig`].
fn create_linear_layers(vb: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let mut dims = vec![config.in_dim];
    dims.extend(config.units.iter());
    dims.push(config.out_dim);

    dims.windows(2)
        .enumerate()
        .map(|(i, w)| Ok(linear(w[0], w[1], vb.pp(format!("ln{}", i)))?))
        .collect()
}

/// Multilayer perceptron with ReLU activation function.
pub struct Mlp {
    layers: Vec<Linear>,
    activation_out: Activation,
}

impl Mlp {
    /// Builds the layers, registering their variables in `vb`.
    pub fn build(vb: VarBuilder, config: &MlpConfig) -> Result<Self> {
        Ok(Self {
            layers: create_linear_layers(vb, config)?,
            activation_out: config.activation_out,
        })
    }

    /// Maps `[batch_size, in_dim]` to `[batch_size, out_dim]`.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let n_layers = self.layers.len();
        let mut xs = xs.clone();
        for layer in self.layers[..n_layers - 1].iter() {
            xs = layer.forward(&xs)?.relu()?;
        }
        let xs = self.layers[n_layers - 1].forward(&xs)?;
        self.activation_out.forward(&xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_mlp_shapes_and_names() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let config = MlpConfig::new(3, vec![8, 8], 2, Activation::Tanh);
        let mlp = Mlp::build(vb.pp("actor"), &config)?;

        let xs = Tensor::ones((5, 3), DType::F32, &Device::Cpu)?;
        let ys = mlp.forward(&xs)?;
        assert_eq!(ys.dims(), &[5, 2]);
        let ys = ys.flatten_all()?.to_vec1::<f32>()?;
        assert!(ys.iter().all(|y| y.abs() <= 1.0));

        let data = varmap.data().lock().unwrap();
        assert_eq!(data.len(), 6);
        assert!(data.contains_key("actor.ln0.weight"));
        assert!(data.contains_key("actor.ln2.bias"));
        Ok(())
    }
}
