//! Ornstein-Uhlenbeck exploration noise.
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

fn default_dt() -> f32 {
    1e-2
}

/// Configuration of [`OuNoise`].
///
/// `mu` and `sigma` are shared by all action dimensions.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct OuNoiseConfig {
    /// Long-run mean.
    pub mu: f32,

    /// Scale of the Gaussian perturbation.
    pub sigma: f32,

    /// Rate of mean reversion.
    pub theta: f32,

    /// Time step.
    #[serde(default = "default_dt")]
    pub dt: f32,
}

impl Default for OuNoiseConfig {
    fn default() -> Self {
        Self {
            mu: 0.0,
            sigma: 0.2,
            theta: 0.15,
            dt: default_dt(),
        }
    }
}

impl OuNoiseConfig {
    /// Sets the mean.
    pub fn mu(mut self, v: f32) -> Self {
        self.mu = v;
        self
    }

    /// Sets the scale.
    pub fn sigma(mut self, v: f32) -> Self {
        self.sigma = v;
        self
    }

    /// Sets the rate of mean reversion.
    pub fn theta(mut self, v: f32) -> Self {
        self.theta = v;
        self
    }

    /// Builds the noise process for actions with `dim` components.
    pub fn build(&self, dim: usize, seed: u64) -> OuNoise {
        OuNoise::new(
            vec![self.mu; dim],
            vec![self.sigma; dim],
            self.theta,
            self.dt,
            seed,
        )
    }
}

/// Ornstein-Uhlenbeck process `x += theta * (mu - x) * dt + sigma * sqrt(dt) * N(0, I)`.
///
/// The state starts at zero and returns to zero on [`OuNoise::reset`].
pub struct OuNoise {
    mu: Vec<f32>,
    sigma: Vec<f32>,
    theta: f32,
    dt: f32,
    state: Vec<f32>,
    rng: StdRng,
}

impl OuNoise {
    /// Constructs the process.
    pub fn new(mu: Vec<f32>, sigma: Vec<f32>, theta: f32, dt: f32, seed: u64) -> Self {
        assert_eq!(mu.len(), sigma.len());
        let state = vec![0.0; mu.len()];
        Self {
            mu,
            sigma,
            theta,
            dt,
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances the process by one step and returns the new state.
    pub fn sample(&mut self) -> &[f32] {
        let sqrt_dt = self.dt.sqrt();
        for j in 0..self.state.len() {
            let z = standard_normal(&mut self.rng);
            let x = self.state[j];
            self.state[j] = x + self.theta * (self.mu[j] - x) * self.dt + self.sigma[j] * sqrt_dt * z;
        }
        &self.state
    }

    /// Resets the state to zero.
    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Returns the current state.
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// Returns the number of components.
    pub fn dim(&self) -> usize {
        self.state.len()
    }
}

/// Box-Muller transform.
fn standard_normal(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_returns_to_zero() {
        let mut noise = OuNoiseConfig::default().build(2, 0);
        assert_eq!(noise.state(), &[0.0, 0.0]);
        for _ in 0..10 {
            noise.sample();
        }
        assert!(noise.state().iter().any(|x| *x != 0.0));
        noise.reset();
        assert_eq!(noise.state(), &[0.0, 0.0]);
    }

    #[test]
    fn test_same_seed_same_path() {
        let config = OuNoiseConfig::default().sigma(0.3);
        let mut n1 = config.build(3, 7);
        let mut n2 = config.build(3, 7);
        for _ in 0..20 {
            assert_eq!(n1.sample().to_vec(), n2.sample().to_vec());
        }
    }

    #[test]
    fn test_reverts_to_mean_without_perturbation() {
        let mut noise = OuNoise::new(vec![1.0], vec![0.0], 0.5, 1.0, 0);
        for _ in 0..50 {
            noise.sample();
        }
        assert!((noise.state()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = StdRng::seed_from_u64(1);
        let n = 20000;
        let xs: Vec<f32> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = xs.iter().sum::<f32>() / n as f32;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
    }
}
