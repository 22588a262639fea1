use super::A2cConfig;
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::Optimizer,
    util::stack_f32,
    Activation,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{
    ops::{log_softmax, softmax},
    VarBuilder, VarMap,
};
use log::{info, trace};
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, SeedableRng};
use rollout_core::{
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Env, Learner, Policy, Space,
};
use std::{fs, marker::PhantomData, path::Path};

/// A2C learner.
///
/// Parameters are saved in a single file, `a2c.safetensors`.
pub struct A2c<E: Env> {
    varmap: VarMap,
    policy: Mlp,
    value: Mlp,
    opt: Optimizer,
    gamma: f64,
    lmbda: f64,
    alpha: f64,
    beta: f64,
    train: bool,
    n_opts: usize,
    rng: StdRng,
    device: Device,
    phantom: PhantomData<E>,
}

impl<E> A2c<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<usize> + Into<usize> + Clone,
{
    /// Constructs the learner for the given spaces.
    pub fn build(config: A2cConfig, obs_space: &Space, act_space: &Space) -> Result<Self> {
        let n_actions = act_space
            .n()
            .context("A2C requires a discrete action space")?;
        let device = Device::try_from(config.device)?;
        let obs_dim = obs_space.flat_dim();

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let policy = Mlp::build(
            vb.pp("pi"),
            &MlpConfig::new(obs_dim, config.hidden_units.clone(), n_actions, Activation::None),
        )?;
        let value = Mlp::build(
            vb.pp("v"),
            &MlpConfig::new(obs_dim, config.hidden_units.clone(), 1, Activation::None),
        )?;
        let opt = config.opt_config.build(varmap.all_vars())?;
        info!(
            "Built A2C learner: obs_dim = {}, n_actions = {}, device = {:?}",
            obs_dim, n_actions, config.device
        );

        Ok(Self {
            varmap,
            policy,
            value,
            opt,
            gamma: config.gamma,
            lmbda: config.lmbda,
            alpha: config.alpha,
            beta: config.beta,
            train: true,
            n_opts: 0,
            rng: StdRng::seed_from_u64(config.seed),
            device,
            phantom: PhantomData,
        })
    }

    /// Returns the number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Returns action probabilities for a single observation.
    pub fn action_probs(&self, obs: &E::Obs) -> Result<Vec<f32>> {
        let obs = stack_f32(&[obs.as_ref()], &self.device)?;
        let logits = self.policy.forward(&obs)?;
        Ok(softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?)
    }
}

fn argmax(xs: &[f32]) -> usize {
    xs.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(ix, max), (i, &x)| match x > max {
            true => (i, x),
            false => (ix, max),
        })
        .0
}

/// Generalized advantage estimates of a batch of segments.
///
/// Computed backward, the estimate of a transition accumulates the TD errors
/// that follow it until its episode terminates or its segment ends.
fn gae(
    reward: &[f32],
    v: &[f32],
    next_v: &[f32],
    is_terminated: &[i8],
    is_segment_end: &[i8],
    gamma: f32,
    lmbda: f32,
) -> Vec<f32> {
    let mut adv = vec![0f32; reward.len()];
    let mut acc = 0f32;
    for t in (0..reward.len()).rev() {
        let not_terminated = 1.0 - is_terminated[t] as f32;
        let delta = reward[t] + gamma * not_terminated * next_v[t] - v[t];
        acc = match is_terminated[t] == 1 || is_segment_end[t] == 1 {
            true => delta,
            false => delta + gamma * lmbda * acc,
        };
        adv[t] = acc;
    }
    adv
}

impl<E> Policy<E> for A2c<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<usize> + Into<usize> + Clone,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let probs = self.action_probs(obs)?;
        let a = match self.train {
            true => WeightedIndex::new(&probs)?.sample(&mut self.rng),
            false => argmax(&probs),
        };
        Ok(a.into())
    }
}

impl<E> Learner<E> for A2c<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: From<usize> + Into<usize> + Clone,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn learn(&mut self, batch: TransitionBatch<E::Obs, E::Act>) -> Result<Record> {
        let is_segment_end = batch.is_segment_end.clone();
        let (obs, act, reward, next_obs, is_terminated, is_truncated) = batch.unpack();
        let batch_size = act.len();
        let act = act
            .into_iter()
            .map(|a| Into::<usize>::into(a) as u32)
            .collect::<Vec<_>>();

        // Truncation also cuts the accumulation.
        let is_segment_end = is_segment_end
            .iter()
            .zip(is_truncated.iter())
            .map(|(e, t)| *e.max(t))
            .collect::<Vec<_>>();

        let obs = stack_f32(&obs, &self.device)?;
        let act = Tensor::from_vec(act, (batch_size, 1), &self.device)?;
        let next_obs = stack_f32(&next_obs, &self.device)?;

        trace!("forward()");
        let log_probs = log_softmax(&self.policy.forward(&obs)?, D::Minus1)?;
        let entropy = (log_probs.exp()? * &log_probs)?
            .sum(D::Minus1)?
            .neg()?
            .mean_all()?;
        let log_prob_act = log_probs.gather(&act, D::Minus1)?.squeeze(D::Minus1)?;
        let v = self.value.forward(&obs)?.squeeze(D::Minus1)?;
        let next_v = self.value.forward(&next_obs)?.squeeze(D::Minus1)?;

        let adv = gae(
            &reward,
            &v.to_vec1::<f32>()?,
            &next_v.to_vec1::<f32>()?,
            &is_terminated,
            &is_segment_end,
            self.gamma as f32,
            self.lmbda as f32,
        );
        let adv = Tensor::from_vec(adv, (batch_size,), &self.device)?;
        let ret = (&adv + v.detach())?;

        let loss_critic = (ret - &v)?.sqr()?.mean_all()?;
        let loss_actor = (log_prob_act * adv)?.mean_all()?.neg()?;
        let loss = ((&loss_actor + loss_critic.affine(self.alpha, 0.0)?)?
            - entropy.affine(self.beta, 0.0)?)?;

        trace!("backward_step()");
        self.opt.backward_step(&loss)?;
        self.n_opts += 1;

        Ok(Record::from_slice(&[
            ("loss_actor", RecordValue::Scalar(loss_actor.to_scalar::<f32>()?)),
            ("loss_critic", RecordValue::Scalar(loss_critic.to_scalar::<f32>()?)),
            ("entropy", RecordValue::Scalar(entropy.to_scalar::<f32>()?)),
        ]))
    }

    fn reset(&mut self) {}

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.varmap.save(path.join("a2c.safetensors"))?;
        info!("Saved A2C parameters in {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.varmap.load(path.join("a2c.safetensors"))?;
        info!("Loaded A2C parameters from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{argmax, gae};

    fn assert_close(xs: &[f32], ys: &[f32]) {
        assert_eq!(xs.len(), ys.len());
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((x - y).abs() < 1e-6, "{:?} != {:?}", xs, ys);
        }
    }

    #[test]
    fn test_gae_over_one_segment() {
        let reward = [1.0, 1.0, 1.0];
        let v = [1.0, 2.0, 3.0];
        let next_v = [2.0, 3.0, 4.0];
        let is_segment_end = [0, 0, 1];

        // TD errors are 1.0, 0.5 and 0.0.
        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &is_segment_end, 0.5, 1.0);
        assert_close(&adv, &[1.25, 0.5, 0.0]);

        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &is_segment_end, 0.5, 0.5);
        assert_close(&adv, &[1.125, 0.5, 0.0]);

        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &is_segment_end, 0.5, 0.0);
        assert_close(&adv, &[1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_gae_stops_at_termination() {
        let reward = [1.0, 1.0, 1.0];
        let v = [1.0, 2.0, 3.0];
        let next_v = [2.0, 3.0, 4.0];

        // The terminal transition does not bootstrap from its next state.
        let adv = gae(&reward, &v, &next_v, &[0, 1, 0], &[0, 0, 1], 0.5, 1.0);
        assert_close(&adv, &[0.5, -1.0, 0.0]);
    }

    #[test]
    fn test_gae_does_not_cross_segments() {
        let reward = [1.0, 1.0, 1.0];
        let v = [1.0, 2.0, 3.0];
        let next_v = [2.0, 3.0, 6.0];

        // TD errors are 1.0, 0.5 and 1.0.
        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &[0, 0, 1], 0.5, 1.0);
        assert_close(&adv, &[1.5, 1.0, 1.0]);

        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &[0, 1, 1], 0.5, 1.0);
        assert_close(&adv, &[1.25, 0.5, 1.0]);

        // Single-transition segments reduce to the TD errors.
        let adv = gae(&reward, &v, &next_v, &[0, 0, 0], &[1, 1, 1], 0.5, 1.0);
        assert_close(&adv, &[1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
