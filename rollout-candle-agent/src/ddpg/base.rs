use super::DdpgConfig;
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::Optimizer,
    util::{self, not_terminated, stack_f32, track},
    Activation,
};
use anyhow::{bail, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use log::{info, trace};
use rollout_core::{
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Env, Learner, OuNoise, Policy, Space,
};
use std::{fs, marker::PhantomData, path::Path};

/// A network and its variables.
struct Network {
    varmap: VarMap,
    mlp: Mlp,
}

impl Network {
    fn build(config: &MlpConfig, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let mlp = Mlp::build(vb.pp("mlp"), config)?;
        Ok(Self { varmap, mlp })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.mlp.forward(xs)
    }
}

/// DDPG learner.
///
/// Checkpoints are written as `actor.safetensors`, `actor_tgt.safetensors`,
/// `critic.safetensors` and `critic_tgt.safetensors`.
pub struct Ddpg<E: Env> {
    actor: Network,
    actor_tgt: Network,
    critic: Network,
    critic_tgt: Network,
    actor_opt: Optimizer,
    critic_opt: Optimizer,
    noise: OuNoise,
    low: Vec<f32>,
    high: Vec<f32>,
    gamma: f64,
    tau: f64,
    train: bool,
    n_opts: usize,
    device: Device,
    phantom: PhantomData<E>,
}

impl<E> Ddpg<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: AsRef<[f32]> + From<Vec<f32>>,
{
    /// Constructs the learner for the given spaces.
    ///
    /// The target networks start as copies of the online networks.
    pub fn build(config: DdpgConfig, obs_space: &Space, act_space: &Space) -> Result<Self> {
        let (low, high) = match act_space {
            Space::Box { low, high } => (low.clone(), high.clone()),
            Space::Discrete { .. } => bail!("DDPG requires a box action space"),
        };
        let device = Device::try_from(config.device)?;
        let obs_dim = obs_space.flat_dim();
        let act_dim = low.len();

        let actor_config = MlpConfig::new(
            obs_dim,
            config.hidden_units.clone(),
            act_dim,
            Activation::Tanh,
        );
        let critic_config = MlpConfig::new(
            obs_dim + act_dim,
            config.hidden_units.clone(),
            1,
            Activation::None,
        );
        let actor = Network::build(&actor_config, &device)?;
        let actor_tgt = Network::build(&actor_config, &device)?;
        let critic = Network::build(&critic_config, &device)?;
        let critic_tgt = Network::build(&critic_config, &device)?;
        track(&actor_tgt.varmap, &actor.varmap, 1.0)?;
        track(&critic_tgt.varmap, &critic.varmap, 1.0)?;

        let actor_opt = config.actor_opt_config.build(actor.varmap.all_vars())?;
        let critic_opt = config.critic_opt_config.build(critic.varmap.all_vars())?;
        info!(
            "Built DDPG learner: obs_dim = {}, act_dim = {}, device = {:?}",
            obs_dim, act_dim, config.device
        );

        Ok(Self {
            actor,
            actor_tgt,
            critic,
            critic_tgt,
            actor_opt,
            critic_opt,
            noise: config.noise.build(act_dim, config.seed),
            low,
            high,
            gamma: config.gamma,
            tau: config.tau,
            train: true,
            n_opts: 0,
            device,
            phantom: PhantomData,
        })
    }

    /// Returns the number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Maps `[-1, 1]` to the bounds of the action space.
    fn scale(&self, u: &[f32]) -> Vec<f32> {
        u.iter()
            .zip(self.low.iter().zip(self.high.iter()))
            .map(|(u, (l, h))| l + (u + 1.0) * 0.5 * (h - l))
            .collect()
    }

    /// Maps the bounds of the action space to `[-1, 1]`.
    fn unscale(&self, a: &[f32]) -> Vec<f32> {
        a.iter()
            .zip(self.low.iter().zip(self.high.iter()))
            .map(|(a, (l, h))| 2.0 * (a - l) / (h - l) - 1.0)
            .collect()
    }

    fn update_critic(
        &mut self,
        obs: &Tensor,
        act: &Tensor,
        reward: &Tensor,
        next_obs: &Tensor,
        not_terminated: &Tensor,
    ) -> Result<f32> {
        let tgt = {
            let next_act = self.actor_tgt.forward(next_obs)?;
            let next_q = self
                .critic_tgt
                .forward(&Tensor::cat(&[next_obs, &next_act], D::Minus1)?)?
                .squeeze(D::Minus1)?;
            (reward + (next_q * not_terminated)?.affine(self.gamma, 0.0)?)?
        }
        .detach();

        let q = self
            .critic
            .forward(&Tensor::cat(&[obs, act], D::Minus1)?)?
            .squeeze(D::Minus1)?;
        let loss = mse(&q, &tgt)?;
        self.critic_opt.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn update_actor(&mut self, obs: &Tensor) -> Result<f32> {
        let act = self.actor.forward(obs)?;
        let q = self
            .critic
            .forward(&Tensor::cat(&[obs, &act], D::Minus1)?)?;
        let loss = q.mean_all()?.neg()?;
        self.actor_opt.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn soft_update(&mut self) -> Result<()> {
        track(&self.actor_tgt.varmap, &self.actor.varmap, self.tau)?;
        track(&self.critic_tgt.varmap, &self.critic.varmap, self.tau)?;
        Ok(())
    }
}

impl<E> Policy<E> for Ddpg<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: AsRef<[f32]> + From<Vec<f32>>,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let obs = stack_f32(&[obs.as_ref()], &self.device)?;
        let u = self.actor.forward(&obs)?.squeeze(0)?.to_vec1::<f32>()?;
        let u = match self.train {
            true => u
                .iter()
                .zip(self.noise.sample())
                .map(|(u, n)| (u + n).clamp(-1.0, 1.0))
                .collect(),
            false => u,
        };
        Ok(self.scale(&u).into())
    }
}

impl<E> Learner<E> for Ddpg<E>
where
    E: Env,
    E::Obs: AsRef<[f32]>,
    E::Act: AsRef<[f32]> + From<Vec<f32>>,
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
        let (obs, act, reward, next_obs, is_terminated, _) = batch.unpack();
        let act = act
            .iter()
            .map(|a| self.unscale(a.as_ref()))
            .collect::<Vec<_>>();

        let obs = stack_f32(&obs, &self.device)?;
        let act = stack_f32(&act, &self.device)?;
        let reward = util::reward(reward, &self.device)?;
        let next_obs = stack_f32(&next_obs, &self.device)?;
        let not_terminated = not_terminated(&is_terminated, &self.device)?;

        trace!("update_critic()");
        let loss_critic = self.update_critic(&obs, &act, &reward, &next_obs, &not_terminated)?;

        trace!("update_actor()");
        let loss_actor = self.update_actor(&obs)?;

        trace!("soft_update()");
        self.soft_update()?;
        self.n_opts += 1;

        Ok(Record::from_slice(&[
            ("loss_critic", RecordValue::Scalar(loss_critic)),
            ("loss_actor", RecordValue::Scalar(loss_actor)),
        ]))
    }

    fn reset(&mut self) {
        self.noise.reset();
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.actor.varmap.save(path.join("actor.safetensors"))?;
        self.actor_tgt.varmap.save(path.join("actor_tgt.safetensors"))?;
        self.critic.varmap.save(path.join("critic.safetensors"))?;
        self.critic_tgt
            .varmap
            .save(path.join("critic_tgt.safetensors"))?;
        info!("Saved DDPG parameters in {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.actor.varmap.load(path.join("actor.safetensors"))?;
        self.actor_tgt.varmap.load(path.join("actor_tgt.safetensors"))?;
        self.critic.varmap.load(path.join("critic.safetensors"))?;
        self.critic_tgt
            .varmap
            .load(path.join("critic_tgt.safetensors"))?;
        info!("Loaded DDPG parameters from {:?}", path);
        Ok(())
    }
}
