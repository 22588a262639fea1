use anyhow::Result;
use rollout_candle_agent::ddpg::{Ddpg, DdpgConfig};
use rollout_classic_control::{get_gym_spaces, ArrayObs, ClassicControlConfig, Pendulum};
use rollout_core::{
    replay_buffer::TransitionBatch,
    runner::{EpisodeRunner, RunnerPool},
    Learner, Policy,
};
use tempdir::TempDir;
use test_log::test;

fn ddpg() -> Result<Ddpg<Pendulum>> {
    let (obs_space, act_space) = get_gym_spaces("Pendulum-v0")?;
    let config = DdpgConfig::default().hidden_units(vec![16, 16]).tau(0.1);
    Ddpg::build(config, &obs_space, &act_space)
}

fn observations() -> Vec<ArrayObs> {
    (0..20)
        .map(|i| {
            let th = i as f32 * 0.3;
            ArrayObs(vec![th.cos(), th.sin(), i as f32 * 0.4 - 4.0])
        })
        .collect()
}

#[test]
fn test_actions_within_bounds() -> Result<()> {
    let mut agent = ddpg()?;
    for mode in [true, false] {
        match mode {
            true => agent.train(),
            false => agent.eval(),
        }
        for obs in observations() {
            let act = agent.sample(&obs)?;
            assert_eq!(act.0.len(), 1);
            assert!(act.0[0] >= -2.0 && act.0[0] <= 2.0);
        }
    }
    Ok(())
}

#[test]
fn test_learn_returns_finite_losses() -> Result<()> {
    let mut agent = ddpg()?;
    let config = ClassicControlConfig::new("Pendulum-v0");
    let mut runner = EpisodeRunner::<Pendulum>::build(&config, 0, Some(200), 3)?;
    let history = runner.run(&mut agent, 32, true)?.remove(0);
    assert_eq!(history.len(), 32);

    let batch: TransitionBatch<_, _> = history.into_transitions().into_iter().collect();
    let record = agent.learn(batch)?;
    assert!(record.get_scalar("loss_critic")?.is_finite());
    assert!(record.get_scalar("loss_actor")?.is_finite());
    assert_eq!(agent.n_opts(), 1);
    Ok(())
}

#[test]
fn test_save_and_load_params() -> Result<()> {
    let dir = TempDir::new("ddpg")?;
    let path = dir.path().join("model");

    let mut agent = ddpg()?;
    agent.save_params(&path)?;
    for name in [
        "actor.safetensors",
        "actor_tgt.safetensors",
        "critic.safetensors",
        "critic_tgt.safetensors",
    ] {
        assert!(path.join(name).is_file());
    }

    let mut agent_ = ddpg()?;
    agent_.load_params(&path)?;
    agent.eval();
    agent_.eval();
    for obs in observations() {
        assert_eq!(agent.sample(&obs)?, agent_.sample(&obs)?);
    }
    Ok(())
}

#[test]
fn test_discrete_action_space_is_rejected() -> Result<()> {
    let (obs_space, _) = get_gym_spaces("Pendulum-v0")?;
    let (_, act_space) = get_gym_spaces("CartPole-v0")?;
    assert!(Ddpg::<Pendulum>::build(DdpgConfig::default(), &obs_space, &act_space).is_err());
    Ok(())
}
