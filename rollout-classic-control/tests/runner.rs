use anyhow::Result;
use rollout_classic_control::{
    env_spec, ArrayObs, CartPole, ClassicControlConfig, ContinuousAct, DiscreteAct, Pendulum,
};
use rollout_core::{
    runner::{MultiEpisodeRunner, RunnerPool},
    Policy,
};
use test_log::test;

struct Alternate(usize);

impl Policy<CartPole> for Alternate {
    fn sample(&mut self, _obs: &ArrayObs) -> Result<DiscreteAct> {
        self.0 += 1;
        Ok(DiscreteAct(self.0 % 2))
    }
}

struct ZeroTorque;

impl Policy<Pendulum> for ZeroTorque {
    fn sample(&mut self, _obs: &ArrayObs) -> Result<ContinuousAct> {
        Ok(ContinuousAct(vec![0.0]))
    }
}

#[test]
fn test_pendulum_episodes_are_truncated_at_cap() -> Result<()> {
    let config = ClassicControlConfig::new("Pendulum-v0");
    let cap = env_spec("Pendulum-v0")?.max_episode_steps;
    let mut runner = MultiEpisodeRunner::<Pendulum>::build(&config, Some(cap), 3, 0)?;

    let mut n_steps = vec![0; 3];
    while runner.is_done().iter().any(|done| !done) {
        let histories = runner.run(&mut ZeroTorque, 64, true)?;
        for (n, h) in n_steps.iter_mut().zip(histories.iter()) {
            *n += h.len();
            if let Some(last) = h.transitions().last() {
                if last.is_done() {
                    assert!(last.is_truncated && !last.is_terminated);
                }
            }
        }
    }
    assert_eq!(n_steps, vec![cap; 3]);
    runner.stop()
}

#[test]
fn test_cartpole_instances_differ() -> Result<()> {
    let config = ClassicControlConfig::new("CartPole-v1");
    let mut runner = MultiEpisodeRunner::<CartPole>::build(&config, Some(500), 2, 1)?;
    let histories = runner.run(&mut Alternate(0), 1, true)?;
    assert_ne!(
        histories[0].transitions()[0].obs,
        histories[1].transitions()[0].obs
    );
    runner.stop()
}
