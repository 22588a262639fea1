use anyhow::Result;
use rollout::{
    hparams::{a2c_cartpole, ddpg_pendulum},
    HParams, Problem,
};
use std::{fs, path::Path};
use tempdir::TempDir;
use test_log::test;

fn has_event_file(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if name.to_string_lossy().starts_with("events.out.tfevents") {
            return Ok(true);
        }
    }
    Ok(false)
}

#[test]
fn test_ddpg_pendulum_smoke() -> Result<()> {
    let dir = TempDir::new("ddpg_pendulum")?;
    let save_dir = dir.path().join("model");
    let log_dir = dir.path().join("log");
    let hparams = HParams {
        num_processes: 2,
        rollout_steps: 2,
        max_episode_steps: Some(5),
        num_total_steps: 40,
        batch_size: 8,
        buffer_size: 100,
        hidden_units: vec![16, 16],
        save_interval: 5,
        save_dir: Some(save_dir.to_string_lossy().into_owned()),
        log_dir: Some(log_dir.to_string_lossy().into_owned()),
        ..ddpg_pendulum()
    };

    let state = rollout::train(Problem::DdpgPendulum, hparams.clone())?;

    // Windows of 2, 2 and 1 steps complete an episode of 5 steps every 3 epochs.
    assert_eq!(state.epoch, 10);
    assert_eq!(state.n_episodes, 6);
    assert_eq!(state.n_timesteps, 34);

    assert!(save_dir.join("actor.safetensors").is_file());
    assert!(save_dir.join("critic_tgt.safetensors").is_file());
    assert!(has_event_file(&log_dir)?);
    assert_eq!(HParams::load(log_dir.join("hparams.yaml"))?, hparams);
    Ok(())
}

#[test]
fn test_a2c_cartpole_smoke() -> Result<()> {
    let dir = TempDir::new("a2c_cartpole")?;
    let save_dir = dir.path().join("model");
    let log_dir = dir.path().join("log");
    let hparams = HParams {
        env: "CartPole-v1".into(),
        num_processes: 2,
        num_total_steps: 100,
        batch_size: 10,
        hidden_units: vec![16],
        save_interval: 5,
        save_dir: Some(save_dir.to_string_lossy().into_owned()),
        log_dir: Some(log_dir.to_string_lossy().into_owned()),
        ..a2c_cartpole()
    };

    let state = rollout::train(Problem::A2cCartPole, hparams)?;

    assert_eq!(state.epoch, 10);
    assert!(state.n_timesteps > 0 && state.n_timesteps <= 100);
    assert!(save_dir.join("a2c.safetensors").is_file());

    // The problem runs on CartPole-v0 whatever environment is requested.
    let saved = HParams::load(log_dir.join("hparams.yaml"))?;
    assert_eq!(saved.env, "CartPole-v0");
    assert_eq!(saved.batch_size, 10);
    Ok(())
}

#[test]
fn test_resolve_hparams_with_overrides() -> Result<()> {
    let dir = TempDir::new("resolve_hparams")?;
    let path = dir.path().join("overrides.yaml");
    fs::write(&path, "env: CartPole-v1\nnum_processes: 4\n")?;

    let problem = Problem::from_name("a2c-cartpole-v0")?;
    let hparams = rollout::resolve_hparams(problem, None, Some(&path))?;
    assert_eq!(hparams.num_processes, 4);
    assert_eq!(hparams.env, "CartPole-v0");

    let hparams = rollout::resolve_hparams(problem, Some("base_pg"), None)?;
    assert_eq!(hparams.hidden_units, vec![64, 64]);
    assert!(rollout::resolve_hparams(problem, Some("unknown"), None).is_err());
    Ok(())
}

#[test]
fn test_invalid_hparams_fail_before_training() -> Result<()> {
    let dir = TempDir::new("invalid")?;
    let log_dir = dir.path().join("log");
    let hparams = HParams {
        batch_size: 200_000,
        log_dir: Some(log_dir.to_string_lossy().into_owned()),
        ..ddpg_pendulum()
    };
    assert!(rollout::train(Problem::DdpgPendulum, hparams).is_err());
    assert!(!log_dir.exists());
    Ok(())
}

#[test]
fn test_run_dir_is_named_after_problem() {
    let dir = rollout::run_dir("/tmp/logs", Problem::DdpgPendulum);
    assert!(dir.starts_with("/tmp/logs/ddpg-pendulum-v0_"));
}
