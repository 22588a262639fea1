//! Training experiments on classic control problems.
//!
//! A [`Problem`] pairs an environment family with a learner. Hyperparameters
//! come from a named set (see [`hparams`]), optionally overridden by a YAML
//! file and command line options.
//!
//! ```no_run
//! use rollout::{hparam_set, Problem};
//!
//! let problem = Problem::from_name("ddpg-pendulum-v0").unwrap();
//! let hparams = hparam_set(problem.default_hparam_set()).unwrap();
//! let state = rollout::train(problem, hparams).unwrap();
//! println!("{} episodes", state.n_episodes);
//! ```
pub mod hparams;
mod problem;
use anyhow::Result;
use chrono::Local;
use log::info;
use rollout_core::TrainerState;
use std::{fs, path::Path};

pub use hparams::{hparam_set, HParams, HPARAM_SETS};
pub use problem::{Problem, PROBLEMS};

/// Returns the hyperparameters of `problem`.
///
/// `hparam_set` defaults to the problem's own set. Fields in the YAML file at
/// `config` override those of the set.
pub fn resolve_hparams(
    problem: Problem,
    hparam_set: Option<&str>,
    config: Option<&Path>,
) -> Result<HParams> {
    let name = hparam_set.unwrap_or(problem.default_hparam_set());
    let hparams = hparams::hparam_set(name)?;
    let hparams = match config {
        Some(path) => hparams.override_with(path)?,
        None => hparams,
    };
    Ok(problem.configure(hparams))
}

/// Returns a directory under `log_dir` named after the problem and the current time.
pub fn run_dir(log_dir: impl AsRef<Path>, problem: Problem) -> String {
    let name = format!("{}_{}", problem.name(), Local::now().format("%Y%m%d-%H%M%S"));
    log_dir.as_ref().join(name).to_string_lossy().into_owned()
}

/// Trains the learner of `problem`.
///
/// The resolved hyperparameters are saved as `hparams.yaml` in `log_dir` when it is set.
pub fn train(problem: Problem, hparams: HParams) -> Result<TrainerState> {
    let hparams = problem.configure(hparams);
    hparams.validate()?;

    if let Some(log_dir) = &hparams.log_dir {
        fs::create_dir_all(log_dir)?;
        hparams.save(Path::new(log_dir).join("hparams.yaml"))?;
        info!("Logging to {}", log_dir);
    }

    problem.run(&hparams)
}
