use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use rollout::{Problem, HPARAM_SETS, PROBLEMS};
use std::path::PathBuf;

/// Train RL agents on classic control problems
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the learner of a registered problem
    Train(TrainArgs),

    /// List registered problems and hyperparameter sets
    List,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Name of the problem
    #[arg(long)]
    problem: String,

    /// Name of the hyperparameter set, the problem's own set by default
    #[arg(long)]
    hparam_set: Option<String>,

    /// YAML file overriding hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Budget of environment steps
    #[arg(long)]
    num_total_steps: Option<usize>,

    /// Directory where the learner's parameters are saved
    #[arg(long)]
    save_dir: Option<String>,

    /// Directory under which a run directory for metrics is created
    #[arg(long)]
    log_dir: Option<String>,

    /// Use the first GPU
    #[arg(long, default_value_t = false)]
    cuda: bool,
}

fn train(args: TrainArgs) -> Result<()> {
    let problem = Problem::from_name(&args.problem)?;
    let mut hparams =
        rollout::resolve_hparams(problem, args.hparam_set.as_deref(), args.config.as_deref())?;

    if let Some(seed) = args.seed {
        hparams.seed = seed;
    }
    if let Some(n) = args.num_total_steps {
        hparams.num_total_steps = n;
    }
    if let Some(dir) = args.save_dir {
        hparams.save_dir = Some(dir);
    }
    if let Some(dir) = args.log_dir {
        hparams.log_dir = Some(rollout::run_dir(dir, problem));
    }
    if args.cuda {
        hparams.cuda = true;
    }

    let state = rollout::train(problem, hparams)?;
    info!(
        "Done: {} epochs, {} episodes, {} timesteps",
        state.epoch, state.n_episodes, state.n_timesteps
    );

    Ok(())
}

fn list() {
    println!("Problems:");
    for name in PROBLEMS {
        println!("  {}", name);
    }
    println!("Hyperparameter sets:");
    for name in HPARAM_SETS {
        println!("  {}", name);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train(args) => train(args)?,
        Command::List => list(),
    }

    Ok(())
}
