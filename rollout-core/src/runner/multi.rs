use super::{EpisodeRunner, History, RunnerPool};
use crate::{error::RolloutError, replay_buffer::Transition, Env, Policy};
use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::thread::JoinHandle;

enum Command<A> {
    Step(A),
    Reset,
    Stop,
}

enum Reply<O, A> {
    Obs(O),
    Transition(Transition<O, A>),
}

/// Channels and thread handle of a worker owning one instance.
struct Worker<O, A> {
    sender: Sender<Command<A>>,
    receiver: Receiver<Result<Reply<O, A>>>,
    handle: Option<JoinHandle<()>>,
}

/// Steps environment instances in parallel, one worker thread per instance.
///
/// Each worker builds and owns an [`EpisodeRunner`]. Actions are selected on
/// the calling thread in instance order, sent to the workers of all running
/// instances, and the resulting transitions are collected before the next
/// step of the window starts.
pub struct MultiEpisodeRunner<E: Env> {
    workers: Vec<Worker<E::Obs, E::Act>>,
    obs: Vec<E::Obs>,
    is_done: Vec<bool>,
}

impl<E> MultiEpisodeRunner<E>
where
    E: Env + 'static,
    E::Config: Send + 'static,
{
    /// Spawns `n_runners` workers and waits until all of them started their first episode.
    pub fn build(
        config: &E::Config,
        max_episode_steps: Option<usize>,
        n_runners: usize,
        base_seed: u64,
    ) -> Result<Self> {
        if n_runners == 0 {
            return Err(RolloutError::InvalidConfig("n_runners must be positive".into()).into());
        }

        let mut workers = Vec::with_capacity(n_runners);
        for ix in 0..n_runners {
            let (cmd_sender, cmd_receiver) = unbounded();
            let (reply_sender, reply_receiver) = unbounded();
            let config = config.clone();
            let handle = std::thread::spawn(move || {
                Self::run_worker(config, ix, max_episode_steps, base_seed, cmd_receiver, reply_sender);
            });
            workers.push(Worker {
                sender: cmd_sender,
                receiver: reply_receiver,
                handle: Some(handle),
            });
        }

        let mut runner = Self {
            workers,
            obs: Vec::with_capacity(n_runners),
            is_done: vec![false; n_runners],
        };
        for ix in 0..n_runners {
            let obs = runner.recv_obs(ix)?;
            runner.obs.push(obs);
        }
        info!("Started {} runner workers", n_runners);

        Ok(runner)
    }

    fn run_worker(
        config: E::Config,
        ix: usize,
        max_episode_steps: Option<usize>,
        base_seed: u64,
        receiver: Receiver<Command<E::Act>>,
        sender: Sender<Result<Reply<E::Obs, E::Act>>>,
    ) {
        let mut runner = match EpisodeRunner::<E>::build(&config, ix, max_episode_steps, base_seed) {
            Ok(runner) => runner,
            Err(e) => {
                let _ = sender.send(Err(e));
                return;
            }
        };
        if sender.send(Ok(Reply::Obs(runner.obs().clone()))).is_err() {
            return;
        }

        while let Ok(cmd) = receiver.recv() {
            let reply = match cmd {
                Command::Step(act) => runner.step(act).map(Reply::Transition),
                Command::Reset => runner.reset_episode().map(|obs| Reply::Obs(obs.clone())),
                Command::Stop => break,
            };
            if sender.send(reply).is_err() {
                break;
            }
        }
        debug!("Runner worker {} stopped", ix);
    }

    fn send(&self, ix: usize, cmd: Command<E::Act>) -> Result<()> {
        self.workers[ix]
            .sender
            .send(cmd)
            .map_err(|_| RolloutError::WorkerDisconnected(ix).into())
    }

    fn recv(&self, ix: usize) -> Result<Reply<E::Obs, E::Act>> {
        self.workers[ix]
            .receiver
            .recv()
            .map_err(|_| RolloutError::WorkerDisconnected(ix))?
    }

    fn recv_obs(&self, ix: usize) -> Result<E::Obs> {
        match self.recv(ix)? {
            Reply::Obs(obs) => Ok(obs),
            Reply::Transition(_) => Err(RolloutError::WorkerDisconnected(ix).into()),
        }
    }

    fn recv_transition(&self, ix: usize) -> Result<Transition<E::Obs, E::Act>> {
        match self.recv(ix)? {
            Reply::Transition(tr) => Ok(tr),
            Reply::Obs(_) => Err(RolloutError::WorkerDisconnected(ix).into()),
        }
    }
}

impl<E> RunnerPool<E> for MultiEpisodeRunner<E>
where
    E: Env + 'static,
    E::Config: Send + 'static,
{
    fn run<P: Policy<E>>(
        &mut self,
        policy: &mut P,
        steps: usize,
        store: bool,
    ) -> Result<Vec<History<E::Obs, E::Act>>> {
        let n = self.workers.len();
        let mut histories: Vec<_> = (0..n).map(|_| History::new(store)).collect();

        for _ in 0..steps {
            let active: Vec<usize> = (0..n).filter(|&ix| !self.is_done[ix]).collect();
            if active.is_empty() {
                break;
            }

            let acts = active
                .iter()
                .map(|&ix| policy.sample(&self.obs[ix]))
                .collect::<Result<Vec<_>>>()?;
            for (&ix, act) in active.iter().zip(acts) {
                self.send(ix, Command::Step(act))?;
            }

            for &ix in active.iter() {
                let tr = self.recv_transition(ix)?;
                self.obs[ix] = tr.next_obs.clone();
                self.is_done[ix] = tr.is_done();
                histories[ix].push(tr);
            }
        }

        Ok(histories)
    }

    fn is_done(&self) -> Vec<bool> {
        self.is_done.clone()
    }

    fn reset(&mut self, ix: usize) -> Result<()> {
        if ix >= self.workers.len() {
            return Err(RolloutError::InvalidRunnerIndex(ix).into());
        }
        self.send(ix, Command::Reset)?;
        self.obs[ix] = self.recv_obs(ix)?;
        self.is_done[ix] = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        for worker in self.workers.iter() {
            // A worker that already hung up has nothing left to stop.
            let _ = worker.sender.send(Command::Stop);
        }
        for (ix, worker) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = worker.handle.take() {
                handle
                    .join()
                    .map_err(|_| RolloutError::WorkerDisconnected(ix))?;
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.workers.len()
    }
}

impl<E: Env> Drop for MultiEpisodeRunner<E> {
    fn drop(&mut self) {
        for worker in self.workers.iter() {
            let _ = worker.sender.send(Command::Stop);
        }
        for worker in self.workers.iter_mut() {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}
