// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The driver pool scheduler (spec §4.4) — the heart of this system.
//!
//! A single manager task is the sole mutator of scheduling decisions
//! (spec §4.4 "Concurrency architecture", §9 "Coroutine-heavy scheduler").
//! The idle/all worker sets live behind one `RwLock` so [`DriverPool::execute`]
//! has a true fast path (grab an idle worker under a short critical
//! section, spec §4.4 "Idle selection") without round-tripping through the
//! manager; everything that needs a *scheduling decision* — spawning,
//! scaling down, handing a freshly spawned worker to whichever client has
//! been waiting longest — goes through the manager's mailbox instead, so
//! that decision-making itself is never made by two tasks at once.

use crate::error::{ExecuteError, PoolError};
use crate::factory::WorkerFactory;
use crate::worker::PoolWorker;
use drv_core::WorkerId;
use drv_policy::ScalingPolicy;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

const MANAGER_MAILBOX: usize = 64;
const SPAWN_MAILBOX: usize = 16;
const INITIAL_SPAWN_BACKOFF: Duration = Duration::from_millis(100);
const MAX_SPAWN_BACKOFF: Duration = Duration::from_secs(10);
const MAX_CONSECUTIVE_SPAWN_FAILURES: u32 = 5;

/// Idle and all-known worker sets (spec §3 "Worker" invariants: a worker is
/// either idle or checked out, never both, never neither while alive).
struct Sets {
    idle: VecDeque<Arc<dyn PoolWorker>>,
    all: HashMap<WorkerId, Arc<dyn PoolWorker>>,
}

struct Counters {
    running: AtomicUsize,
    waiting: AtomicUsize,
    spawning: AtomicUsize,
    target: AtomicUsize,
    successes: AtomicU64,
    failures: AtomicU64,
    exits: AtomicU64,
}

impl Counters {
    fn new(initial_running: usize) -> Self {
        Self {
            running: AtomicUsize::new(initial_running),
            waiting: AtomicUsize::new(0),
            spawning: AtomicUsize::new(0),
            target: AtomicUsize::new(initial_running.max(1)),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            exits: AtomicU64::new(0),
        }
    }
}

/// Counter snapshot returned by [`DriverPool::state`] (spec §4.4 `State()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub wanted: usize,
    pub running: usize,
    pub waiting: usize,
    pub successes: u64,
    pub failures: u64,
    pub exits: u64,
}

/// A worker-count request/response pair or lifecycle event exchanged with
/// the manager task. One mailbox stands in for spec §4.4's named channel
/// family (`get`/`put`/`spawn`/`spawnErr`/`rescale`) — the manager remains
/// the sole mutator either way, and a single ordered mailbox is the more
/// idiomatic Rust shape for "one task owns this state."
enum ManagerMsg {
    Get(oneshot::Sender<Result<Arc<dyn PoolWorker>, PoolError>>),
    Put(Arc<dyn PoolWorker>),
    /// A checked-out worker failed its health gate and was already killed
    /// and removed by the caller; nudges the manager to reconsider scaling.
    Exited,
    SpawnOk(Arc<dyn PoolWorker>),
    SpawnErr(PoolError),
    Rescale,
}

/// Per-language elastic worker pool (spec §3 "DriverPool", §4.4).
pub struct DriverPool {
    sets: Arc<RwLock<Sets>>,
    counters: Arc<Counters>,
    manager_tx: mpsc::Sender<ManagerMsg>,
    cancel: CancellationToken,
    stopped: AtomicBool,
    tasks: Mutex<Option<(JoinHandle<()>, JoinHandle<()>, JoinHandle<()>)>>,
}

impl DriverPool {
    /// Spawns one worker synchronously so a broken factory fails `start`
    /// immediately (spec §4.4 "`Start(ctx)`"), then launches the manager,
    /// policy and spawner tasks.
    pub async fn start(
        factory: Arc<dyn WorkerFactory>,
        policy: Box<dyn ScalingPolicy>,
        tick: Duration,
    ) -> Result<Self, PoolError> {
        let first = factory.spawn().await?;

        let mut all = HashMap::new();
        all.insert(first.id(), Arc::clone(&first));
        let sets = Arc::new(RwLock::new(Sets { idle: VecDeque::from([first]), all }));
        let counters = Arc::new(Counters::new(1));
        let cancel = CancellationToken::new();

        let (manager_tx, manager_rx) = mpsc::channel(MANAGER_MAILBOX);
        let (spawn_tx, spawn_rx) = mpsc::channel(SPAWN_MAILBOX);
        let (fatal_tx, fatal_rx) = oneshot::channel();

        let manager_state = ManagerState {
            sets: Arc::clone(&sets),
            counters: Arc::clone(&counters),
            waiters: VecDeque::new(),
            spawn_tx: spawn_tx.clone(),
        };
        let manager_task =
            tokio::spawn(run_manager(manager_rx, manager_state, cancel.clone(), fatal_rx));
        let policy_task = tokio::spawn(run_policy(
            policy,
            Arc::clone(&counters),
            Arc::clone(&sets),
            manager_tx.clone(),
            cancel.clone(),
            tick,
        ));
        let spawner_task =
            tokio::spawn(run_spawner(factory, spawn_rx, manager_tx.clone(), fatal_tx, cancel.clone()));

        Ok(Self {
            sets,
            counters,
            manager_tx,
            cancel,
            stopped: AtomicBool::new(false),
            tasks: Mutex::new(Some((manager_task, policy_task, spawner_task))),
        })
    }

    /// Checks out an idle worker, runs `f` against it, returns the worker
    /// to the pool, and propagates `f`'s error (spec §4.4 `ExecuteCtx`).
    pub async fn execute<T, E, F, Fut>(&self, cancel: CancellationToken, f: F) -> Result<T, ExecuteError<E>>
    where
        E: std::fmt::Debug + std::fmt::Display,
        F: FnOnce(Arc<dyn PoolWorker>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let worker = self.checkout(&cancel).await.map_err(ExecuteError::Pool)?;
        let call_worker = Arc::clone(&worker);
        tokio::select! {
            res = f(call_worker) => {
                match &res {
                    Ok(_) => { self.counters.successes.fetch_add(1, Ordering::SeqCst); }
                    Err(_) => { self.counters.failures.fetch_add(1, Ordering::SeqCst); }
                }
                self.checkin(worker).await;
                res.map_err(ExecuteError::Fn)
            }
            _ = cancel.cancelled() => {
                self.checkin(worker).await;
                Err(ExecuteError::Pool(PoolError::Cancelled))
            }
        }
    }

    /// Fast path: grab an idle worker directly. Slow path: register as a
    /// waiter with the manager, which spawns if policy allows.
    async fn checkout(&self, cancel: &CancellationToken) -> Result<Arc<dyn PoolWorker>, PoolError> {
        if self.cancel.is_cancelled() {
            return Err(PoolError::Closed);
        }
        if let Some(worker) = self.sets.write().idle.pop_front() {
            return Ok(worker);
        }

        self.counters.waiting.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        let sent = self.manager_tx.send(ManagerMsg::Get(tx)).await.is_ok();
        let result = if !sent {
            Err(PoolError::Closed)
        } else {
            tokio::select! {
                res = rx => res.unwrap_or(Err(PoolError::Closed)),
                _ = cancel.cancelled() => Err(PoolError::Cancelled),
            }
        };
        self.counters.waiting.fetch_sub(1, Ordering::SeqCst);
        result
    }

    /// Health-gates a returned worker before it is made available again
    /// (spec §4.4 "Health gate on check-in").
    async fn checkin(&self, worker: Arc<dyn PoolWorker>) {
        let healthy = matches!(worker.status().await, drv_core::WorkerStatus::Running);
        if healthy {
            let _ = self.manager_tx.send(ManagerMsg::Put(worker)).await;
            return;
        }
        worker.kill().await;
        let id = worker.id();
        self.sets.write().all.remove(&id);
        self.counters.running.fetch_sub(1, Ordering::SeqCst);
        self.counters.exits.fetch_add(1, Ordering::SeqCst);
        let _ = self.manager_tx.send(ManagerMsg::Exited).await;
    }

    pub fn state(&self) -> PoolState {
        PoolState {
            wanted: self.counters.target.load(Ordering::SeqCst),
            running: self.counters.running.load(Ordering::SeqCst),
            waiting: self.counters.waiting.load(Ordering::SeqCst),
            successes: self.counters.successes.load(Ordering::SeqCst),
            failures: self.counters.failures.load(Ordering::SeqCst),
            exits: self.counters.exits.load(Ordering::SeqCst),
        }
    }

    /// Currently known workers, for introspection (spec §4.4 `Current()`).
    pub fn current(&self) -> Vec<Arc<dyn PoolWorker>> {
        self.sets.read().all.values().cloned().collect()
    }

    /// Drains and shuts the pool down. Idempotent: only the first call
    /// returns `Ok` (spec §8 "Round-trip / idempotence").
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), PoolError> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return Err(PoolError::Closed);
        }
        self.cancel.cancel();
        let tasks = self.tasks.lock().take();
        if let Some((manager, policy, spawner)) = tasks {
            let _ = tokio::join!(manager, policy, spawner);
        }
        info!("pool stopped");
        Ok(())
    }
}

/// State owned exclusively by the manager task.
struct ManagerState {
    sets: Arc<RwLock<Sets>>,
    counters: Arc<Counters>,
    waiters: VecDeque<oneshot::Sender<Result<Arc<dyn PoolWorker>, PoolError>>>,
    spawn_tx: mpsc::Sender<()>,
}

impl ManagerState {
    fn running(&self) -> i64 {
        self.counters.running.load(Ordering::SeqCst) as i64
    }

    fn target(&self) -> i64 {
        self.counters.target.load(Ordering::SeqCst) as i64
    }

    fn spawning(&self) -> i64 {
        self.counters.spawning.load(Ordering::SeqCst) as i64
    }

    /// Hands `worker` to the oldest waiter that hasn't cancelled, or
    /// returns it if there are none (spec §4.4 step 3: "re-idle it if the
    /// client cancelled meanwhile").
    fn serve_next_waiter(&mut self, worker: Arc<dyn PoolWorker>) -> Option<Arc<dyn PoolWorker>> {
        let mut worker = worker;
        while let Some(respond) = self.waiters.pop_front() {
            match respond.send(Ok(worker)) {
                Ok(()) => return None,
                Err(returned) => {
                    worker = returned.expect("serve_next_waiter only ever sends Ok");
                }
            }
        }
        Some(worker)
    }

    async fn kill_worker(&mut self, worker: Arc<dyn PoolWorker>) {
        worker.kill().await;
        let id = worker.id();
        self.sets.write().all.remove(&id);
        self.counters.running.fetch_sub(1, Ordering::SeqCst);
        self.counters.exits.fetch_add(1, Ordering::SeqCst);
    }

    /// Places a worker that has nowhere urgent to go: idle if we're at or
    /// under target, killed if we're over (spec §4.4 "scaleDown... if
    /// `dn == 0`... otherwise kill it").
    async fn settle(&mut self, worker: Arc<dyn PoolWorker>) {
        if let Some(worker) = self.serve_next_waiter(worker) {
            if self.target() - self.running() < 0 {
                self.kill_worker(worker).await;
            } else {
                self.sets.write().idle.push_back(worker);
            }
        }
    }

    async fn handle_get(&mut self, respond: oneshot::Sender<Result<Arc<dyn PoolWorker>, PoolError>>) {
        if let Some(worker) = self.sets.write().idle.pop_front() {
            let _ = respond.send(Ok(worker));
            return;
        }

        let mut dn = self.target() - self.running();
        // Never leave the pool unable to make progress (spec §4.4 step 2).
        if self.running() + self.spawning() == 0 && dn <= 0 {
            dn = 1;
        }

        self.waiters.push_back(respond);
        if dn > 0 {
            self.counters.spawning.fetch_add(1, Ordering::SeqCst);
            let _ = self.spawn_tx.send(()).await;
        }
        // dn <= 0 and the pool already has workers in flight: the waiter
        // stays queued until the next `Put`/`SpawnOk` resolves it.
    }

    async fn handle_put(&mut self, worker: Arc<dyn PoolWorker>) {
        self.settle(worker).await;
    }

    async fn handle_spawn_ok(&mut self, worker: Arc<dyn PoolWorker>) {
        self.counters.spawning.fetch_sub(1, Ordering::SeqCst);
        {
            let id = worker.id();
            self.sets.write().all.insert(id, Arc::clone(&worker));
        }
        self.counters.running.fetch_add(1, Ordering::SeqCst);
        self.settle(worker).await;
    }

    fn handle_spawn_err(&mut self, err: PoolError) {
        self.counters.spawning.fetch_sub(1, Ordering::SeqCst);
        self.counters.failures.fetch_add(1, Ordering::SeqCst);
        if let Some(respond) = self.waiters.pop_front() {
            let _ = respond.send(Err(err));
        }
    }

    async fn handle_exited(&mut self) {
        self.handle_rescale().await;
    }

    /// Standalone scaling pass, triggered by the policy task's `rescale`
    /// signal (spec §4.4 "Standalone scaling pass").
    async fn handle_rescale(&mut self) {
        let dn = self.target() - self.running();
        if dn > 0 {
            for _ in 0..dn {
                self.counters.spawning.fetch_add(1, Ordering::SeqCst);
                let _ = self.spawn_tx.send(()).await;
            }
        } else if dn < 0 {
            let mut remaining = (-dn) as usize;
            while remaining > 0 {
                let popped = self.sets.write().idle.pop_front();
                match popped {
                    Some(worker) => {
                        self.kill_worker(worker).await;
                        remaining -= 1;
                    }
                    // No idle worker to kill right now; the rest is
                    // handled opportunistically as checked-out workers
                    // are returned (spec §4.4 "prefer workers returned on
                    // `put`... if no returns arrive, kill from the idle
                    // set").
                    None => break,
                }
            }
        }
    }

    /// Fails every queued waiter and kills every idle worker, then waits
    /// for checked-out workers to trickle back in via `Put` so they can be
    /// killed too (spec §4.4 "Draining").
    async fn drain(&mut self, mut rx: mpsc::Receiver<ManagerMsg>) {
        while let Some(respond) = self.waiters.pop_front() {
            let _ = respond.send(Err(PoolError::Closed));
        }
        loop {
            let next = self.sets.write().idle.pop_front();
            match next {
                Some(worker) => self.kill_worker(worker).await,
                None => break,
            }
        }
        while self.counters.running.load(Ordering::SeqCst) > 0 {
            match rx.recv().await {
                Some(ManagerMsg::Put(worker)) => self.kill_worker(worker).await,
                Some(ManagerMsg::Get(respond)) => {
                    let _ = respond.send(Err(PoolError::Closed));
                }
                Some(ManagerMsg::SpawnOk(worker)) => {
                    self.counters.spawning.fetch_sub(1, Ordering::SeqCst);
                    self.kill_worker(worker).await;
                }
                Some(ManagerMsg::SpawnErr(_)) => {
                    self.counters.spawning.fetch_sub(1, Ordering::SeqCst);
                }
                Some(ManagerMsg::Exited | ManagerMsg::Rescale) | None => {
                    if self.counters.running.load(Ordering::SeqCst) == 0 {
                        break;
                    }
                }
            }
        }
    }
}

async fn run_manager(
    rx: mpsc::Receiver<ManagerMsg>,
    mut state: ManagerState,
    cancel: CancellationToken,
    mut fatal_rx: oneshot::Receiver<()>,
) {
    let mut rx = rx;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = &mut fatal_rx => {
                error!("spawner reported persistent failure; closing pool");
                cancel.cancel();
                break;
            }
            msg = rx.recv() => {
                match msg {
                    Some(ManagerMsg::Get(respond)) => state.handle_get(respond).await,
                    Some(ManagerMsg::Put(worker)) => state.handle_put(worker).await,
                    Some(ManagerMsg::Exited) => state.handle_exited().await,
                    Some(ManagerMsg::SpawnOk(worker)) => state.handle_spawn_ok(worker).await,
                    Some(ManagerMsg::SpawnErr(err)) => state.handle_spawn_err(err),
                    Some(ManagerMsg::Rescale) => state.handle_rescale().await,
                    None => break,
                }
            }
        }
    }
    state.drain(rx).await;
}

/// Ticks the scaling policy and pokes `rescale` when the target changes
/// (spec §4.3, §4.4 "policy goroutine").
async fn run_policy(
    mut policy: Box<dyn ScalingPolicy>,
    counters: Arc<Counters>,
    sets: Arc<RwLock<Sets>>,
    manager_tx: mpsc::Sender<ManagerMsg>,
    cancel: CancellationToken,
    tick: Duration,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(tick) => {}
        }
        let running = counters.running.load(Ordering::SeqCst);
        let idle = sets.read().idle.len();
        let waiting = counters.waiting.load(Ordering::SeqCst);
        let new_target = policy.scale(running, idle, waiting);
        let old_target = counters.target.swap(new_target, Ordering::SeqCst);
        if old_target != new_target {
            let _ = manager_tx.send(ManagerMsg::Rescale).await;
        }
    }
}

/// Turns `spawn` signals into new workers, retrying transient failures
/// with exponential backoff and escalating persistent failure to a fatal
/// signal the manager observes (spec §4.4 "spawner goroutine", §9 open
/// question (a)).
async fn run_spawner(
    factory: Arc<dyn WorkerFactory>,
    mut spawn_rx: mpsc::Receiver<()>,
    manager_tx: mpsc::Sender<ManagerMsg>,
    fatal_tx: oneshot::Sender<()>,
    cancel: CancellationToken,
) {
    let mut fatal_tx = Some(fatal_tx);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            signal = spawn_rx.recv() => {
                if signal.is_none() {
                    return;
                }
                let mut backoff = INITIAL_SPAWN_BACKOFF;
                let mut consecutive_failures = 0u32;
                loop {
                    match factory.spawn().await {
                        Ok(worker) => {
                            let _ = manager_tx.send(ManagerMsg::SpawnOk(worker)).await;
                            break;
                        }
                        Err(err) => {
                            consecutive_failures += 1;
                            warn!(%err, attempt = consecutive_failures, "driver spawn failed");
                            let _ = manager_tx.send(ManagerMsg::SpawnErr(err)).await;
                            if consecutive_failures >= MAX_CONSECUTIVE_SPAWN_FAILURES {
                                error!("spawner giving up after persistent failures");
                                if let Some(tx) = fatal_tx.take() {
                                    let _ = tx.send(());
                                }
                                return;
                            }
                            tokio::select! {
                                _ = cancel.cancelled() => return,
                                _ = tokio::time::sleep(backoff) => {}
                            }
                            backoff = (backoff * 2).min(MAX_SPAWN_BACKOFF);
                        }
                    }
                }
            }
        }
    }
}

/// A started [`DriverPool`] plus the handle types callers need; kept as a
/// thin alias so daemon-side code has one name to reach for.
pub type PoolHandle = Arc<DriverPool>;

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
