//! Owns the background game task and the start/stop lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use ninjabot_core::{GameState, Permissions};
use ninjabot_events::{ChatEvent, EventBus};
use ninjabot_infra::store::{load_running, save_running};
use ninjabot_infra::{GameStore, sync_permissions};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::phase::{HuntingPhase, ReactionPhase, SleepingPhase};
use crate::platform::ChatPlatform;
use crate::readiness::GuildReadiness;
use crate::results::process_results;

struct GameTask {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

struct Inner {
    config: GameConfig,
    store: Arc<dyn GameStore>,
    platform: Arc<dyn ChatPlatform>,
    bus: Arc<dyn EventBus<ChatEvent>>,
    readiness: GuildReadiness,
    permissions: Arc<AsyncMutex<Permissions>>,
    running: AtomicBool,
    state: watch::Sender<GameState>,
    task: Mutex<Option<GameTask>>,
    rng_seed: Option<u64>,
}

/// Handle to the game; cheap to clone.
#[derive(Clone)]
pub struct GameController {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for GameController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameController")
            .field("state", &self.state())
            .field("running", &self.inner.running.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl GameController {
    pub fn new(
        config: GameConfig,
        permissions: Permissions,
        store: Arc<dyn GameStore>,
        platform: Arc<dyn ChatPlatform>,
        bus: Arc<dyn EventBus<ChatEvent>>,
        readiness: GuildReadiness,
    ) -> Self {
        let (state, _) = watch::channel(GameState::NotRunning);
        Self {
            inner: Arc::new(Inner {
                config,
                store,
                platform,
                bus,
                readiness,
                permissions: Arc::new(AsyncMutex::new(permissions)),
                running: AtomicBool::new(false),
                state,
                task: Mutex::new(None),
                rng_seed: None,
            }),
        }
    }

    /// Fix the RNG seed of every game task; for deterministic tests.
    ///
    /// Must be called before the controller is shared.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.rng_seed = Some(seed);
        }
        self
    }

    /// In-process allow/deny lists, shared with permission commands.
    pub fn permissions(&self) -> Arc<AsyncMutex<Permissions>> {
        Arc::clone(&self.inner.permissions)
    }

    pub fn store(&self) -> Arc<dyn GameStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    pub fn state(&self) -> GameState {
        *self.inner.state.borrow()
    }

    /// Whether the game is meant to run and its task is alive.
    pub fn status(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst) && self.task_alive()
    }

    /// Spawn the game task at process start.
    ///
    /// The task waits for the guild to be ready, then restores the persisted
    /// `running` flag (or `auto_start` when none was stored).
    pub fn spawn(&self) {
        self.spawn_task(true);
    }

    pub async fn start(&self) -> GameResult<()> {
        if self.status() {
            return Err(GameError::AlreadyRunning);
        }
        self.inner.running.store(true, Ordering::SeqCst);
        // A stopped-but-finishing task from an earlier run is superseded.
        self.cancel_task().await;
        self.spawn_task(false);
        save_running(self.inner.store.as_ref(), true).await?;
        info!("game started");
        Ok(())
    }

    pub async fn stop(&self) -> GameResult<()> {
        if !self.inner.running.load(Ordering::SeqCst) && !self.task_alive() {
            return Err(GameError::NotRunning);
        }
        self.inner.running.store(false, Ordering::SeqCst);
        self.cancel_task().await;
        save_running(self.inner.store.as_ref(), false).await?;
        self.inner.set_state(GameState::NotRunning);
        info!("game stopped");
        Ok(())
    }

    /// Stop the task on process exit, leaving the persisted flag alone.
    pub async fn shutdown(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.cancel_task().await;
        self.inner.set_state(GameState::NotRunning);
    }

    fn task_alive(&self) -> bool {
        self.inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.join.is_finished())
    }

    fn spawn_task(&self, restore_running: bool) {
        let cancel = CancellationToken::new();
        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(run_game(inner, cancel.clone(), restore_running));

        let previous = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(GameTask { cancel, join });
        if let Some(previous) = previous {
            previous.cancel.cancel();
        }
    }

    /// Cancel the current task and wait until its phase has cleaned up.
    async fn cancel_task(&self) {
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.cancel.cancel();
            if let Err(err) = task.join.await {
                if err.is_panic() {
                    error!(error = %err, "game task panicked");
                }
            }
        }
    }
}

impl Inner {
    fn set_state(&self, state: GameState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            info!("game is now entering {state}");
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

async fn run_game(inner: Arc<Inner>, cancel: CancellationToken, restore_running: bool) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = inner.readiness.wait_ready() => {}
    }

    if restore_running {
        let running = match load_running(inner.store.as_ref()).await {
            Ok(Some(running)) => running,
            Ok(None) => inner.config.auto_start,
            Err(err) => {
                warn!(error = %err, "could not read persisted running flag, using auto_start");
                inner.config.auto_start
            }
        };
        inner.running.store(running, Ordering::SeqCst);
    }

    let mut rng = match inner.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    while inner.is_running() && !cancel.is_cancelled() {
        match run_round(&inner, &mut rng, &cancel).await {
            Ok(()) => {}
            Err(GameError::Cancelled) => break,
            Err(err) => error!(error = %err, "round failed"),
        }
    }

    inner.set_state(GameState::NotRunning);
    info!("the game loop has ended");
}

async fn run_round(inner: &Inner, rng: &mut StdRng, cancel: &CancellationToken) -> GameResult<()> {
    let config = &inner.config;

    inner.set_state(GameState::Sleeping);
    SleepingPhase::new(config.cooldown, config.max_time_jitter, rng)
        .run(cancel)
        .await?;
    if !inner.is_running() {
        return Ok(());
    }

    sync_permissions(inner.store.as_ref(), &mut *inner.permissions.lock().await).await?;

    let mut events = inner.bus.subscribe();
    inner.set_state(GameState::Hunting);
    let target = HuntingPhase::new(config, &inner.permissions)
        .run(&mut events, rng, cancel)
        .await?;
    drop(events);
    if !inner.is_running() {
        return Ok(());
    }

    let mut events = inner.bus.subscribe();
    inner.set_state(GameState::ActiveReaction);
    let round = ReactionPhase::new(config, inner.platform.as_ref(), target)
        .run(&mut events, rng, cancel)
        .await?;
    drop(events);

    process_results(inner.store.as_ref(), inner.platform.as_ref(), config, &round).await?;
    info!(awards = round.awards.len(), "finished round");
    Ok(())
}
