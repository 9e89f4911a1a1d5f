//! Periodic refresh of the status and task regions.
//!
//! At most one cycle is in flight at a time. A periodic tick that lands on
//! a busy scheduler is dropped; a manual trigger is remembered and runs as
//! a single follow-up as soon as the current cycle settles. `stop()` bumps
//! the generation, so a cycle already waiting on the network finishes its
//! requests but never touches the screen.

mod cancellation;


pub use cancellation::CancellationToken;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use ultima_types::{FetchError, DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_TASK_WINDOW};

use crate::api::OrchestratorApi;
use crate::screen::{ActivityLevel, Screen, SharedScreen};
use crate::view::render_cycle;

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// How many tasks the task region shows.
    pub task_window: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            task_window: DEFAULT_TASK_WINDOW,
        }
    }
}

struct Inner {
    api: Arc<dyn OrchestratorApi>,
    screen: SharedScreen,
    config: SchedulerConfig,
    running: AtomicBool,
    in_flight: AtomicBool,
    rerun_requested: AtomicBool,
    cycles: AtomicU64,
    epoch: watch::Sender<u64>,
}

#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<Inner>,
}

/// The part of the scheduler other components are allowed to drive.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Arc<Inner>,
}

impl RefreshScheduler {
    pub fn new(api: Arc<dyn OrchestratorApi>, screen: SharedScreen, config: SchedulerConfig) -> Self {
        let (epoch, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                api,
                screen,
                config,
                running: AtomicBool::new(false),
                in_flight: AtomicBool::new(false),
                rerun_requested: AtomicBool::new(false),
                cycles: AtomicU64::new(0),
                epoch,
            }),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: self.inner.clone(),
        }
    }

    /// Starts the cadence; the first cycle runs immediately, or right after
    /// a cycle left over from before a restart settles. No-op when already
    /// running.
    pub fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("Refresh scheduler already running");
            return;
        }
        info!(
            "Starting refresh scheduler (every {} ms)",
            self.inner.config.interval.as_millis()
        );
        let token = self.inner.token();
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.run_ticker(token).await });
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn trigger_once(&self) {
        self.inner.trigger_once();
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Cycles whose results reached the screen.
    pub fn cycles_completed(&self) -> u64 {
        self.inner.cycles.load(Ordering::SeqCst)
    }
}

impl SchedulerHandle {
    pub fn trigger_once(&self) {
        self.inner.trigger_once();
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}

impl Inner {
    fn token(&self) -> CancellationToken {
        CancellationToken::new(self.epoch.subscribe())
    }

    fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.rerun_requested.store(false, Ordering::SeqCst);
        self.epoch.send_modify(|epoch| *epoch += 1);
        info!("Refresh scheduler stopped");
    }

    fn trigger_once(self: &Arc<Self>) {
        if !self.running.load(Ordering::SeqCst) {
            debug!("Ignoring refresh trigger while stopped");
            return;
        }
        if !self.begin_cycle(self.token()) {
            debug!("Refresh in flight, queueing one follow-up");
            self.rerun_requested.store(true, Ordering::SeqCst);
        }
    }

    async fn run_ticker(self: Arc<Self>, mut token: CancellationToken) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first_tick = true;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    if std::mem::take(&mut first_tick) {
                        // A cycle from before a restart may still hold the slot.
                        self.trigger_once();
                    } else if !self.begin_cycle(token.clone()) {
                        debug!("Refresh still in flight, skipping tick");
                    }
                }
            }
        }
        debug!("Refresh ticker exited");
    }

    /// Claims the in-flight slot and runs the cycle on its own task so a
    /// later `stop()` cannot drop requests half way.
    fn begin_cycle(self: &Arc<Self>, token: CancellationToken) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        let inner = self.clone();
        tokio::spawn(async move { inner.run_cycles(token).await });
        true
    }

    async fn run_cycles(self: Arc<Self>, token: CancellationToken) {
        loop {
            self.run_cycle(&token).await;
            if token.is_cancelled() || !self.rerun_requested.swap(false, Ordering::SeqCst) {
                break;
            }
        }
        self.in_flight.store(false, Ordering::SeqCst);

        // A trigger may have queued a rerun between the last check and the release.
        if self.running.load(Ordering::SeqCst) && self.rerun_requested.swap(false, Ordering::SeqCst) {
            self.begin_cycle(self.token());
        }
    }

    async fn run_cycle(&self, token: &CancellationToken) {
        let (status, tasks) = tokio::join!(self.api.fetch_status(), self.api.fetch_tasks());

        if token.is_cancelled() {
            debug!("Scheduler stopped during refresh, discarding results");
            return;
        }
        let cycle = render_cycle(&status, &tasks, self.config.task_window);

        let mut screen = self.screen.write().await;
        if token.is_cancelled() {
            return;
        }
        screen.apply_cycle(cycle);
        report_failures(&mut screen, &[("Status", status.err()), ("Task list", tasks.err())]);
        drop(screen);

        self.cycles.fetch_add(1, Ordering::SeqCst);
    }
}

/// Every failed fetch of a cycle goes into a single activity entry.
fn report_failures(screen: &mut Screen, failures: &[(&str, Option<FetchError>)]) {
    let parts: Vec<String> = failures
        .iter()
        .filter_map(|(what, err)| err.as_ref().map(|e| (what, e)))
        .map(|(what, err)| {
            warn!("{} refresh failed: {}", what, err);
            format!("{} refresh failed: {}", what, err.placeholder())
        })
        .collect();
    if !parts.is_empty() {
        screen.add_activity(ActivityLevel::Warn, &parts.join("; "));
    }
}
