//! Tokio scheduler driving the monitoring loop.
//!
//! Ticks run one at a time on the blocking pool. A tick that overruns its
//! budget keeps running in the background while the scheduler skips later
//! ticks until it finishes, so two ticks never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::history::LogStore;
use super::monitor::MonitorLoop;
use crate::core::config::Config;

const DEFAULT_TICK_BUDGET: Duration = Duration::from_secs(10);

/// Periodic driver for a [`MonitorLoop`]
pub struct MonitorRuntime<S: LogStore + 'static> {
    monitor: Arc<Mutex<MonitorLoop<S>>>,
    config_tx: watch::Sender<Config>,
    config_rx: watch::Receiver<Config>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
    tick_budget: Duration,
}

/// Cloneable control surface for a running [`MonitorRuntime`]
#[derive(Clone)]
pub struct RuntimeHandle {
    config_tx: watch::Sender<Config>,
    shutdown_tx: broadcast::Sender<()>,
}

impl RuntimeHandle {
    /// Publish a new configuration, applied from the next tick on
    pub fn update_config(&self, config: Config) {
        self.config_tx.send_replace(config);
    }

    pub fn current_config(&self) -> Config {
        self.config_tx.borrow().clone()
    }

    pub fn shutdown(&self) {
        // Only fails when nothing is running any more
        let _ = self.shutdown_tx.send(());
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }
}

impl<S: LogStore + 'static> MonitorRuntime<S> {
    pub fn new(monitor: MonitorLoop<S>) -> Self {
        let (config_tx, config_rx) = watch::channel(monitor.config().clone());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        Self {
            monitor: Arc::new(Mutex::new(monitor)),
            config_tx,
            config_rx,
            shutdown_tx,
            shutdown_rx,
            tick_budget: DEFAULT_TICK_BUDGET,
        }
    }

    /// How long the scheduler waits for one tick before moving on
    pub fn with_tick_budget(mut self, budget: Duration) -> Self {
        self.tick_budget = budget;
        self
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            config_tx: self.config_tx.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    pub fn monitor(&self) -> Arc<Mutex<MonitorLoop<S>>> {
        Arc::clone(&self.monitor)
    }

    /// Run until a shutdown is signalled through a [`RuntimeHandle`]
    pub async fn run(self) {
        let mut config_rx = self.config_rx;
        let mut shutdown = self.shutdown_rx;
        let in_flight = Arc::new(AtomicBool::new(false));

        let mut period = config_rx.borrow_and_update().check_interval();
        let mut ticker = new_ticker(period);
        let mut pending: Option<Config> = None;

        log::info!("Monitoring started, sampling every {:?}", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(guard) = InFlight::try_acquire(&in_flight) else {
                        log::warn!("Previous tick still running, skipping this one");
                        continue;
                    };

                    let monitor = Arc::clone(&self.monitor);
                    let update = pending.take();
                    let job = tokio::task::spawn_blocking(move || {
                        let _guard = guard;
                        let mut monitor = monitor.lock();
                        if let Some(config) = update {
                            monitor.update_config(config);
                        }
                        monitor.tick(Utc::now())
                    });

                    match tokio::time::timeout(self.tick_budget, job).await {
                        Ok(Ok(report)) => {
                            log::debug!(
                                "Tick recorded {:?} with {} alert(s)",
                                report.record,
                                report.alerts.len()
                            );
                        }
                        Ok(Err(e)) => log::error!("Monitoring tick failed: {}", e),
                        Err(_) => log::warn!(
                            "Tick exceeded {:?}; later ticks are skipped until it completes",
                            self.tick_budget
                        ),
                    }
                }
                changed = config_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let config = config_rx.borrow_and_update().clone();
                    let next_period = config.check_interval();
                    if next_period != period {
                        log::info!("Check interval changed from {:?} to {:?}", period, next_period);
                        period = next_period;
                        ticker = new_ticker(period);
                    }
                    pending = Some(config);
                }
                _ = shutdown.recv() => {
                    log::info!("Monitoring stopped");
                    break;
                }
            }
        }
    }
}

/// First tick one full period from now; a late tick pushes the schedule back
fn new_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Single in-flight flag, released when the guard drops (including on panic)
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(InFlight(Arc::clone(flag)))
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
