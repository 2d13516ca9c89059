//! Scheduler engine — owns the repeating trigger and the control API.
//!
//! One `UpdateScheduler` per process, constructed by the application
//! container and injected wherever control is needed. Providers are built
//! per cycle through an injected factory so this crate never depends on
//! the concrete HTTP adapters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use gymscout_core::config::{ScheduleConfig, ScheduleConfigPatch};
use gymscout_core::traits::{GymStore, PlaceProvider, QueryPacer, StalenessOracle};
use gymscout_core::types::UpdateStrategy;

use crate::clock::{next_run_after, trigger_today};
use crate::cycle::{CycleOutcome, run_cycle};
use crate::timer::ArmedTimer;

/// Builds the provider set for a strategy. Injected by the binary
/// (wired to the HTTP adapters) or by tests (fakes).
pub type ProviderFactory =
    Arc<dyn Fn(UpdateStrategy) -> Vec<Arc<dyn PlaceProvider>> + Send + Sync>;

pub(crate) struct SchedulerInner {
    pub(crate) config: RwLock<ScheduleConfig>,
    pub(crate) is_running: AtomicBool,
    pub(crate) next_run_at: Mutex<Option<DateTime<Utc>>>,
    pub(crate) timer: Mutex<Option<ArmedTimer>>,
    pub(crate) store: Arc<dyn GymStore>,
    pub(crate) oracle: Arc<dyn StalenessOracle>,
    pub(crate) provider_factory: ProviderFactory,
    pub(crate) pacer: Arc<dyn QueryPacer>,
}

impl SchedulerInner {
    /// Recompute the next run and re-arm. Called after every cycle; the
    /// computed time is stored even when disarmed so `status()` stays
    /// truthful.
    pub(crate) fn reschedule(self: &Arc<Self>) {
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let next = next_run_after(Utc::now(), &config);
        *self.next_run_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(next);

        let mut slot = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = slot.take() {
            old.cancel();
        }
        if config.enabled {
            let inner = self.clone();
            *slot = Some(ArmedTimer::arm(next, move || async move {
                run_cycle(&inner).await;
            }));
            tracing::info!("⏰ Next update cycle scheduled for {next}");
        } else {
            tracing::info!("⏸️ Scheduler disabled, not re-arming (next would be {next})");
        }
    }
}

/// The process-wide update scheduler.
pub struct UpdateScheduler {
    inner: Arc<SchedulerInner>,
}

impl UpdateScheduler {
    pub fn new(
        config: ScheduleConfig,
        store: Arc<dyn GymStore>,
        oracle: Arc<dyn StalenessOracle>,
        provider_factory: ProviderFactory,
        pacer: Arc<dyn QueryPacer>,
    ) -> Self {
        let mut config = config;
        config.sanitize();
        Self {
            inner: Arc::new(SchedulerInner {
                config: RwLock::new(config),
                is_running: AtomicBool::new(false),
                next_run_at: Mutex::new(None),
                timer: Mutex::new(None),
                store,
                oracle,
                provider_factory,
                pacer,
            }),
        }
    }

    /// Arm the trigger. No-op when disabled or already armed. When today's
    /// trigger time already passed, a cycle runs immediately and its
    /// reschedule arms the next timer.
    pub fn start(&self) {
        let config = self.inner.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        if !config.enabled {
            tracing::info!("⏸️ Scheduler disabled by config, not starting");
            return;
        }
        if self.inner.timer.lock().unwrap_or_else(|e| e.into_inner()).is_some() {
            tracing::info!("⏰ Scheduler already armed, ignoring start");
            return;
        }

        let now = Utc::now();
        let today = trigger_today(now, &config);
        if today <= now {
            tracing::info!(
                "⏰ Trigger time {} already due today, running now",
                config.schedule_label()
            );
            *self.inner.next_run_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(now);
            let inner = self.inner.clone();
            tokio::spawn(async move {
                run_cycle(&inner).await;
            });
        } else {
            let inner = self.inner.clone();
            let timer = ArmedTimer::arm(today, move || async move {
                run_cycle(&inner).await;
            });
            *self.inner.next_run_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(today);
            *self.inner.timer.lock().unwrap_or_else(|e| e.into_inner()) = Some(timer);
            tracing::info!("⏰ Scheduler armed for {today}");
        }
    }

    /// Cancel the pending trigger. Idempotent; never touches an in-flight
    /// cycle.
    pub fn stop(&self) {
        let mut slot = self.inner.timer.lock().unwrap_or_else(|e| e.into_inner());
        match slot.take() {
            Some(timer) => {
                timer.cancel();
                *self.inner.next_run_at.lock().unwrap_or_else(|e| e.into_inner()) = None;
                tracing::info!("🛑 Scheduler stopped, pending trigger cancelled");
            }
            None => tracing::info!("🛑 Scheduler already stopped"),
        }
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Merge a partial config update; restarts the trigger when armed so
    /// the new schedule takes effect.
    pub fn update_config(&self, patch: &ScheduleConfigPatch) {
        let was_armed = self.inner.timer.lock().unwrap_or_else(|e| e.into_inner()).is_some();
        {
            let mut config = self.inner.config.write().unwrap_or_else(|e| e.into_inner());
            patch.apply(&mut config);
            tracing::info!(
                "🔧 Schedule config updated: {} every {}d (strategy {}, enabled {})",
                config.schedule_label(),
                config.interval_days,
                config.strategy(),
                config.enabled
            );
        }
        if was_armed {
            self.restart();
        }
    }

    /// Out-of-band cycle sharing the scheduled runs' guard. A strategy
    /// override is substituted for this cycle only and restored afterwards.
    pub async fn run_manual_update(
        &self,
        strategy_override: Option<UpdateStrategy>,
    ) -> CycleOutcome {
        let previous = strategy_override.map(|strategy| {
            let mut config = self.inner.config.write().unwrap_or_else(|e| e.into_inner());
            let previous = config.strategy();
            config.set_strategy(strategy);
            previous
        });

        tracing::info!(
            "🖐️ Manual update triggered{}",
            strategy_override
                .map(|s| format!(" (strategy override: {s})"))
                .unwrap_or_default()
        );
        let outcome = run_cycle(&self.inner).await;

        if let Some(previous) = previous {
            self.inner
                .config
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .set_strategy(previous);
        }
        outcome
    }

    pub fn status(&self) -> SchedulerStatus {
        let config = self.inner.config.read().unwrap_or_else(|e| e.into_inner());
        SchedulerStatus {
            enabled: config.enabled,
            strategy: config.strategy().to_string(),
            next_run: *self.inner.next_run_at.lock().unwrap_or_else(|e| e.into_inner()),
            is_running: self.inner.is_running.load(Ordering::SeqCst),
            schedule: config.schedule_label(),
            interval_days: config.interval_days,
        }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Arc<SchedulerInner> {
        &self.inner
    }
}

/// Snapshot returned by `status()`.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub enabled: bool,
    pub strategy: String,
    pub next_run: Option<DateTime<Utc>>,
    pub is_running: bool,
    /// "H:MM" trigger time.
    pub schedule: String,
    pub interval_days: i64,
}
