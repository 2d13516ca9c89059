//! One enrichment cycle: gate check → search → merge → apply → stats.
//!
//! Failure policy: a gym without a surviving candidate is reported and the
//! cycle continues; a store or other cycle-level error aborts the cycle as
//! a whole but is caught here — nothing escapes, and the scheduler always
//! reschedules.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use gymscout_core::error::Result;
use gymscout_core::types::{UpdateCycleStats, UpdateStrategy};
use gymscout_search::{MultiSourceSearch, merge};

use crate::applier::apply_update;
use crate::engine::SchedulerInner;

/// What became of one triggered cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Ran to completion over the whole gym collection.
    Completed(UpdateCycleStats),
    /// The pre-run gate said the data is still fresh.
    SkippedByGate,
    /// Another cycle was already running.
    Skipped,
    /// A cycle-level error aborted the pass.
    Failed,
}

/// Run one cycle under the process-wide mutual-exclusion guard.
pub(crate) async fn run_cycle(inner: &Arc<SchedulerInner>) -> CycleOutcome {
    if inner
        .is_running
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        tracing::info!("⏭️ Update cycle already running, skipping this trigger");
        return CycleOutcome::Skipped;
    }

    let started = Instant::now();
    let strategy = inner.config.read().unwrap_or_else(|e| e.into_inner()).strategy();
    tracing::info!("🏋️ Update cycle starting (strategy: {strategy})");

    let outcome = match execute(inner, strategy).await {
        Ok(outcome) => {
            tracing::info!("🏁 Update cycle finished in {:.1?}", started.elapsed());
            outcome
        }
        Err(e) => {
            tracing::error!("💥 Update cycle failed after {:.1?}: {e}", started.elapsed());
            CycleOutcome::Failed
        }
    };

    // Always runs: clear the guard, then reschedule. Liveness is never
    // sacrificed to cycle failure.
    inner.is_running.store(false, Ordering::SeqCst);
    inner.reschedule();
    outcome
}

async fn execute(inner: &Arc<SchedulerInner>, strategy: UpdateStrategy) -> Result<CycleOutcome> {
    // One acquisition per cycle; dropped on every exit path below. The
    // applier mutates this snapshot in step with the store, so the closing
    // statistics describe the collection as the pass left it.
    let mut gyms = inner.store.find_all().await?;

    let gate = inner.oracle.pre_run_check(&gyms).await;
    tracing::info!("🚪 Pre-run gate: run={} ({})", gate.should_run_update, gate.reason);
    if !gate.should_run_update {
        inner.oracle.log_statistics(&gyms).await;
        return Ok(CycleOutcome::SkippedByGate);
    }

    inner.oracle.log_statistics(&gyms).await;

    let providers = (inner.provider_factory)(strategy);
    let search = MultiSourceSearch::new(providers, inner.pacer.clone());
    let mut stats = UpdateCycleStats::new(gyms.len());

    for gym in &mut gyms {
        let candidates = search.collect(&gym.name).await;
        match merge(candidates) {
            Some(winner) => {
                apply_update(inner.store.as_ref(), gym, &winner).await?;
                stats.record_success();
            }
            None => {
                tracing::info!("❌ No surviving candidate for '{}'", gym.name);
                stats.record_failure(&gym.name);
            }
        }
    }

    inner.oracle.log_statistics(&gyms).await;
    stats.log_summary();
    Ok(CycleOutcome::Completed(stats))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    use gymscout_core::config::ScheduleConfig;
    use gymscout_core::error::GymScoutError;
    use gymscout_core::traits::{GymStore, PlaceProvider, StalenessOracle};
    use gymscout_core::types::{GateDecision, GymRecord, GymUpdate, SearchCandidate};
    use gymscout_search::NoopPacer;

    use crate::engine::ProviderFactory;

    pub(crate) fn gym(id: i64, name: &str) -> GymRecord {
        GymRecord {
            id,
            name: name.into(),
            address: "(주소 미상)".into(),
            phone: None,
            latitude: 0.0,
            longitude: 0.0,
            facilities: None,
            operating_hours: None,
            has_gx: false,
            has_pt: false,
            has_group_pt: false,
            has_parking: false,
            has_shower: false,
            enriched_at: None,
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeStore {
        pub(crate) gyms: Mutex<Vec<GymRecord>>,
        pub(crate) updates: Mutex<Vec<(i64, GymUpdate)>>,
        pub(crate) fail_find: AtomicBool,
        find_calls: AtomicUsize,
    }

    impl FakeStore {
        pub(crate) fn with_gyms(gyms: Vec<GymRecord>) -> Self {
            Self {
                gyms: Mutex::new(gyms),
                ..Self::default()
            }
        }

        pub(crate) fn find_all_calls(&self) -> usize {
            self.find_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GymStore for FakeStore {
        async fn find_all(&self) -> gymscout_core::error::Result<Vec<GymRecord>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_find.load(Ordering::SeqCst) {
                return Err(GymScoutError::Store("connection refused".into()));
            }
            Ok(self.gyms.lock().unwrap().clone())
        }

        async fn update(&self, id: i64, update: &GymUpdate) -> gymscout_core::error::Result<()> {
            self.updates.lock().unwrap().push((id, update.clone()));
            Ok(())
        }
    }

    pub(crate) struct FakeOracle {
        allow: bool,
        reason: &'static str,
        pub(crate) stats_calls: AtomicUsize,
        /// Count of never-enriched gyms seen by each log_statistics call.
        pub(crate) pending_seen: Mutex<Vec<usize>>,
    }

    impl FakeOracle {
        pub(crate) fn allow() -> Self {
            Self {
                allow: true,
                reason: "data is stale",
                stats_calls: AtomicUsize::new(0),
                pending_seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn deny() -> Self {
            Self {
                allow: false,
                reason: "all gyms fresh",
                stats_calls: AtomicUsize::new(0),
                pending_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StalenessOracle for FakeOracle {
        async fn pre_run_check(&self, _gyms: &[GymRecord]) -> GateDecision {
            GateDecision {
                should_run_update: self.allow,
                reason: self.reason.into(),
            }
        }

        async fn log_statistics(&self, gyms: &[GymRecord]) {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            self.pending_seen
                .lock()
                .unwrap()
                .push(gyms.iter().filter(|g| g.enriched_at.is_none()).count());
        }
    }

    /// Provider returning its candidates for queries containing the hit key.
    pub(crate) struct FakeProvider {
        name: &'static str,
        confidence: f64,
        hits: Vec<(&'static str, SearchCandidate)>,
    }

    impl FakeProvider {
        pub(crate) fn new(
            name: &'static str,
            confidence: f64,
            hits: Vec<(&'static str, SearchCandidate)>,
        ) -> Self {
            Self {
                name,
                confidence,
                hits,
            }
        }
    }

    #[async_trait]
    impl PlaceProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn confidence(&self) -> f64 {
            self.confidence
        }

        async fn search(&self, query: &str) -> Vec<SearchCandidate> {
            self.hits
                .iter()
                .filter(|(key, _)| query.contains(key))
                .map(|(_, candidate)| candidate.clone())
                .collect()
        }
    }

    pub(crate) fn candidate(
        name: &str,
        address: &str,
        source: &str,
        confidence: f64,
        latitude: f64,
    ) -> SearchCandidate {
        SearchCandidate {
            name: name.into(),
            address: address.into(),
            phone: None,
            latitude,
            longitude: 127.0,
            source: source.into(),
            confidence,
        }
    }

    pub(crate) fn noop_factory() -> ProviderFactory {
        Arc::new(|_| Vec::new())
    }

    fn inner_with(
        store: Arc<FakeStore>,
        oracle: Arc<FakeOracle>,
        factory: ProviderFactory,
    ) -> Arc<SchedulerInner> {
        Arc::new(SchedulerInner {
            config: std::sync::RwLock::new(ScheduleConfig::default()),
            is_running: AtomicBool::new(false),
            next_run_at: Mutex::new(None),
            timer: Mutex::new(None),
            store,
            oracle,
            provider_factory: factory,
            pacer: Arc::new(NoopPacer),
        })
    }

    #[tokio::test]
    async fn test_end_to_end_three_gyms() {
        let store = Arc::new(FakeStore::with_gyms(vec![
            gym(1, "파워짐"),
            gym(2, "바디채널"),
            gym(3, "유령헬스장"),
        ]));
        let oracle = Arc::new(FakeOracle::allow());

        // provider A: 0.9 hit for gym1 only
        // provider B: 0.55 hit for gym2 + duplicate-keyed 0.5 hit for gym1
        let factory: ProviderFactory = Arc::new(|_| {
            vec![
                Arc::new(FakeProvider::new(
                    "a",
                    0.9,
                    vec![("파워짐", candidate("파워짐", "주소A", "a", 0.9, 1.0))],
                )) as Arc<dyn PlaceProvider>,
                Arc::new(FakeProvider::new(
                    "b",
                    0.55,
                    vec![
                        ("바디채널", candidate("바디채널", "주소B", "b", 0.55, 2.0)),
                        ("파워짐", candidate("파워짐", "주소A", "b", 0.5, 3.0)),
                    ],
                )),
            ]
        });

        let inner = inner_with(store.clone(), oracle, factory);
        let outcome = run_cycle(&inner).await;

        let CycleOutcome::Completed(stats) = outcome else {
            panic!("expected completed cycle, got {outcome:?}");
        };
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.failed_names, vec!["유령헬스장"]);

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        // gym1 won by the 0.9 record, not the duplicate-keyed 0.5 one
        let gym1 = updates.iter().find(|(id, _)| *id == 1).unwrap();
        assert_eq!(gym1.1.latitude, 1.0);
        let gym2 = updates.iter().find(|(id, _)| *id == 2).unwrap();
        assert_eq!(gym2.1.latitude, 2.0);
    }

    #[tokio::test]
    async fn test_exclusivity_updated_or_reported() {
        let store = Arc::new(FakeStore::with_gyms(vec![gym(1, "파워짐"), gym(2, "고스트")]));
        let factory: ProviderFactory = Arc::new(|_| {
            vec![Arc::new(FakeProvider::new(
                "a",
                0.9,
                vec![("파워짐", candidate("파워짐", "주소A", "a", 0.9, 1.0))],
            )) as Arc<dyn PlaceProvider>]
        });
        let inner = inner_with(store.clone(), Arc::new(FakeOracle::allow()), factory);

        let CycleOutcome::Completed(stats) = run_cycle(&inner).await else {
            panic!("expected completed cycle");
        };

        let updates = store.updates.lock().unwrap();
        for g in store.gyms.lock().unwrap().iter() {
            let updated = updates.iter().any(|(id, _)| *id == g.id);
            let reported = stats.failed_names.contains(&g.name);
            assert!(updated != reported, "gym '{}' must be exactly one of updated/reported", g.name);
        }
    }

    #[tokio::test]
    async fn test_gate_skip_emits_stats_and_reschedules() {
        let store = Arc::new(FakeStore::with_gyms(vec![gym(1, "파워짐")]));
        let oracle = Arc::new(FakeOracle::deny());
        let inner = inner_with(store.clone(), oracle.clone(), noop_factory());

        let outcome = run_cycle(&inner).await;
        assert_eq!(outcome, CycleOutcome::SkippedByGate);
        // no updates, but stats still emitted and a next run armed
        assert!(store.updates.lock().unwrap().is_empty());
        assert_eq!(oracle.stats_calls.load(Ordering::SeqCst), 1);
        assert!(inner.next_run_at.lock().unwrap().unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn test_closing_stats_see_the_applied_updates() {
        let store = Arc::new(FakeStore::with_gyms(vec![gym(1, "파워짐")]));
        let oracle = Arc::new(FakeOracle::allow());
        let factory: ProviderFactory = Arc::new(|_| {
            vec![Arc::new(FakeProvider::new(
                "a",
                0.9,
                vec![("파워짐", candidate("파워짐", "주소A", "a", 0.9, 1.0))],
            )) as Arc<dyn PlaceProvider>]
        });
        let inner = inner_with(store, oracle.clone(), factory);

        let CycleOutcome::Completed(_) = run_cycle(&inner).await else {
            panic!("expected completed cycle");
        };
        // one never-enriched gym before the pass, none after it
        assert_eq!(*oracle.pending_seen.lock().unwrap(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_liveness_across_consecutive_failures() {
        let store = Arc::new(FakeStore::default());
        store.fail_find.store(true, Ordering::SeqCst);
        let inner = inner_with(store, Arc::new(FakeOracle::allow()), noop_factory());

        for _ in 0..3 {
            let before = Utc::now();
            let outcome = run_cycle(&inner).await;
            assert_eq!(outcome, CycleOutcome::Failed);
            // guard released and next run strictly after the failure
            assert!(!inner.is_running.load(Ordering::SeqCst));
            assert!(inner.next_run_at.lock().unwrap().unwrap() > before);
        }
    }

    #[tokio::test]
    async fn test_contended_cycle_is_skipped() {
        let inner = inner_with(
            Arc::new(FakeStore::default()),
            Arc::new(FakeOracle::allow()),
            noop_factory(),
        );
        inner.is_running.store(true, Ordering::SeqCst);

        assert_eq!(run_cycle(&inner).await, CycleOutcome::Skipped);
        // the skipped trigger must not clear the running cycle's guard
        assert!(inner.is_running.load(Ordering::SeqCst));
    }
}
