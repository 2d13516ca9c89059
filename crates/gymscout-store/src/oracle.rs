//! Staleness oracle — the cheap pre-run gate.
//!
//! A cycle only costs network traffic when at least one gym has not been
//! enriched within the freshness window. The reason string is logged by
//! the scheduler on every decision.

use async_trait::async_trait;
use chrono::Utc;

use gymscout_core::traits::StalenessOracle;
use gymscout_core::types::{GateDecision, GymRecord};

pub struct EnrichmentOracle {
    /// Records enriched within this many days count as fresh.
    max_age_days: i64,
}

impl EnrichmentOracle {
    pub fn new(max_age_days: i64) -> Self {
        Self {
            max_age_days: max_age_days.max(1),
        }
    }

    fn is_stale(&self, gym: &GymRecord) -> bool {
        match gym.enriched_at {
            None => true,
            Some(at) => Utc::now() - at > chrono::Duration::days(self.max_age_days),
        }
    }
}

#[async_trait]
impl StalenessOracle for EnrichmentOracle {
    async fn pre_run_check(&self, gyms: &[GymRecord]) -> GateDecision {
        if gyms.is_empty() {
            return GateDecision {
                should_run_update: false,
                reason: "no gyms to enrich".into(),
            };
        }

        let stale = gyms.iter().filter(|g| self.is_stale(g)).count();
        if stale > 0 {
            GateDecision {
                should_run_update: true,
                reason: format!(
                    "{stale} of {} gyms stale (older than {} days)",
                    gyms.len(),
                    self.max_age_days
                ),
            }
        } else {
            GateDecision {
                should_run_update: false,
                reason: format!(
                    "all {} gyms enriched within {} days",
                    gyms.len(),
                    self.max_age_days
                ),
            }
        }
    }

    async fn log_statistics(&self, gyms: &[GymRecord]) {
        let stale = gyms.iter().filter(|g| self.is_stale(g)).count();
        tracing::info!(
            "📈 Gym collection: {} total, {} fresh, {} pending enrichment",
            gyms.len(),
            gyms.len() - stale,
            stale
        );
    }
}
