//! Data model for the enrichment pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gym as persisted by the store. The pipeline reads every field and
/// writes back the enrichment subset (see [`GymUpdate`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub facilities: Option<String>,
    pub operating_hours: Option<String>,
    pub has_gx: bool,
    pub has_pt: bool,
    pub has_group_pt: bool,
    pub has_parking: bool,
    pub has_shower: bool,
    /// When this record was last enriched; drives the staleness oracle.
    pub enriched_at: Option<DateTime<Utc>>,
}

/// The subset of [`GymRecord`] fields an enrichment cycle writes back.
#[derive(Debug, Clone)]
pub struct GymUpdate {
    pub address: String,
    /// Written only when the winning candidate supplied one.
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub facilities: String,
    pub has_gx: bool,
    pub has_pt: bool,
    pub has_group_pt: bool,
    pub has_parking: bool,
    pub has_shower: bool,
}

/// One externally sourced guess at a gym's place data. Ephemeral — produced
/// and consumed within a single gym's resolution, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Which provider produced this candidate.
    pub source: String,
    /// Fixed per-source trust weight in [0, 1].
    pub confidence: f64,
}

/// Named pipeline variant selecting the provider set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStrategy {
    Enhanced,
    Basic,
    Multisource,
    Advanced,
}

impl UpdateStrategy {
    /// Parse a strategy name; unknown names fall back to `Enhanced`.
    pub fn parse_or_default(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "basic" => Self::Basic,
            "multisource" => Self::Multisource,
            "advanced" => Self::Advanced,
            "enhanced" => Self::Enhanced,
            other => {
                if !other.is_empty() {
                    tracing::warn!("Unknown strategy '{other}', using enhanced");
                }
                Self::Enhanced
            }
        }
    }
}

impl std::fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enhanced => write!(f, "enhanced"),
            Self::Basic => write!(f, "basic"),
            Self::Multisource => write!(f, "multisource"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Verdict from the pre-run gate.
#[derive(Debug, Clone)]
pub struct GateDecision {
    pub should_run_update: bool,
    pub reason: String,
}

/// Per-cycle counters. Logged at the end of every completed cycle,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCycleStats {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failed_names: Vec<String>,
}

impl UpdateCycleStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, gym_name: &str) {
        self.failure_count += 1;
        self.failed_names.push(gym_name.to_string());
    }

    pub fn success_rate(&self) -> f64 {
        let resolved = self.success_count + self.failure_count;
        if resolved == 0 {
            0.0
        } else {
            self.success_count as f64 / resolved as f64
        }
    }

    /// Emit the end-of-cycle summary.
    pub fn log_summary(&self) {
        tracing::info!(
            "📊 Cycle complete: {}/{} updated, {} unresolved ({:.0}% success)",
            self.success_count,
            self.total,
            self.failure_count,
            self.success_rate() * 100.0
        );
        if !self.failed_names.is_empty() {
            tracing::info!("❌ Unresolved gyms: {}", self.failed_names.join(", "));
        }
    }
}
