//! Collaborator traits consumed by the pipeline.
//!
//! The scheduler and search engine only ever see these traits; the binary
//! wires in the SQLite store and the real HTTP providers, tests wire fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GateDecision, GymRecord, GymUpdate, SearchCandidate};

/// Gym persistence. Acquired once per cycle via `find_all`, written through
/// `update` for each gym that resolved.
#[async_trait]
pub trait GymStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<GymRecord>>;
    async fn update(&self, id: i64, update: &GymUpdate) -> Result<()>;
}

/// Cheap staleness check consulted before any network fan-out, plus the
/// statistics hook emitted around (and instead of) a cycle.
#[async_trait]
pub trait StalenessOracle: Send + Sync {
    async fn pre_run_check(&self, gyms: &[GymRecord]) -> GateDecision;
    async fn log_statistics(&self, gyms: &[GymRecord]);
}

/// One external place-data source.
///
/// `search` is infallible at this boundary: adapters catch their own
/// network/parse errors, log them, and return an empty set, so one dead
/// provider never blocks its siblings or aborts a gym. Adapters also apply
/// their own fitness-domain filter and per-request timeout.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Fixed trust weight for candidates from this source.
    fn confidence(&self) -> f64;
    async fn search(&self, query: &str) -> Vec<SearchCandidate>;
}

/// Injectable inter-query delay. The production pacer keeps a wall-clock gap
/// between successive query batches for one gym; tests swap in a no-op.
#[async_trait]
pub trait QueryPacer: Send + Sync {
    async fn pause(&self);
}
