//! # GymScout Core
//!
//! Shared foundation for the GymScout enrichment pipeline: configuration,
//! the error type, the data model, and the traits the pipeline consumes
//! (gym storage, staleness oracle, place providers, query pacing).
//!
//! Concrete implementations live in the other workspace crates; everything
//! here is dependency-light so the pipeline stays testable with fakes.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{GymScoutConfig, ProviderConfig, ScheduleConfig, ScheduleConfigPatch};
pub use error::{GymScoutError, Result};
pub use traits::{GymStore, PlaceProvider, QueryPacer, StalenessOracle};
pub use types::{
    GateDecision, GymRecord, GymUpdate, SearchCandidate, UpdateCycleStats, UpdateStrategy,
};
