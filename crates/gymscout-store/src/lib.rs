//! # GymScout Store
//!
//! Concrete collaborators for the binary: a SQLite-backed [`GymStore`]
//! implementation and the staleness oracle that gates cycles on how
//! recently the collection was enriched.
//!
//! [`GymStore`]: gymscout_core::traits::GymStore

pub mod oracle;
pub mod sqlite;

pub use oracle::EnrichmentOracle;
pub use sqlite::SqliteGymStore;
