//! # GymScout Search
//!
//! The per-gym resolution pipeline: plan candidate queries from a gym name,
//! fan each query out to every provider concurrently, pace between queries,
//! and collapse the combined candidates to a single winner by confidence.
//!
//! ## Architecture
//! ```text
//! gym name
//!   └── planner: ["파워짐 강남점 헬스", "파워짐 강남점", "파워GYM 강남점", ...]
//!         └── per query: join_all(provider.search(q))   ← concurrent fan-out
//!               └── pacer.pause()                        ← gap between queries
//!                     └── merge: dedup by (name, address), max confidence wins
//! ```

pub mod engine;
pub mod merge;
pub mod pacer;
pub mod planner;

pub use engine::MultiSourceSearch;
pub use merge::merge;
pub use pacer::{IntervalPacer, NoopPacer};
