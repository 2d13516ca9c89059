//! # GymScout Scheduler
//!
//! The repeating wall-clock trigger for the enrichment pipeline. One
//! scheduler per process, owned by the application container.
//!
//! ## Guarantees
//! - At most one cycle runs at a time; a contended trigger (scheduled or
//!   manual) is skipped, never queued.
//! - The next run is recomputed strictly in the future after every cycle,
//!   success or failure — a broken store never stalls the schedule.
//! - `stop()`/`restart()` only affect the pending timer, never an in-flight
//!   cycle.
//!
//! ## Architecture
//! ```text
//! ArmedTimer (tokio sleep-until)
//!   └── run_cycle
//!         ├── guard: is_running compare-exchange, skip when contended
//!         ├── store.find_all()            ← one acquisition per cycle
//!         ├── oracle.pre_run_check()      ← may skip the whole cycle
//!         ├── per gym: plan → fan-out → merge → apply
//!         └── finally: clear guard, reschedule unconditionally
//! ```

pub mod applier;
pub mod clock;
pub mod cycle;
pub mod engine;
pub mod timer;

pub use cycle::CycleOutcome;
pub use engine::{ProviderFactory, SchedulerStatus, UpdateScheduler};
pub use timer::ArmedTimer;
