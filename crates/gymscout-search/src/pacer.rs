//! Query pacing — the injectable gap between successive query batches.
//!
//! The production pacer enforces a minimum wall-clock gap from the end of
//! the previous pause, keeping external providers happy. Tests use
//! [`NoopPacer`] or drive [`IntervalPacer`] under tokio's paused clock.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use gymscout_core::traits::QueryPacer;

/// Minimum-gap pacer backed by tokio time.
pub struct IntervalPacer {
    min_gap: Duration,
    last: Mutex<Option<Instant>>,
}

impl IntervalPacer {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last: Mutex::new(None),
        }
    }

    /// The default 500ms gap used by the production pipeline.
    pub fn default_gap() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl QueryPacer for IntervalPacer {
    async fn pause(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_gap {
                tokio::time::sleep(self.min_gap - elapsed).await;
            }
        } else {
            tokio::time::sleep(self.min_gap).await;
        }
        *last = Some(Instant::now());
    }
}

/// No-op pacer for tests.
pub struct NoopPacer;

#[async_trait]
impl QueryPacer for NoopPacer {
    async fn pause(&self) {}
}
