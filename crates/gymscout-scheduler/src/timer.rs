//! Scheduled-task abstraction over a tokio sleep-until task.
//!
//! Decouples the scheduler from the concrete timer primitive so tests can
//! drive it with tokio's paused clock. `cancel()` aborts the pending fire;
//! it never touches a callback that already started.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

pub struct ArmedTimer {
    fire_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

impl ArmedTimer {
    /// Arm a timer that runs `callback` once at `fire_at`. A fire time in
    /// the past fires on the next tick.
    pub fn arm<F, Fut>(fire_at: DateTime<Utc>, callback: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let delay = (fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback().await;
        });
        Self { fire_at, handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn fire_at(&self) -> DateTime<Utc> {
        self.fire_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_fires_at_deadline() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _timer = ArmedTimer::arm(Utc::now() + chrono::Duration::seconds(1), move || async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let timer = ArmedTimer::arm(Utc::now() + chrono::Duration::seconds(1), move || async move {
            flag.store(true, Ordering::SeqCst);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_fires_immediately() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let _timer = ArmedTimer::arm(Utc::now() - chrono::Duration::seconds(5), move || async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
