//! Next-run computation.
//!
//! The candidate is always "today at trigger_hour:trigger_minute" relative
//! to the moment of computation; if that already passed, it advances by
//! `interval_days`. Cadence anchors to the recomputation moment, not a
//! fixed calendar grid.

use chrono::{DateTime, NaiveTime, Utc};

use gymscout_core::config::{MAX_INTERVAL_DAYS, ScheduleConfig};

/// Today's trigger instant relative to `now`.
pub fn trigger_today(now: DateTime<Utc>, config: &ScheduleConfig) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(
        config.trigger_hour.clamp(0, 23) as u32,
        config.trigger_minute.clamp(0, 59) as u32,
        0,
    )
    .unwrap_or(NaiveTime::MIN);
    now.date_naive().and_time(time).and_utc()
}

/// The next run strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, config: &ScheduleConfig) -> DateTime<Utc> {
    let candidate = trigger_today(now, config);
    if candidate <= now {
        // Clamp even though sanitize already bounds the config: an overflowing
        // interval must never panic the rescheduling path.
        let interval = config.interval_days.clamp(1, MAX_INTERVAL_DAYS);
        candidate + chrono::Duration::days(interval)
    } else {
        candidate
    }
}
