//! Wall clock and timestamp-derived identifiers.
//!
//! Stores take the clock as `Arc<dyn Clock>` so tests can pin time. Delays are
//! plain tokio timers, which tests drive with paused time.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System clock - uses real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Issues `<prefix>-<millis>` ids from clock readings.
///
/// Readings that do not move past the last issued stamp are bumped by one
/// millisecond, so ids stay unique and increasing within a store.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: Mutex<Option<i64>>,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, prefix: &str, now: DateTime<Utc>) -> String {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let reading = now.timestamp_millis();
        let stamp = match *last {
            Some(previous) => reading.max(previous + 1),
            None => reading,
        };
        *last = Some(stamp);
        format!("{}-{}", prefix, stamp)
    }
}

/// Clock frozen at a settable instant, for tests.
#[cfg(test)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

#[cfg(test)]
impl ManualClock {
    pub fn at(millis: i64) -> Self {
        Self(Mutex::new(
            DateTime::from_timestamp_millis(millis).expect("valid test timestamp"),
        ))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
