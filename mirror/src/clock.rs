use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out creation timestamps for internal collection identifiers.
///
/// Values are wall-clock milliseconds, bumped past the previous value when
/// two creations land in the same millisecond.
#[derive(Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut issued = now;
        // fetch_update only fails when the closure returns None.
        let _ = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = now.max(last + 1);
                Some(issued)
            });
        issued
    }
}
