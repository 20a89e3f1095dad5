/// Timing ports: a clock and the two schedules driven from it.
///
/// Gameplay time (fixed ticks) and visual time (frames) are both plain
/// `Interval`s polled from one loop. Nothing here sleeps or spawns; the host
/// loop owns the thread. Tests step a `ManualClock` instead of waiting.

use std::time::{Duration, Instant};

/// Monotonic time since some origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-stepped clock for tests.
#[cfg(test)]
pub struct ManualClock {
    now: std::cell::Cell<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        ManualClock { now: std::cell::Cell::new(Duration::ZERO) }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + Duration::from_millis(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// ── Interval: repeating schedule ──

/// A repeating schedule. Fires at most once per `poll`; if the host falls
/// behind, missed periods are dropped rather than replayed in a burst.
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Duration>,
}

impl Interval {
    /// Created stopped.
    pub fn new(period: Duration) -> Self {
        Interval { period, next_due: None }
    }

    /// (Re)start: first fire one period from `now`.
    pub fn start(&mut self, now: Duration) {
        self.next_due = Some(now + self.period);
    }

    /// Immediate and idempotent. No fire happens after this until `start`.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

// ── Deferred: one-shot timer ──

/// Fire-and-forget one-shot. Arming again replaces the previous deadline.
#[derive(Clone, Debug, Default)]
pub struct Deferred {
    due: Option<Duration>,
}

impl Deferred {
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.due = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
