//! Clock port used by backends to stamp audit timestamps.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System clock - uses real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Current time truncated to millisecond precision.
///
/// Both backends store milliseconds, so stamping at that precision keeps
/// round-tripped entities equal to what was returned on write.
pub fn stamp_now(clock: &dyn Clock) -> DateTime<Utc> {
    clock.now().trunc_subsecs(3)
}

/// Timestamp for a mutation of a record last modified at `previous`.
///
/// Always at least one millisecond after `previous`, even if the clock has
/// not advanced or has gone backwards.
pub fn stamp_after(clock: &dyn Clock, previous: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous.trunc_subsecs(3) + Duration::milliseconds(1);
    stamp_now(clock).max(floor)
}

/// Fixed clock for testing.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(any(test, feature = "test-utils"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that advances by a fixed step on every reading.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step: Duration,
    ticks: std::sync::atomic::AtomicI32,
}

#[cfg(any(test, feature = "test-utils"))]
impl SteppingClock {
    pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            start,
            step,
            ticks: std::sync::atomic::AtomicI32::new(0),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self
            .ticks
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.start + self.step * tick
    }
}
