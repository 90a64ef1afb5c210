//! Injected monotonic clock used to time strategy runs.

use std::time::{Duration, Instant};

/// Monotonic time source. Readings are offsets from an arbitrary origin fixed
/// by the clock instance.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Runs `f` once and returns its output with the elapsed time.
pub fn time_it<C, T, F>(clock: &C, f: F) -> (T, Duration)
where
    C: Clock + ?Sized,
    F: FnOnce() -> T,
{
    let start = clock.now();
    let value = f();
    let elapsed = clock.now().saturating_sub(start);
    (value, elapsed)
}

/// Baseline time divided by contender time; `None` when the contender took no
/// measurable time.
pub fn speedup(baseline: Duration, contender: Duration) -> Option<f64> {
    if contender.is_zero() {
        None
    } else {
        Some(baseline.as_secs_f64() / contender.as_secs_f64())
    }
}
