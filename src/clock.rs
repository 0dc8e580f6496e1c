//! Clock strategies for [`ScopedTimer`](crate::ScopedTimer).
//!
//! A [`Clock`] pairs the two operations a timer needs: reading "now" and
//! turning two readings into elapsed seconds. Timers are generic over the
//! clock, so swapping the time source (or faking it in tests) costs nothing
//! at runtime.

use std::marker::PhantomData;
use std::time::{Instant, SystemTime};

/// Source of instants plus the rule for differencing them.
pub trait Clock {
    /// Opaque timestamp produced by [`Clock::now`].
    type Instant: Copy;

    /// Read the current instant.
    fn now(&mut self) -> Self::Instant;

    /// Seconds elapsed from `start` to `end`.
    ///
    /// May be negative if the underlying source is not monotonic; the timer
    /// clamps such values before submitting them.
    fn seconds_between(&self, start: Self::Instant, end: Self::Instant) -> f64;
}

/// Monotonic clock backed by [`std::time::Instant`]. The default for timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&mut self) -> Instant {
        Instant::now()
    }

    fn seconds_between(&self, start: Instant, end: Instant) -> f64 {
        end.saturating_duration_since(start).as_secs_f64()
    }
}

/// Wall clock backed by [`std::time::SystemTime`].
///
/// Unlike [`MonotonicClock`] this one can go backwards (NTP adjustments,
/// manual changes), in which case the difference comes out negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = SystemTime;

    fn now(&mut self) -> SystemTime {
        SystemTime::now()
    }

    fn seconds_between(&self, start: SystemTime, end: SystemTime) -> f64 {
        match end.duration_since(start) {
            Ok(elapsed) => elapsed.as_secs_f64(),
            Err(err) => -err.duration().as_secs_f64(),
        }
    }
}

/// Clock assembled from a pair of closures.
///
/// ```rust,ignore
/// let mut ticks = vec![5.0, 0.0];
/// let clock = FnClock::new(move || ticks.pop().unwrap(), |a: f64, b: f64| b - a);
/// ```
pub struct FnClock<N, D, I> {
    now_fn: N,
    diff_fn: D,
    _instant: PhantomData<fn() -> I>,
}

impl<N, D, I> FnClock<N, D, I>
where
    N: FnMut() -> I,
    D: Fn(I, I) -> f64,
    I: Copy,
{
    pub fn new(now_fn: N, diff_fn: D) -> Self {
        Self {
            now_fn,
            diff_fn,
            _instant: PhantomData,
        }
    }
}

impl<N, D, I> Clock for FnClock<N, D, I>
where
    N: FnMut() -> I,
    D: Fn(I, I) -> f64,
    I: Copy,
{
    type Instant = I;

    fn now(&mut self) -> I {
        (self.now_fn)()
    }

    fn seconds_between(&self, start: I, end: I) -> f64 {
        (self.diff_fn)(start, end)
    }
}

impl<N, D, I> std::fmt::Debug for FnClock<N, D, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClock").finish_non_exhaustive()
    }
}
