//! Scoped timers.
//!
//! This module provides an RAII timer that captures a start instant when it
//! is created and submits the elapsed seconds to a sink exactly once, when it
//! is dropped or explicitly finished. The submission happens on every exit
//! path out of the scope: normal return, early return, `?`, or unwinding.

use tracing::{debug, error, warn};

use crate::clock::{Clock, FnClock, MonotonicClock};
use crate::error::DurationError;

/// Receiver of a single completed measurement, in seconds.
///
/// Any `FnMut(f64)` closure is a sink that cannot fail. Wrap a closure that
/// returns a `Result` in [`Fallible`] to report failures instead.
pub trait Submit {
    fn submit(&mut self, seconds: f64) -> Result<(), DurationError>;
}

impl<F> Submit for F
where
    F: FnMut(f64),
{
    fn submit(&mut self, seconds: f64) -> Result<(), DurationError> {
        self(seconds);
        Ok(())
    }
}

/// Adapter for sinks that can fail.
pub struct Fallible<F>(pub F);

impl<F> Submit for Fallible<F>
where
    F: FnMut(f64) -> Result<(), DurationError>,
{
    fn submit(&mut self, seconds: f64) -> Result<(), DurationError> {
        (self.0)(seconds)
    }
}

struct Armed<S, C: Clock> {
    sink: S,
    clock: C,
    start: C::Instant,
}

impl<S: Submit, C: Clock> Armed<S, C> {
    fn fire(mut self) -> Result<f64, DurationError> {
        let end = self.clock.now();
        let elapsed = clamp_elapsed(self.clock.seconds_between(self.start, end));
        debug!(event = "Timer", phase = "Submit", seconds = elapsed);
        self.sink.submit(elapsed)?;
        Ok(elapsed)
    }
}

/// Negative or non-finite differences mean the clock misbehaved. They are
/// reported and submitted as zero.
fn clamp_elapsed(raw: f64) -> f64 {
    if raw.is_finite() && raw >= 0.0 {
        raw
    } else {
        warn!(
            event = "Timer",
            phase = "Clock",
            raw_seconds = raw,
            "clock produced an invalid elapsed time, submitting 0"
        );
        0.0
    }
}

/// RAII timer that submits elapsed seconds to a sink on Drop.
///
/// The timer is armed on construction and fires once. It is deliberately not
/// `Clone`: two timers must never report the same measurement.
///
/// # Example
///
/// ```rust,ignore
/// let mut samples = Vec::new();
/// {
///     let _timer = ScopedTimer::new(|secs: f64| samples.push(secs));
///     // ... work being measured ...
/// } // timer is dropped here, samples now holds one value
/// ```
///
/// A plain Rust move keeps the time already in flight. Use
/// [`ScopedTimer::into_restarted`] to move the timer and start over.
pub struct ScopedTimer<S: Submit, C: Clock = MonotonicClock> {
    inner: Option<Armed<S, C>>,
}

impl<S: Submit> ScopedTimer<S> {
    /// Start a timer on the monotonic clock.
    pub fn new(sink: S) -> Self {
        Self::with_clock(sink, MonotonicClock)
    }
}

impl<S, N, D, I> ScopedTimer<S, FnClock<N, D, I>>
where
    S: Submit,
    N: FnMut() -> I,
    D: Fn(I, I) -> f64,
    I: Copy,
{
    /// Start a timer whose clock is built from `now_fn` and `diff_fn`.
    pub fn with_fns(sink: S, now_fn: N, diff_fn: D) -> Self {
        Self::with_clock(sink, FnClock::new(now_fn, diff_fn))
    }
}

impl<S: Submit, C: Clock> ScopedTimer<S, C> {
    pub fn with_clock(sink: S, mut clock: C) -> Self {
        let start = clock.now();
        Self {
            inner: Some(Armed { sink, clock, start }),
        }
    }

    /// Seconds since the timer was armed, without firing it.
    pub fn elapsed(&mut self) -> f64 {
        match self.inner.as_mut() {
            Some(armed) => {
                let now = armed.clock.now();
                armed.clock.seconds_between(armed.start, now).max(0.0)
            }
            None => 0.0,
        }
    }

    /// Move the sink and clock into a fresh timer whose start is re-captured.
    ///
    /// Time spent before this call is discarded. Only the returned timer will
    /// submit.
    pub fn into_restarted(mut self) -> Self {
        match self.inner.take() {
            Some(mut armed) => {
                armed.start = armed.clock.now();
                Self { inner: Some(armed) }
            }
            None => Self { inner: None },
        }
    }

    /// Fire now and return the submitted value.
    ///
    /// Unlike an implicit drop this surfaces a failing sink to the caller.
    pub fn finish(mut self) -> Result<f64, DurationError> {
        match self.inner.take() {
            Some(armed) => armed.fire(),
            None => Ok(0.0),
        }
    }
}

impl<S: Submit, C: Clock> Drop for ScopedTimer<S, C> {
    fn drop(&mut self) {
        if let Some(armed) = self.inner.take() {
            if let Err(err) = armed.fire() {
                error!(event = "Timer", phase = "Submit", error = %err);
            }
        }
    }
}

impl<S: Submit, C: Clock> std::fmt::Debug for ScopedTimer<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedTimer")
            .field("armed", &self.inner.is_some())
            .finish()
    }
}

/// Time the rest of the enclosing block.
///
/// `time_scope!("tag")` records into the [global](crate::global) store,
/// `time_scope!(store, "tag")` into the given [`DurationStore`](crate::DurationStore).
#[macro_export]
macro_rules! time_scope {
    ($tag:expr) => {
        let _scope_timer = $crate::record_scope($tag);
    };
    ($store:expr, $tag:expr) => {
        let _scope_timer = $store.timer($tag);
    };
}
