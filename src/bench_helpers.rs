use std::hint::black_box;
use std::sync::LazyLock;

use crate::clock::FnClock;
use crate::recorder::DurationStore;
use crate::timers::ScopedTimer;

// This module exists to keep benchmarks small, targeted, and stable.
// - Bench code lives in benches/, and calls the same paths user code does.
// - Everything here is gated behind the `bench-internal` feature so it never
//   ships in normal builds.

static BENCH_STORE: LazyLock<DurationStore> = LazyLock::new(DurationStore::new);

/// Arm and drop `iters` timers whose sink discards the value. Returns a sum
/// of the submitted values so the optimizer keeps the loop.
pub fn timer_overhead(iters: usize) -> u128 {
    let mut total_nanos: u128 = 0;
    for _ in 0..iters {
        let _timer = ScopedTimer::new(|secs: f64| total_nanos += (secs * 1e9) as u128);
    }
    total_nanos
}

/// Same as [`timer_overhead`] but on a fake clock, isolating the bookkeeping
/// from the cost of reading the OS clock.
pub fn timer_overhead_fake_clock(iters: usize) -> u64 {
    let mut tick = 0u64;
    let mut fired = 0u64;
    for _ in 0..iters {
        let clock = FnClock::new(
            || {
                tick += 1;
                tick
            },
            |a: u64, b: u64| (b - a) as f64,
        );
        let _timer = ScopedTimer::with_clock(|_secs: f64| fired += 1, clock);
    }
    black_box(fired)
}

/// Record `iters` timed scopes under one tag of a shared store.
pub fn recorder_append(iters: usize) -> usize {
    for _ in 0..iters {
        let _timer = BENCH_STORE.timer("bench");
    }
    BENCH_STORE.len("bench").unwrap_or(0)
}

/// Mean over a freshly filled store of `samples` values.
pub fn store_mean(samples: usize) -> f64 {
    let store = DurationStore::new();
    for i in 0..samples {
        let _ = store.record("mean", i as f64);
    }
    store.mean("mean").unwrap_or(0.0)
}
