//! Compares a handful of ways to build a long string, timing each with a
//! scoped timer that records into the global store.
//!
//! Run with: cargo run --example string_concat
//! Set `RUST_LOG=debug` to see every submitted measurement.

use std::fmt::Write as _;
use scoped_duration::{Report, ReportOptions, ScopedTimer, global, record_scope, time_scope};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PIECE: &str = "Hello";
const REPETITIONS: usize = 10_000;
const ROUNDS: usize = 5;

const TAGS: [&str; 5] = [
    "formatCopy",
    "pushStr",
    "concatVec",
    "concatVecPreallocate",
    "writeMacro",
];

/// Rebuilds the whole string on every step.
fn format_copy() -> usize {
    let _timer = record_scope("formatCopy");
    let mut s = String::new();
    for _ in 0..REPETITIONS {
        s = format!("{s}{PIECE}");
    }
    s.len()
}

fn push_str() -> usize {
    time_scope!("pushStr");
    let mut s = String::new();
    for _ in 0..REPETITIONS {
        s.push_str(PIECE);
    }
    s.len()
}

fn concat_vec() -> usize {
    time_scope!("concatVec");
    let mut parts = Vec::new();
    for _ in 0..REPETITIONS {
        parts.push(PIECE);
    }
    parts.concat().len()
}

fn concat_vec_preallocate() -> usize {
    time_scope!("concatVecPreallocate");
    let mut parts = Vec::with_capacity(REPETITIONS);
    for _ in 0..REPETITIONS {
        parts.push(PIECE);
    }
    parts.concat().len()
}

fn write_macro() -> usize {
    time_scope!("writeMacro");
    let mut s = String::new();
    for _ in 0..REPETITIONS {
        let _ = write!(s, "{PIECE}");
    }
    s.len()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A timer with a plain closure sink: log the total and keep nothing.
    let _main_timer =
        ScopedTimer::new(|secs: f64| info!(event = "Demo", scope = "main", seconds = secs));

    let mut produced = 0;
    for _ in 0..ROUNDS {
        produced += format_copy();
        produced += push_str();
        produced += concat_vec();
        produced += concat_vec_preallocate();
        produced += write_macro();
    }
    info!(event = "Demo", bytes = produced);

    let options = std::env::args()
        .nth(1)
        .map(|order| ReportOptions::default().with_order(&order))
        .transpose()?
        .unwrap_or_default()
        .verbose(std::env::var_os("VERBOSE").is_some());

    let report = Report::for_tags(global(), &TAGS, options)?;
    println!("{report}");
    Ok(())
}
