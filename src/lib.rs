// src/lib.rs
pub use clock::{Clock, FnClock, MonotonicClock, SystemClock};
pub use error::DurationError;
pub use recorder::{DurationStore, TagRecorder, global, record_scope};
pub use report::{Report, ReportOptions, SortOrder, TagSummary};
pub use timers::{Fallible, ScopedTimer, Submit};

pub mod clock;
mod error;
mod recorder;
pub mod report;
mod timers;

#[cfg(feature = "bench-internal")]
pub mod bench_helpers;
