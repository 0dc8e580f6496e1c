//! Tag-keyed aggregation of measured durations.
//!
//! A [`DurationStore`] maps tags to the ordered list of durations recorded
//! under them. It is a cheap, cloneable handle: every clone shares the same
//! map, so a store can be created once and handed to each call site.
//! [`TagRecorder`] binds a store to one tag and is the sink a
//! [`ScopedTimer`] reports into.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::DurationError;
use crate::timers::{ScopedTimer, Submit};

/// Shared tag → durations map. Appends are serialized by a single lock.
#[derive(Debug, Clone, Default)]
pub struct DurationStore {
    inner: Arc<RwLock<BTreeMap<String, Vec<f64>>>>,
}

impl DurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder appending under `tag`. Does not touch the map yet.
    pub fn recorder(&self, tag: impl Into<String>) -> TagRecorder {
        TagRecorder::new(tag, self.clone())
    }

    /// A timer on the monotonic clock recording under `tag`.
    pub fn timer(&self, tag: impl Into<String>) -> ScopedTimer<TagRecorder> {
        ScopedTimer::new(self.recorder(tag))
    }

    /// Append one measurement, creating the tag's list if needed.
    pub fn record(&self, tag: &str, seconds: f64) -> Result<(), DurationError> {
        let mut map = self.inner.write()?;
        match map.get_mut(tag) {
            Some(samples) => samples.push(seconds),
            None => {
                map.insert(tag.to_string(), vec![seconds]);
            }
        }
        debug!(event = "Record", phase = "Append", tag = tag, seconds = seconds);
        Ok(())
    }

    /// Make `tag` known without recording anything under it.
    pub fn declare(&self, tag: &str) -> Result<(), DurationError> {
        let mut map = self.inner.write()?;
        if !map.contains_key(tag) {
            map.insert(tag.to_string(), Vec::new());
        }
        Ok(())
    }

    /// All durations recorded under `tag`, in recording order.
    pub fn durations(&self, tag: &str) -> Result<Vec<f64>, DurationError> {
        self.inner
            .read()?
            .get(tag)
            .cloned()
            .ok_or_else(|| DurationError::UnknownTag(tag.to_string()))
    }

    /// Number of durations recorded under `tag`, zero for unknown tags.
    pub fn len(&self, tag: &str) -> Result<usize, DurationError> {
        Ok(self.inner.read()?.get(tag).map_or(0, Vec::len))
    }

    /// Arithmetic mean of the durations under `tag`.
    pub fn mean(&self, tag: &str) -> Result<f64, DurationError> {
        let map = self.inner.read()?;
        let samples = map
            .get(tag)
            .ok_or_else(|| DurationError::UnknownTag(tag.to_string()))?;
        mean_of(tag, samples)
    }

    /// Known tags in sorted order.
    pub fn tags(&self) -> Result<Vec<String>, DurationError> {
        Ok(self.inner.read()?.keys().cloned().collect())
    }

    /// Point-in-time copy of the whole map.
    pub fn snapshot(&self) -> Result<BTreeMap<String, Vec<f64>>, DurationError> {
        Ok(self.inner.read()?.clone())
    }
}

pub(crate) fn mean_of(tag: &str, samples: &[f64]) -> Result<f64, DurationError> {
    if samples.is_empty() {
        return Err(DurationError::EmptyTag(tag.to_string()));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sink appending each submitted measurement to a store under a fixed tag.
#[derive(Debug, Clone)]
pub struct TagRecorder {
    tag: String,
    store: DurationStore,
}

impl TagRecorder {
    pub fn new(tag: impl Into<String>, store: DurationStore) -> Self {
        Self {
            tag: tag.into(),
            store,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Submit for TagRecorder {
    fn submit(&mut self, seconds: f64) -> Result<(), DurationError> {
        self.store.record(&self.tag, seconds)
    }
}

static GLOBAL_STORE: Lazy<DurationStore> = Lazy::new(DurationStore::new);

/// The process-wide store, created empty on first use.
pub fn global() -> &'static DurationStore {
    &GLOBAL_STORE
}

/// A timer recording under `tag` in the [`global`] store.
pub fn record_scope(tag: impl Into<String>) -> ScopedTimer<TagRecorder> {
    global().timer(tag)
}
