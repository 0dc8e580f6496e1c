use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DurationError {
    #[error("no durations were ever recorded for tag: {0}")]
    UnknownTag(String),

    #[error("tag has no recorded durations: {0}")]
    EmptyTag(String),

    #[error("failed to submit measurement: {0}")]
    SubmitFailed(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLock(String),

    #[error("Invalid report options: {0}")]
    InvalidOptions(String),

    #[error("failed to serialize report: {0}")]
    SerializationError(String),
}

impl<T> From<std::sync::PoisonError<T>> for DurationError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        DurationError::PoisonedLock(err.to_string())
    }
}

impl From<serde_json::Error> for DurationError {
    fn from(err: serde_json::Error) -> Self {
        DurationError::InvalidOptions(err.to_string())
    }
}

impl From<strum::ParseError> for DurationError {
    fn from(err: strum::ParseError) -> Self {
        DurationError::InvalidOptions(err.to_string())
    }
}
