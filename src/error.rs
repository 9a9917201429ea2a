//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by registry operations and record rehydration
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer name must not be empty")]
    MissingName,

    #[error("timer group must not be empty")]
    MissingGroup,

    #[error("group name \"{0}\" is reserved")]
    ReservedGroup(String),

    #[error("remaining time {requested_secs}s exceeds the {phase} ceiling of {max_hours}h")]
    RemainingTooLong {
        phase: &'static str,
        requested_secs: i64,
        max_hours: i64,
    },

    #[error("timer data is malformed: {reason}")]
    Malformed { reason: String },

    #[error("failed to lock timer registry")]
    StatePoisoned,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TimerError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// True for errors the caller caused with bad input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::MissingGroup
                | Self::ReservedGroup(_)
                | Self::RemainingTooLong { .. }
        )
    }
}

/// Errors from the persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode timer records")]
    Encode(#[source] serde_json::Error),
}
