//! The two phases a timer cycles through

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Phase of a cycling countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Three-day protected window
    Protection,
    /// One-day window in which the target can be captured
    Capture,
}

impl Phase {
    /// Fixed length of this phase
    pub fn duration(self) -> Duration {
        match self {
            Phase::Protection => Duration::days(3),
            Phase::Capture => Duration::days(1),
        }
    }

    /// The phase that follows this one
    pub fn next(self) -> Phase {
        match self {
            Phase::Protection => Phase::Capture,
            Phase::Capture => Phase::Protection,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Protection => "protection",
            Phase::Capture => "capture",
        }
    }
}
