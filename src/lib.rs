//! Phase Timers - grouped countdowns cycling between protection and capture
//!
//! This library provides the phase clock model, a registry that owns the
//! clocks, sorted/grouped projections for display, JSON persistence, and an
//! HTTP API driven by a periodic tick task.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{StoreError, TimerError};
pub use state::{AppState, Phase, PhaseClock, TimerRegistry};
pub use utils::signals::shutdown_signal;
