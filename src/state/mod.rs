//! State management module
//!
//! This module contains the phase clock model, the registry that owns the
//! clocks, and the service object that ties them to storage and time.

pub mod app_state;
pub mod phase;
pub mod phase_clock;
pub mod registry;
pub mod time_source;

// Re-export main types
pub use app_state::AppState;
pub use phase::Phase;
pub use phase_clock::{format_duration, ClockId, PhaseClock, RemainingTime, TickOutcome, UNGROUPED};
pub use registry::{GroupFilter, NewTimer, TimerRegistry, ALL_GROUPS};
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource};
