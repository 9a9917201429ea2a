//! View ordering module
//!
//! Sorted and grouped projections of the registry, ready for display.

pub mod labels;
pub mod ordering;
pub mod projection;

pub use labels::Labels;
pub use ordering::{display_order, sort_for_display};
pub use projection::{GroupView, Projection, TimerView};
