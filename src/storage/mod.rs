//! Persistence module
//!
//! Timers are stored as a flat JSON array of [`ClockRecord`]s. The
//! [`TimerStore`] trait is the load/save seam; the service object only ever
//! talks to it.

pub mod document;
pub mod file_store;
pub mod memory_store;
pub mod record;

pub use document::{export_document, export_file_name, parse_document};
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use record::{from_records, to_records, ClockRecord};

use crate::error::StoreError;

/// Load/save backend for the timer list
pub trait TimerStore: Send + Sync {
    /// Load every stored record; an absent store yields an empty list
    fn load(&self) -> Result<Vec<ClockRecord>, StoreError>;

    /// Replace the stored records
    fn save(&self, records: &[ClockRecord]) -> Result<(), StoreError>;
}
