//! In-memory timer store

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use super::{ClockRecord, TimerStore};
use crate::error::StoreError;

/// Keeps records in memory; counts saves so callers can observe persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ClockRecord>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ClockRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<ClockRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl TimerStore for MemoryStore {
    fn load(&self) -> Result<Vec<ClockRecord>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, records: &[ClockRecord]) -> Result<(), StoreError> {
        if let Ok(mut stored) = self.records.lock() {
            *stored = records.to_vec();
            self.saves.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
