//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{ClockId, GroupFilter, NewTimer, TimeSource, TimerRegistry};
use crate::{
    error::TimerError,
    storage::{export_document, from_records, parse_document, to_records, TimerStore},
    view::{Labels, Projection, TimerView},
};

/// Service object owning the registry and its collaborators.
///
/// Every mutation goes through here: apply to the registry, save when the
/// registry reports changes, then rebuild and publish the projection.
pub struct AppState {
    registry: Mutex<TimerRegistry>,
    store: Arc<dyn TimerStore>,
    time: Arc<dyn TimeSource>,
    labels: Labels,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    /// Channel carrying the latest projection
    projection_tx: watch::Sender<Projection>,
    /// Keep the receiver alive to prevent channel closure
    _projection_rx: watch::Receiver<Projection>,
}

impl AppState {
    /// Load stored timers and build the initial projection.
    ///
    /// Fails if the stored data cannot be rehydrated in full.
    pub fn new(
        store: Arc<dyn TimerStore>,
        time: Arc<dyn TimeSource>,
        labels: Labels,
    ) -> Result<Self, TimerError> {
        let clocks = from_records(store.load()?)?;
        let registry = TimerRegistry::with_clocks(clocks)?;
        info!("Loaded {} timers", registry.len());

        let projection = Projection::build(&registry, time.now(), &labels);
        let (projection_tx, projection_rx) = watch::channel(projection);

        Ok(Self {
            registry: Mutex::new(registry),
            store,
            time,
            labels,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            projection_tx,
            _projection_rx: projection_rx,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerRegistry>, TimerError> {
        self.registry.lock().map_err(|_| TimerError::StatePoisoned)
    }

    /// Apply a change to the registry, persist if needed, and republish
    pub fn update<R, F>(&self, action: &str, updater: F) -> Result<R, TimerError>
    where
        F: FnOnce(&mut TimerRegistry, DateTime<Utc>) -> Result<R, TimerError>,
    {
        let now = self.time.now();
        let mut registry = self.lock()?;

        let result = updater(&mut *registry, now)?;

        if registry.take_dirty() {
            self.persist(&registry);
        }
        let projection = Projection::build(&registry, now, &self.labels);
        drop(registry);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), now));
        }

        // send_replace never fails, even with no receivers left
        self.projection_tx.send_replace(projection);
        Ok(result)
    }

    fn persist(&self, registry: &TimerRegistry) {
        if let Err(e) = self.store.save(&to_records(registry.clocks())) {
            warn!("Failed to save timers: {}", e);
        }
    }

    pub fn add(&self, new: NewTimer) -> Result<ClockId, TimerError> {
        self.update("add", |registry, now| registry.add(new, now))
    }

    pub fn remove(&self, id: &ClockId) -> Result<bool, TimerError> {
        self.update("remove", |registry, _| Ok(registry.remove(id)))
    }

    pub fn edit(&self, id: &ClockId, name: &str, group: &str) -> Result<bool, TimerError> {
        self.update("edit", |registry, _| registry.edit(id, name, group))
    }

    pub fn toggle_checked(&self, id: &ClockId) -> Result<bool, TimerError> {
        self.update("toggle", |registry, _| Ok(registry.toggle_checked(id)))
    }

    /// Advance every clock to the current time
    pub fn tick_all(&self) -> Result<usize, TimerError> {
        let now = self.time.now();
        let mut registry = self.lock()?;

        let flipped = registry.tick_all(now);
        if registry.take_dirty() {
            self.persist(&registry);
        }
        let projection = Projection::build(&registry, now, &self.labels);
        drop(registry);

        self.projection_tx.send_replace(projection);
        Ok(flipped)
    }

    pub fn groups(&self) -> Result<Vec<String>, TimerError> {
        Ok(self.lock()?.groups())
    }

    pub fn set_filter(&self, filter: GroupFilter) -> Result<(), TimerError> {
        self.update("filter", |registry, _| {
            registry.set_filter(filter);
            Ok(())
        })
    }

    pub fn filter(&self) -> Result<GroupFilter, TimerError> {
        Ok(self.lock()?.filter().clone())
    }

    /// Open an edit session, returning the timer being edited
    pub fn begin_edit(&self, id: &ClockId) -> Result<Option<TimerView>, TimerError> {
        let now = self.time.now();
        let mut registry = self.lock()?;
        let view = registry
            .begin_edit(id)
            .map(|clock| TimerView::new(clock, now, &self.labels));
        Ok(view)
    }

    pub fn commit_edit(&self, name: &str, group: &str) -> Result<bool, TimerError> {
        self.update("edit", |registry, _| registry.commit_edit(name, group))
    }

    pub fn cancel_edit(&self) -> Result<(), TimerError> {
        self.lock()?.cancel_edit();
        Ok(())
    }

    /// Serialize every timer in registry order
    pub fn export(&self) -> Result<String, TimerError> {
        let registry = self.lock()?;
        Ok(export_document(registry.clocks())?)
    }

    /// Validate an import document and report how many timers it holds
    pub fn preview_import(&self, document: &str) -> Result<usize, TimerError> {
        Ok(parse_document(document)?.len())
    }

    /// Replace every timer with the contents of an import document.
    ///
    /// Nothing changes unless the whole document rehydrates.
    pub fn import(&self, document: &str) -> Result<usize, TimerError> {
        let clocks = parse_document(document)?;
        let count = clocks.len();
        self.update("import", |registry, _| registry.replace_all(clocks))?;
        info!("Imported {} timers", count);
        Ok(count)
    }

    /// Latest published projection
    pub fn projection(&self) -> Projection {
        self.projection_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Projection> {
        self.projection_tx.subscribe()
    }

    pub fn timer_count(&self) -> Result<usize, TimerError> {
        Ok(self.lock()?.len())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }
}
