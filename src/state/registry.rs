//! The ordered collection of phase clocks

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info};

use super::{ClockId, Phase, PhaseClock, RemainingTime};
use crate::error::TimerError;

/// Reserved filter value that selects every group
pub const ALL_GROUPS: &str = "all";

/// Which timers the projection shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl From<&str> for GroupFilter {
    fn from(value: &str) -> Self {
        if value == ALL_GROUPS {
            GroupFilter::All
        } else {
            GroupFilter::Group(value.to_string())
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::All => f.write_str(ALL_GROUPS),
            GroupFilter::Group(name) => f.write_str(name),
        }
    }
}

impl Serialize for GroupFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(GroupFilter::from(raw.as_str()))
    }
}

/// Input for a new timer, validated by [`TimerRegistry::add`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimer {
    pub name: String,
    pub group: String,
    pub phase: Phase,
    #[serde(flatten)]
    pub remaining: RemainingTime,
}

impl NewTimer {
    /// Reject blank names or groups and remaining times longer than the phase
    pub fn validate(&self) -> Result<(), TimerError> {
        validate_info(&self.name, &self.group)?;

        let requested = self.remaining.to_duration();
        let ceiling = self.phase.duration();
        if requested > ceiling {
            return Err(TimerError::RemainingTooLong {
                phase: self.phase.as_str(),
                requested_secs: requested.num_seconds(),
                max_hours: ceiling.num_hours(),
            });
        }
        Ok(())
    }
}

fn validate_info(name: &str, group: &str) -> Result<(), TimerError> {
    if name.trim().is_empty() {
        return Err(TimerError::MissingName);
    }
    let group = group.trim();
    if group.is_empty() {
        return Err(TimerError::MissingGroup);
    }
    if group == ALL_GROUPS {
        return Err(TimerError::ReservedGroup(group.to_string()));
    }
    Ok(())
}

/// Owns every clock plus the active filter and edit session
#[derive(Debug, Default)]
pub struct TimerRegistry {
    clocks: Vec<PhaseClock>,
    filter: GroupFilter,
    editing: Option<ClockId>,
    dirty: bool,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-rehydrated clocks
    pub fn with_clocks(clocks: Vec<PhaseClock>) -> Result<Self, TimerError> {
        let mut registry = Self::new();
        registry.replace_all(clocks)?;
        registry.dirty = false;
        Ok(registry)
    }

    /// Validate and append a new clock, returning its identifier
    pub fn add(&mut self, new: NewTimer, now: DateTime<Utc>) -> Result<ClockId, TimerError> {
        new.validate()?;

        let clock = PhaseClock::new(
            new.name.trim(),
            new.group.trim(),
            new.phase,
            new.remaining,
            now,
        );
        let id = clock.id().clone();
        info!("Added timer {} ({}) in {:?}", id, clock.name(), clock.current_phase());
        self.clocks.push(clock);
        self.dirty = true;
        Ok(id)
    }

    /// Remove a clock; unknown identifiers are ignored
    pub fn remove(&mut self, id: &ClockId) -> bool {
        let before = self.clocks.len();
        self.clocks.retain(|clock| clock.id() != id);
        let removed = self.clocks.len() != before;

        if removed {
            info!("Removed timer {}", id);
            if self.editing.as_ref() == Some(id) {
                self.editing = None;
            }
            self.dirty = true;
        } else {
            debug!("Remove ignored, no timer {}", id);
        }
        removed
    }

    /// Rename or regroup a clock; unknown identifiers are ignored
    pub fn edit(&mut self, id: &ClockId, name: &str, group: &str) -> Result<bool, TimerError> {
        validate_info(name, group)?;

        match self.clocks.iter_mut().find(|clock| clock.id() == id) {
            Some(clock) => {
                clock.update_info(name.trim(), group.trim());
                info!("Edited timer {}", id);
                self.dirty = true;
                Ok(true)
            }
            None => {
                debug!("Edit ignored, no timer {}", id);
                Ok(false)
            }
        }
    }

    /// Flip the checked marker; unknown identifiers are ignored
    pub fn toggle_checked(&mut self, id: &ClockId) -> bool {
        match self.clocks.iter_mut().find(|clock| clock.id() == id) {
            Some(clock) => {
                clock.toggle_checked();
                debug!("Timer {} checked={}", id, clock.checked());
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Tick every clock, returning how many flipped phase
    pub fn tick_all(&mut self, now: DateTime<Utc>) -> usize {
        let mut flipped = 0;
        for clock in &mut self.clocks {
            if clock.tick(now).phase_changed {
                info!(
                    "Timer {} ({}) moved from {:?} to {:?}",
                    clock.id(),
                    clock.name(),
                    clock.previous_phase(),
                    clock.current_phase()
                );
                flipped += 1;
            }
        }
        if flipped > 0 {
            self.dirty = true;
        }
        flipped
    }

    /// Distinct group labels in lexicographic order, never including the
    /// reserved filter value
    pub fn groups(&self) -> Vec<String> {
        self.clocks
            .iter()
            .map(|clock| clock.group())
            .filter(|group| *group != ALL_GROUPS)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Set the active filter; the group does not have to exist
    pub fn set_filter(&mut self, filter: GroupFilter) {
        debug!("Filter set to {}", filter);
        self.filter = filter;
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    /// Start editing a clock, returning it when it exists
    pub fn begin_edit(&mut self, id: &ClockId) -> Option<&PhaseClock> {
        let clock = self.clocks.iter().find(|clock| clock.id() == id)?;
        self.editing = Some(id.clone());
        Some(clock)
    }

    /// Apply the open edit session and close it.
    ///
    /// Returns `Ok(false)` when no session is open or its clock is gone.
    pub fn commit_edit(&mut self, name: &str, group: &str) -> Result<bool, TimerError> {
        validate_info(name, group)?;
        match self.editing.take() {
            Some(id) => self.edit(&id, name, group),
            None => Ok(false),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&ClockId> {
        self.editing.as_ref()
    }

    /// Swap in a whole new set of clocks, rejecting duplicate identifiers
    pub fn replace_all(&mut self, clocks: Vec<PhaseClock>) -> Result<(), TimerError> {
        let mut seen = HashSet::with_capacity(clocks.len());
        for clock in &clocks {
            if !seen.insert(clock.id()) {
                return Err(TimerError::malformed(format!(
                    "duplicate timer id {}",
                    clock.id()
                )));
            }
        }

        info!("Replacing {} timers with {}", self.clocks.len(), clocks.len());
        self.clocks = clocks;
        self.editing = None;
        self.dirty = true;
        Ok(())
    }

    /// Clear and return the pending-save flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn get(&self, id: &ClockId) -> Option<&PhaseClock> {
        self.clocks.iter().find(|clock| clock.id() == id)
    }

    /// Clocks in insertion order
    pub fn clocks(&self) -> &[PhaseClock] {
        &self.clocks
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}
