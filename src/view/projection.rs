//! Read-only, display-ready projections of the registry

use std::collections::BTreeMap;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::{ordering::sort_for_display, Labels};
use crate::state::{format_duration, ClockId, GroupFilter, Phase, PhaseClock, TimerRegistry};

/// One timer row as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub id: ClockId,
    pub name: String,
    pub group: String,
    pub phase: Phase,
    pub phase_label: String,
    pub phase_description: String,
    pub checked: bool,
    pub show_checkmark: bool,
    pub remaining_seconds: i64,
    pub remaining_display: String,
    pub progress_percent: f64,
    pub ends_at: DateTime<Local>,
}

impl TimerView {
    pub fn new(clock: &PhaseClock, now: DateTime<Utc>, labels: &Labels) -> Self {
        let phase = clock.current_phase();
        let time_left = clock.time_left_at(now);
        Self {
            id: clock.id().clone(),
            name: clock.name().to_string(),
            group: clock.group().to_string(),
            phase,
            phase_label: labels.phase_name(phase).to_string(),
            phase_description: labels.phase_description(phase).to_string(),
            checked: clock.checked(),
            show_checkmark: clock.shows_checkmark(),
            remaining_seconds: time_left.num_seconds(),
            remaining_display: format_duration(time_left),
            progress_percent: clock.progress_at(now),
            ends_at: clock.next_phase_change().with_timezone(&Local),
        }
    }
}

/// A single group's sorted timers plus per-phase counts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub name: String,
    pub capture_count: usize,
    pub protection_count: usize,
    pub timers: Vec<TimerView>,
}

/// What the display shows for the active filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Projection {
    /// Every timer in one sorted list
    Flat { timers: Vec<TimerView> },
    /// Only the filtered group, partitioned and sorted
    Grouped { filter: String, groups: Vec<GroupView> },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Flat { timers: Vec::new() }
    }
}

impl Projection {
    /// Build the projection for the registry's active filter
    pub fn build(registry: &TimerRegistry, now: DateTime<Utc>, labels: &Labels) -> Self {
        match registry.filter() {
            GroupFilter::All => Projection::Flat {
                timers: flat(registry.clocks(), now, labels),
            },
            GroupFilter::Group(name) => Projection::Grouped {
                filter: name.clone(),
                groups: grouped(registry.clocks(), now, labels)
                    .into_iter()
                    .filter(|group| &group.name == name)
                    .collect(),
            },
        }
    }

    /// Timers in display order, regardless of mode
    pub fn timers(&self) -> Vec<&TimerView> {
        match self {
            Projection::Flat { timers } => timers.iter().collect(),
            Projection::Grouped { groups, .. } => {
                groups.iter().flat_map(|group| group.timers.iter()).collect()
            }
        }
    }
}

/// All clocks in one sorted list
pub fn flat(clocks: &[PhaseClock], now: DateTime<Utc>, labels: &Labels) -> Vec<TimerView> {
    let mut sorted: Vec<&PhaseClock> = clocks.iter().collect();
    sort_for_display(&mut sorted, now);
    sorted
        .into_iter()
        .map(|clock| TimerView::new(clock, now, labels))
        .collect()
}

/// Partition clocks by group label, sorting each group for display
pub fn grouped(clocks: &[PhaseClock], now: DateTime<Utc>, labels: &Labels) -> Vec<GroupView> {
    let mut partitions: BTreeMap<&str, Vec<&PhaseClock>> = BTreeMap::new();
    for clock in clocks {
        partitions.entry(clock.group()).or_default().push(clock);
    }

    partitions
        .into_iter()
        .map(|(name, mut members)| {
            sort_for_display(&mut members, now);
            let capture_count = members
                .iter()
                .filter(|clock| clock.current_phase() == Phase::Capture)
                .count();
            GroupView {
                name: name.to_string(),
                capture_count,
                protection_count: members.len() - capture_count,
                timers: members
                    .into_iter()
                    .map(|clock| TimerView::new(clock, now, labels))
                    .collect(),
            }
        })
        .collect()
}
