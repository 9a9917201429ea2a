//! A single countdown cycling between protection and capture

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Phase;

/// Group label used when a timer is given none
pub const UNGROUPED: &str = "ungrouped";

/// Unique timer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockId(String);

impl ClockId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ClockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-supplied time left in the initial phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl RemainingTime {
    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn to_duration(self) -> Duration {
        Duration::days(i64::from(self.days))
            + Duration::hours(i64::from(self.hours))
            + Duration::minutes(i64::from(self.minutes))
            + Duration::seconds(i64::from(self.seconds))
    }
}

/// Result of advancing a clock to a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Time left in the current phase, never negative
    pub remaining: Duration,
    /// Share of the current phase already elapsed, in `[0, 100]`
    pub progress_percent: f64,
    /// Whether this tick flipped the phase
    pub phase_changed: bool,
}

/// One countdown and its phase cycle
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseClock {
    id: ClockId,
    name: String,
    group: String,
    current_phase: Phase,
    previous_phase: Phase,
    phase_start: DateTime<Utc>,
    next_phase_change: DateTime<Utc>,
    checked: bool,
}

impl PhaseClock {
    /// Create a clock that is `remaining` away from leaving `initial_phase`.
    ///
    /// The remaining time is not checked against the phase length here;
    /// the registry validates it before calling this.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        initial_phase: Phase,
        remaining: RemainingTime,
        now: DateTime<Utc>,
    ) -> Self {
        let next_phase_change = now + remaining.to_duration();
        Self {
            id: ClockId::generate(),
            name: name.into(),
            group: normalize_group(group.into()),
            current_phase: initial_phase,
            previous_phase: initial_phase,
            phase_start: next_phase_change - initial_phase.duration(),
            next_phase_change,
            checked: false,
        }
    }

    /// Rebuild a clock from stored fields without recomputing its schedule
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: ClockId,
        name: String,
        group: String,
        current_phase: Phase,
        previous_phase: Phase,
        phase_start: DateTime<Utc>,
        next_phase_change: DateTime<Utc>,
        checked: bool,
    ) -> Self {
        Self {
            id,
            name,
            group: normalize_group(group),
            current_phase,
            previous_phase,
            phase_start,
            next_phase_change,
            checked,
        }
    }

    /// Advance the clock to `now`.
    ///
    /// At most one phase flip happens per call, even when `now` is several
    /// phases past the boundary.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut phase_changed = false;

        if now >= self.next_phase_change {
            self.previous_phase = self.current_phase;
            // Anchor on the old boundary so the schedule does not drift.
            self.phase_start = self.next_phase_change;
            self.current_phase = self.current_phase.next();
            self.next_phase_change = self.phase_start + self.current_phase.duration();

            if self.previous_phase == Phase::Capture && self.current_phase == Phase::Protection {
                self.checked = false;
            }
            phase_changed = true;
        }

        TickOutcome {
            remaining: self.time_left_at(now),
            progress_percent: self.progress_at(now),
            phase_changed,
        }
    }

    /// Signed time until the next flip; negative once the boundary has passed
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        self.next_phase_change - now
    }

    /// Time until the next flip, clamped at zero
    pub fn time_left_at(&self, now: DateTime<Utc>) -> Duration {
        self.remaining_at(now).max(Duration::zero())
    }

    /// Percentage of the current phase elapsed at `now`, clamped to `[0, 100]`
    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        let total = self.current_phase.duration().num_milliseconds() as f64;
        let elapsed = total - self.time_left_at(now).num_milliseconds() as f64;
        (elapsed / total * 100.0).clamp(0.0, 100.0)
    }

    pub fn update_info(&mut self, name: impl Into<String>, group: impl Into<String>) {
        self.name = name.into();
        self.group = normalize_group(group.into());
    }

    pub fn toggle_checked(&mut self) {
        self.checked = !self.checked;
    }

    /// The checked marker only matters during capture
    pub fn shows_checkmark(&self) -> bool {
        self.current_phase == Phase::Capture
    }

    pub fn id(&self) -> &ClockId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn previous_phase(&self) -> Phase {
        self.previous_phase
    }

    pub fn phase_start(&self) -> DateTime<Utc> {
        self.phase_start
    }

    pub fn next_phase_change(&self) -> DateTime<Utc> {
        self.next_phase_change
    }

    pub fn checked(&self) -> bool {
        self.checked
    }
}

fn normalize_group(group: String) -> String {
    if group.is_empty() {
        UNGROUPED.to_string()
    } else {
        group
    }
}

/// Format a duration as `"{d}d hh:mm:ss"`, dropping the day part when zero.
///
/// Components are truncated, never rounded up. Negative input prints as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap()
    }

    fn clock(phase: Phase, remaining: RemainingTime) -> PhaseClock {
        PhaseClock::new("Fort", "North", phase, remaining, t0())
    }

    #[test]
    fn construction_spans_one_phase() {
        for (phase, remaining) in [
            (Phase::Protection, RemainingTime::new(3, 0, 0, 0)),
            (Phase::Protection, RemainingTime::new(0, 5, 30, 15)),
            (Phase::Capture, RemainingTime::new(0, 24, 0, 0)),
            (Phase::Capture, RemainingTime::default()),
        ] {
            let c = clock(phase, remaining);
            assert_eq!(c.next_phase_change() - c.phase_start(), phase.duration());
            assert_eq!(c.next_phase_change(), t0() + remaining.to_duration());
            assert_eq!(c.previous_phase(), phase);
            assert!(!c.checked());
        }
    }

    #[test]
    fn empty_group_becomes_ungrouped() {
        let c = PhaseClock::new("Fort", "", Phase::Capture, RemainingTime::default(), t0());
        assert_eq!(c.group(), UNGROUPED);
    }

    #[test]
    fn tick_before_boundary_is_idempotent() {
        let mut c = clock(Phase::Protection, RemainingTime::new(1, 0, 0, 0));
        let before = c.clone();
        let now = t0() + Duration::hours(3);

        let first = c.tick(now);
        let second = c.tick(now);

        assert_eq!(first, second);
        assert!(!first.phase_changed);
        assert_eq!(c, before);
        assert_eq!(first.remaining, Duration::hours(21));
    }

    #[test]
    fn flip_anchors_on_previous_boundary() {
        let mut c = clock(Phase::Protection, RemainingTime::new(0, 1, 0, 0));
        let boundary = c.next_phase_change();

        let outcome = c.tick(boundary + Duration::minutes(10));

        assert!(outcome.phase_changed);
        assert_eq!(c.current_phase(), Phase::Capture);
        assert_eq!(c.previous_phase(), Phase::Protection);
        assert_eq!(c.phase_start(), boundary);
        assert_eq!(c.next_phase_change() - c.phase_start(), Duration::days(1));
        assert_eq!(outcome.remaining, Duration::days(1) - Duration::minutes(10));
    }

    #[test]
    fn only_one_flip_per_tick() {
        let mut c = clock(Phase::Capture, RemainingTime::new(0, 1, 0, 0));
        let far = t0() + Duration::days(30);

        let outcome = c.tick(far);
        assert!(outcome.phase_changed);
        assert_eq!(c.current_phase(), Phase::Protection);
        assert_eq!(c.next_phase_change() - c.phase_start(), Duration::days(3));
        assert_eq!(outcome.remaining, Duration::zero());
        assert_eq!(outcome.progress_percent, 100.0);

        c.tick(far);
        assert_eq!(c.current_phase(), Phase::Capture);
    }

    #[test]
    fn capture_to_protection_clears_checked() {
        let mut c = clock(Phase::Capture, RemainingTime::new(0, 0, 0, 30));
        c.toggle_checked();
        assert!(c.checked());

        c.tick(t0() + Duration::seconds(30));
        assert_eq!(c.current_phase(), Phase::Protection);
        assert!(!c.checked());
    }

    #[test]
    fn protection_to_capture_keeps_checked() {
        let mut c = clock(Phase::Protection, RemainingTime::new(0, 0, 0, 30));
        c.toggle_checked();

        c.tick(t0() + Duration::seconds(31));
        assert_eq!(c.current_phase(), Phase::Capture);
        assert!(c.checked());
    }

    #[test]
    fn progress_is_bounded_and_monotonic() {
        let mut c = clock(Phase::Capture, RemainingTime::new(0, 24, 0, 0));
        let mut last = -1.0;
        for minutes in (0..24 * 60).step_by(37) {
            let outcome = c.tick(t0() + Duration::minutes(minutes));
            assert!(!outcome.phase_changed);
            assert!((0.0..=100.0).contains(&outcome.progress_percent));
            assert!(outcome.progress_percent >= last);
            last = outcome.progress_percent;
        }
    }

    #[test]
    fn progress_reflects_elapsed_share() {
        let mut c = clock(Phase::Capture, RemainingTime::new(0, 6, 0, 0));
        let outcome = c.tick(t0());
        assert!((outcome.progress_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn update_info_leaves_schedule_alone() {
        let mut c = clock(Phase::Protection, RemainingTime::new(2, 0, 0, 0));
        let next = c.next_phase_change();
        c.update_info("Keep", "");
        assert_eq!(c.name(), "Keep");
        assert_eq!(c.group(), UNGROUPED);
        assert_eq!(c.next_phase_change(), next);
        assert_eq!(c.current_phase(), Phase::Protection);
    }

    #[test]
    fn checkmark_only_in_capture() {
        assert!(clock(Phase::Capture, RemainingTime::default()).shows_checkmark());
        assert!(!clock(Phase::Protection, RemainingTime::default()).shows_checkmark());
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
        assert_eq!(format_duration(Duration::milliseconds(90_061_000)), "1d 01:01:01");
        assert_eq!(format_duration(Duration::milliseconds(3_599_999)), "00:59:59");
        assert_eq!(format_duration(Duration::days(2) + Duration::seconds(5)), "2d 00:00:05");
        assert_eq!(format_duration(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = clock(Phase::Capture, RemainingTime::default());
        let b = clock(Phase::Capture, RemainingTime::default());
        assert_ne!(a.id(), b.id());
    }
}
