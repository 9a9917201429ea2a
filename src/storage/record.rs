//! Flat serialized form of a phase clock

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    state::{Phase, PhaseClock},
};

/// One timer as written to disk or an export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
    pub current_phase: Phase,
    #[serde(default)]
    pub previous_phase: Option<Phase>,
    #[serde(default)]
    pub checked: bool,
    pub phase_start: DateTime<Utc>,
    pub next_phase_change: DateTime<Utc>,
}

impl From<&PhaseClock> for ClockRecord {
    fn from(clock: &PhaseClock) -> Self {
        Self {
            id: clock.id().to_string(),
            name: clock.name().to_string(),
            group: clock.group().to_string(),
            current_phase: clock.current_phase(),
            previous_phase: Some(clock.previous_phase()),
            checked: clock.checked(),
            phase_start: clock.phase_start(),
            next_phase_change: clock.next_phase_change(),
        }
    }
}

impl ClockRecord {
    /// Restore the stored fields as-is, without rerunning the schedule math
    pub fn into_clock(self) -> Result<PhaseClock, TimerError> {
        if self.id.is_empty() {
            return Err(TimerError::malformed("timer record has an empty id"));
        }
        if self.next_phase_change <= self.phase_start {
            return Err(TimerError::malformed(format!(
                "timer {} changes phase before it starts",
                self.id
            )));
        }

        Ok(PhaseClock::from_parts(
            self.id.into(),
            self.name,
            self.group,
            self.current_phase,
            self.previous_phase.unwrap_or(self.current_phase),
            self.phase_start,
            self.next_phase_change,
            self.checked,
        ))
    }
}

/// Snapshot every clock in registry order
pub fn to_records(clocks: &[PhaseClock]) -> Vec<ClockRecord> {
    clocks.iter().map(ClockRecord::from).collect()
}

/// Rehydrate a batch; one bad record fails the whole batch
pub fn from_records(records: Vec<ClockRecord>) -> Result<Vec<PhaseClock>, TimerError> {
    records.into_iter().map(ClockRecord::into_clock).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RemainingTime, UNGROUPED};
    use chrono::TimeZone;

    #[test]
    fn record_uses_camel_case_keys() {
        let now = Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap();
        let clock = PhaseClock::new("Fort", "North", Phase::Capture, RemainingTime::new(0, 2, 0, 0), now);
        let value = serde_json::to_value(ClockRecord::from(&clock)).unwrap();

        for key in [
            "id",
            "name",
            "group",
            "currentPhase",
            "previousPhase",
            "checked",
            "phaseStart",
            "nextPhaseChange",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["currentPhase"], "capture");
    }

    #[test]
    fn restores_fields_directly() {
        let now = Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap();
        let mut clock = PhaseClock::new("Fort", "North", Phase::Protection, RemainingTime::new(1, 0, 0, 0), now);
        clock.toggle_checked();

        let restored = ClockRecord::from(&clock).into_clock().unwrap();
        assert_eq!(restored, clock);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let json = r#"{
            "id": "1731580000000abcde",
            "name": "Fort",
            "currentPhase": "capture",
            "phaseStart": "2025-11-14T00:00:00.000Z",
            "nextPhaseChange": "2025-11-15T00:00:00.000Z"
        }"#;
        let clock = serde_json::from_str::<ClockRecord>(json).unwrap().into_clock().unwrap();

        assert_eq!(clock.id().as_str(), "1731580000000abcde");
        assert_eq!(clock.group(), UNGROUPED);
        assert_eq!(clock.previous_phase(), Phase::Capture);
        assert!(!clock.checked());
    }

    #[test]
    fn inverted_schedule_fails_the_batch() {
        let now = Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap();
        let good = ClockRecord::from(&PhaseClock::new("A", "g", Phase::Capture, RemainingTime::default(), now));
        let mut bad = good.clone();
        bad.id = "other".into();
        bad.next_phase_change = bad.phase_start;

        assert!(from_records(vec![good, bad]).is_err());
    }
}
