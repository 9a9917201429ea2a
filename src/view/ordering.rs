//! Display ordering of phase clocks

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::state::{Phase, PhaseClock};

/// Compare two clocks for display.
///
/// Capture sorts before protection. Within capture the clock with more time
/// left comes first; within protection the one with less time left does.
pub fn display_order(a: &PhaseClock, b: &PhaseClock, now: DateTime<Utc>) -> Ordering {
    match (a.current_phase(), b.current_phase()) {
        (Phase::Capture, Phase::Protection) => Ordering::Less,
        (Phase::Protection, Phase::Capture) => Ordering::Greater,
        (Phase::Capture, Phase::Capture) => b.remaining_at(now).cmp(&a.remaining_at(now)),
        (Phase::Protection, Phase::Protection) => a.remaining_at(now).cmp(&b.remaining_at(now)),
    }
}

/// Sort clocks in place for display; ties keep their existing order
pub fn sort_for_display(clocks: &mut [&PhaseClock], now: DateTime<Utc>) {
    clocks.sort_by(|a, b| display_order(a, b, now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RemainingTime;
    use chrono::TimeZone;

    fn at(name: &str, phase: Phase, hours: u32, now: DateTime<Utc>) -> PhaseClock {
        PhaseClock::new(name, "g", phase, RemainingTime::new(0, hours, 0, 0), now)
    }

    #[test]
    fn capture_first_then_protection() {
        let now = Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap();
        let c = at("C", Phase::Protection, 1, now);
        let d = at("D", Phase::Protection, 5, now);
        let b = at("B", Phase::Capture, 2, now);
        let a = at("A", Phase::Capture, 10, now);

        let mut clocks = vec![&c, &d, &b, &a];
        sort_for_display(&mut clocks, now);

        let names: Vec<_> = clocks.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn ties_keep_registry_order() {
        let now = Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap();
        let first = at("first", Phase::Capture, 3, now);
        let second = at("second", Phase::Capture, 3, now);

        let mut clocks = vec![&first, &second];
        sort_for_display(&mut clocks, now);
        assert_eq!(clocks[0].name(), "first");
    }
}
