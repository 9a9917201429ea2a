//! Import and export documents

use chrono::NaiveDate;
use serde_json::Value;

use super::{from_records, to_records, ClockRecord};
use crate::{
    error::{StoreError, TimerError},
    state::PhaseClock,
};

/// Serialize every clock, in registry order, as a pretty JSON array
pub fn export_document(clocks: &[PhaseClock]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(&to_records(clocks)).map_err(StoreError::Encode)
}

/// Suggested download name for an export taken on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("timers-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Parse an import document into clocks.
///
/// The document must be a JSON array and every record must rehydrate;
/// otherwise nothing is returned.
pub fn parse_document(text: &str) -> Result<Vec<PhaseClock>, TimerError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TimerError::malformed(format!("document is not valid JSON: {}", e)))?;

    if !value.is_array() {
        return Err(TimerError::malformed("document is not a list of timers"));
    }

    let records: Vec<ClockRecord> = serde_json::from_value(value)
        .map_err(|e| TimerError::malformed(format!("invalid timer record: {}", e)))?;

    from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Phase, RemainingTime};
    use chrono::Utc;

    #[test]
    fn export_then_parse_keeps_clocks() {
        let now = Utc::now();
        let clocks = vec![
            PhaseClock::new("A", "g", Phase::Capture, RemainingTime::new(0, 2, 0, 0), now),
            PhaseClock::new("B", "h", Phase::Protection, RemainingTime::new(2, 0, 0, 0), now),
        ];
        let text = export_document(&clocks).unwrap();
        assert_eq!(parse_document(&text).unwrap(), clocks);
    }

    #[test]
    fn rejects_non_arrays_and_garbage() {
        assert!(matches!(
            parse_document(r#"{"id": "x"}"#),
            Err(TimerError::Malformed { .. })
        ));
        assert!(parse_document("not json").is_err());
        assert!(parse_document(r#"[{"id": "x"}]"#).is_err());
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_document("[]").unwrap().is_empty());
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 14).unwrap();
        assert_eq!(export_file_name(date), "timers-backup-2025-11-14.json");
    }
}
