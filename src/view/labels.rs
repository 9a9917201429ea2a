//! Display strings used in projections

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::StoreError, state::Phase};

/// Every user-facing string a projection carries.
///
/// Defaults are English; a JSON file can override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub protection: String,
    pub capture: String,
    pub protection_description: String,
    pub capture_description: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            protection: "Protected".to_string(),
            capture: "Capturable".to_string(),
            protection_description: "3-day protection".to_string(),
            capture_description: "1-day capture window".to_string(),
        }
    }
}

impl Labels {
    /// Load overrides from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn phase_name(&self, phase: Phase) -> &str {
        match phase {
            Phase::Protection => &self.protection,
            Phase::Capture => &self.capture,
        }
    }

    pub fn phase_description(&self, phase: Phase) -> &str {
        match phase {
            Phase::Protection => &self.protection_description,
            Phase::Capture => &self.capture_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, r#"{"capture": "쟁탈 가능 상태"}"#).unwrap();

        let labels = Labels::from_file(&path).unwrap();
        assert_eq!(labels.phase_name(Phase::Capture), "쟁탈 가능 상태");
        assert_eq!(labels.phase_name(Phase::Protection), "Protected");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Labels::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(Labels::from_file(&path), Err(StoreError::Parse { .. })));
    }
}
