//! JSON persistence for assessment results and simulation summaries.
//!
//! | Record | File name |
//! |--------|-----------|
//! | Assessment | `dKI_assessment_<unix-secs>.json` |
//! | Monte Carlo summary | `dKI_montecarlo_<trials>_<unix-secs>.json` |

use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::StorageError;

/// Seconds since the Unix epoch, used to keep output names unique.
pub fn timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn assessment_file_name(timestamp: u64) -> String {
    format!("dKI_assessment_{}.json", timestamp)
}

pub fn simulation_file_name(num_trials: usize, timestamp: u64) -> String {
    format!("dKI_montecarlo_{}_{}.json", num_trials, timestamp)
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_names() {
        assert_eq!(assessment_file_name(1700000000), "dKI_assessment_1700000000.json");
        assert_eq!(
            simulation_file_name(1000, 1700000000),
            "dKI_montecarlo_1000_1700000000.json"
        );
    }

    #[test]
    fn test_save_json_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        save_json(&json!({"recommended_scheme": "One"}), &path).unwrap();
        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["recommended_scheme"], "One");
    }

    #[test]
    fn test_save_json_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file where a directory is expected.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = save_json(&json!({}), &blocker.join("out.json")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
