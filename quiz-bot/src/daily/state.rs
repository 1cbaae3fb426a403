//! Durable daily-question state: when the last question was sent.
//!
//! Stored as a single JSON object `{"lastTime": <unix millis>}`. Writes go to a temp file that
//! is renamed over the target so a crash never leaves a half-written file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading or writing the state file.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("state file IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted daily schedule state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScheduleState {
    #[serde(rename = "lastTime", with = "chrono::serde::ts_milliseconds")]
    pub last_sent_at: DateTime<Utc>,
}

/// JSON file holding [`DailyScheduleState`].
#[derive(Debug, Clone)]
pub struct ScheduleStateStore {
    path: PathBuf,
}

impl ScheduleStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads the state. A missing file means nothing was ever sent and yields `Ok(None)`.
    pub async fn load(&self) -> Result<Option<DailyScheduleState>, StateError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No schedule state file yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_err(e)),
        };
        let state = serde_json::from_str(&raw).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Writes the state atomically (temp file + rename), creating the parent directory.
    pub async fn save(&self, state: &DailyScheduleState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_err(e))?;
            }
        }
        let json = serde_json::to_string(state).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_err(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), last_sent_at = %state.last_sent_at, "Schedule state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    /// **Test: the state file is `{"lastTime": <epoch millis>}`.**
    #[test]
    fn test_json_shape() {
        let state = DailyScheduleState {
            last_sent_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"lastTime":1700000000123}"#
        );
        let parsed: DailyScheduleState =
            serde_json::from_str(r#"{"lastTime":1700000000123}"#).unwrap();
        assert_eq!(parsed, state);
    }

    /// **Test: a missing file loads as no state.**
    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = ScheduleStateStore::new(dir.path().join("state.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    /// **Test: save creates parent dirs, leaves no temp file, and loads back.**
    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ScheduleStateStore::new(dir.path().join("nested/state.json"));
        let state = DailyScheduleState {
            last_sent_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        };

        store.save(&state).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(state));
        assert!(!dir.path().join("nested/state.json.tmp").exists());
    }

    /// **Test: unparsable content is a Json error.**
    #[tokio::test]
    async fn test_load_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ScheduleStateStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StateError::Json { .. }));
    }
}
