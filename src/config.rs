//! User settings stored as JSON in `~/.placement-workspace/settings.json`.
//!
//! ```json
//! {
//!   "data_dir": null,
//!   "log_filter": "warn",
//!   "quota_bytes": 5242880,
//!   "progress": { "coding_profiles": 3, "dsa_pdfs": 5, ... }
//! }
//! ```
//!
//! Every field has a default, so a partial or missing file is fine. A file
//! that does not parse is reported rather than silently replaced.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::storage::{FileStorage, StorageError, write_atomic};

pub const APP_DIR: &str = ".placement-workspace";
pub const SETTINGS_FILE: &str = "settings.json";

/// Browsers commonly cap local storage at 5 MiB per origin.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one JSON document per storage key.
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Total bytes the data directory may hold; `null` disables the limit.
    pub quota_bytes: Option<u64>,
    pub progress: ProgressTargets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "warn".to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            progress: ProgressTargets::default(),
        }
    }
}

/// Goals shown by the dashboard progress tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressTargets {
    pub coding_profiles: u32,
    pub dsa_pdfs: u32,
    pub notes: u32,
    pub interviews: u32,
    pub projects: u32,
    pub hr_questions: u32,
    pub company_prep: u32,
}

impl Default for ProgressTargets {
    fn default() -> Self {
        Self {
            coding_profiles: 3,
            dsa_pdfs: 5,
            notes: 5,
            interviews: 3,
            projects: 3,
            hr_questions: 10,
            company_prep: 3,
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StorageError::Unavailable("couldn't find home dir".to_string()))?;
        Ok(home.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loaded settings");
                Ok(serde_json::from_str(&contents)?)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path, &content)
    }

    pub fn data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStorage::default_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"quota_bytes": null, "progress": {"projects": 6}}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.quota_bytes, None);
        assert_eq!(settings.progress.projects, 6);
        assert_eq!(settings.progress.dsa_pdfs, 5);
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            data_dir: Some(dir.path().join("data")),
            log_filter: "debug".into(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "quota = 1").unwrap();
        assert!(matches!(Settings::load(&path), Err(StorageError::Json(_))));
    }
}
