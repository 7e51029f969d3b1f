//! Settings persistence
//!
//! Tracker settings live in their own `settings.json`, apart from the meal
//! records, and are written with the same temp-file-and-rename scheme.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::store::{corrupt_path, write_atomic};
use crate::models::Settings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write settings {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Refusing to overwrite unreadable settings file {path}; move it aside and restart")]
    WritesBlocked { path: PathBuf },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    load_warning: Option<String>,
    writes_blocked: bool,
}

impl SettingsStore {
    /// Load settings from `path`; a missing file yields defaults
    pub fn load<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();

        let settings = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            settings,
            load_warning: None,
            writes_blocked: false,
        })
    }

    /// Load settings, falling back to defaults when the file is unreadable.
    ///
    /// The unreadable file goes to `settings.json.corrupt`, the same way the
    /// record store handles `meals.json`; saves are refused if it can't be moved.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let err = match Self::load(&path) {
            Ok(store) => return store,
            Err(e) => e,
        };

        warn!(error = %err, "using default settings");
        let mut load_warning = err.to_string();
        let mut writes_blocked = false;

        if path.exists() {
            let aside = corrupt_path(&path);
            match fs::rename(&path, &aside) {
                Ok(()) => {
                    load_warning = format!("{} (moved to {})", load_warning, aside.display());
                }
                Err(rename_err) => {
                    warn!(error = %rename_err, "could not move settings file aside; saves disabled");
                    load_warning = format!("{} (could not move aside: {}; saves disabled)", load_warning, rename_err);
                    writes_blocked = true;
                }
            }
        }

        Self {
            path,
            settings: Settings::default(),
            load_warning: Some(load_warning),
            writes_blocked,
        }
    }

    /// Why defaults are in use, if the settings file could not be loaded
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Validate and persist `settings`, then make them current
    pub fn save(&mut self, settings: Settings) -> SettingsResult<()> {
        if self.writes_blocked {
            return Err(SettingsError::WritesBlocked {
                path: self.path.clone(),
            });
        }
        settings.meal_times.validate().map_err(SettingsError::Invalid)?;

        let json = serde_json::to_string_pretty(&settings)?;
        write_atomic(&self.path, json.as_bytes()).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(start_date = ?settings.start_date, "settings saved");
        self.settings = settings;
        self.load_warning = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, MealWindow};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), &Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path).unwrap();
        let settings = Settings {
            start_date: Some(parse_date("2024-01-10").unwrap()),
            ..Settings::default()
        };
        store.save(settings.clone()).unwrap();

        let reloaded = SettingsStore::load(&path).unwrap();
        assert_eq!(reloaded.get(), &settings);

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["start_date"], "2024-01-10");
    }

    #[test]
    fn test_save_rejects_bad_meal_times() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::load(dir.path().join("settings.json")).unwrap();

        let mut settings = Settings::default();
        settings.meal_times.lunch = MealWindow {
            start: "noon".to_string(),
            end: "14:00".to_string(),
        };

        let err = store.save(settings).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert_eq!(store.get(), &Settings::default());
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(SettingsStore::load(&path), Err(SettingsError::Parse { .. })));
        let mut store = SettingsStore::load_or_default(&path);
        assert_eq!(store.get(), &Settings::default());
        assert!(store.load_warning().unwrap().contains("Invalid settings file"));
        assert_eq!(
            fs::read_to_string(dir.path().join("settings.json.corrupt")).unwrap(),
            "[1, 2"
        );

        store.save(Settings::default()).unwrap();
        assert!(store.load_warning().is_none());
        assert_eq!(fs::read_to_string(dir.path().join("settings.json.corrupt")).unwrap(), "[1, 2");
    }

    #[test]
    fn test_load_or_default_refuses_saves_when_file_stays_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ bad").unwrap();
        let aside = dir.path().join("settings.json.corrupt");
        fs::create_dir(&aside).unwrap();
        fs::write(aside.join("keep"), "x").unwrap();

        let mut store = SettingsStore::load_or_default(&path);
        assert!(store.load_warning().unwrap().contains("saves disabled"));

        let err = store.save(Settings::default()).unwrap_err();
        assert!(matches!(err, SettingsError::WritesBlocked { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ bad");
    }
}
