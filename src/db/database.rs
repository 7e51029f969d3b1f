//! Shared data handle
//!
//! Bundles the record store and the settings behind mutexes so the MCP
//! service can be cloned freely while every access stays serialized.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::settings::{SettingsError, SettingsStore};
use super::store::{RecordStore, StoreError};

pub const MEALS_FILE: &str = "meals.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Data lock poisoned")]
    LockPoisoned,
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone)]
pub struct Database {
    data_dir: PathBuf,
    records: Arc<Mutex<RecordStore>>,
    settings: Arc<Mutex<SettingsStore>>,
}

impl Database {
    /// Open the data directory, creating it if needed.
    ///
    /// Unreadable data files do not fail the open: the store starts empty and
    /// reports the problem through `RecordStore::load_warning` and
    /// `SettingsStore::load_warning`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> DbResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|source| DbError::DataDir {
            path: data_dir.clone(),
            source,
        })?;

        let records = RecordStore::open_or_empty(data_dir.join(MEALS_FILE));
        let settings = SettingsStore::load_or_default(data_dir.join(SETTINGS_FILE));

        Ok(Self {
            data_dir,
            records: Arc::new(Mutex::new(records)),
            settings: Arc::new(Mutex::new(settings)),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Execute a closure with exclusive access to the record store
    pub fn with_records<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut RecordStore) -> DbResult<T>,
    {
        let mut records = self.records.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut records)
    }

    /// Execute a closure with exclusive access to the settings
    pub fn with_settings<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut SettingsStore) -> DbResult<T>,
    {
        let mut settings = self.settings.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut settings)
    }
}
