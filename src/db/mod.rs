//! Database module
//!
//! JSON-file persistence for meal records and settings.

pub mod database;
pub mod settings;
pub mod store;

use std::path::PathBuf;

pub use database::{Database, DbError, DbResult, MEALS_FILE, SETTINGS_FILE};
pub use settings::{SettingsError, SettingsStore};
pub use store::{RecordStore, StoreError, StoreResult};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MEALTRACK_DATA_DIR";

/// Get the data directory from environment or use `<project>/data`
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path
        })
}
