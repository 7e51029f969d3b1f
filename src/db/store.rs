//! Record store
//!
//! Meal completion records mirrored in memory and persisted to a single
//! JSON file. Every mutation writes the new state to disk before it is
//! installed in memory, so the cache never claims more than the file holds.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{with_defaults, DayMap, DayRecord, MealKind, MealRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    StorageRead { path: PathBuf, source: io::Error },

    #[error("Corrupt data file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    StorageWrite { path: PathBuf, source: io::Error },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Refusing to overwrite unreadable data file {path}; move it aside and restart")]
    WritesBlocked { path: PathBuf },
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct RecordStore {
    path: PathBuf,
    days: DayMap,
    load_warning: Option<String>,
    writes_blocked: bool,
}

impl RecordStore {
    /// Open the store at `path`, creating an empty file if none exists
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let days = if path.exists() {
            read_days(&path)?
        } else {
            let days = DayMap::new();
            persist(&path, &days)?;
            info!(path = %path.display(), "created empty meal data file");
            days
        };

        debug!(path = %path.display(), days = days.len(), "loaded meal records");

        Ok(Self {
            path,
            days,
            load_warning: None,
            writes_blocked: false,
        })
    }

    /// Open the store, degrading to an empty one if the file can't be loaded.
    ///
    /// An existing file that fails to load is moved aside to `<name>.corrupt`
    /// so the next write does not destroy it. If it can't be moved, the store
    /// refuses writes instead. The failure is kept as the store's load warning.
    pub fn open_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let err = match Self::open(&path) {
            Ok(store) => return store,
            Err(e) => e,
        };

        warn!(error = %err, "starting with an empty meal store");
        let mut load_warning = err.to_string();
        let mut writes_blocked = false;

        if path.exists() {
            let aside = corrupt_path(&path);
            match fs::rename(&path, &aside) {
                Ok(()) => {
                    warn!(path = %aside.display(), "unreadable data file preserved");
                    load_warning = format!("{} (moved to {})", load_warning, aside.display());
                }
                Err(rename_err) => {
                    warn!(error = %rename_err, "could not move data file aside; writes disabled");
                    load_warning = format!("{} (could not move aside: {}; writes disabled)", load_warning, rename_err);
                    writes_blocked = true;
                }
            }
        }

        Self {
            path,
            days: DayMap::new(),
            load_warning: Some(load_warning),
            writes_blocked,
        }
    }

    /// Whether mutations are refused because the data file is still in place
    pub fn writes_blocked(&self) -> bool {
        self.writes_blocked
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the store started empty, if it did
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Read-only snapshot of every stored day
    pub fn days(&self) -> &DayMap {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All three meals for `date`, defaults filled for anything unmarked
    pub fn get_day(&self, date: NaiveDate) -> DayRecord {
        with_defaults(self.days.get(&date))
    }

    /// Mark a meal completed now
    pub fn mark_complete(&mut self, date: NaiveDate, kind: MealKind) -> StoreResult<MealRecord> {
        self.mark_complete_at(date, kind, Utc::now())
    }

    /// Mark a meal completed at `at`. Repeating the call only refreshes the timestamp.
    pub fn mark_complete_at(
        &mut self,
        date: NaiveDate,
        kind: MealKind,
        at: DateTime<Utc>,
    ) -> StoreResult<MealRecord> {
        self.check_writable()?;
        let record = MealRecord::completed_at(at);

        let mut next = self.days.clone();
        next.entry(date).or_default().set(kind, record.clone());

        persist(&self.path, &next)?;
        self.days = next;

        info!(%date, meal = %kind, "meal marked complete");
        Ok(record)
    }

    /// Remove every record. Returns how many days were dropped.
    pub fn clear_all(&mut self) -> StoreResult<usize> {
        self.check_writable()?;
        let removed = self.days.len();

        persist(&self.path, &DayMap::new())?;
        self.days.clear();
        self.load_warning = None;

        info!(days = removed, "all meal data cleared");
        Ok(removed)
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.writes_blocked {
            return Err(StoreError::WritesBlocked {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

fn read_days(path: &Path) -> StoreResult<DayMap> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::StorageRead {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(DayMap::new());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn persist(path: &Path, days: &DayMap) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(days)?;
    write_atomic(path, json.as_bytes()).map_err(|source| StoreError::StorageWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// Write to a temp file beside `path`, fsync, then rename over `path`.
/// Temp filename includes PID to avoid cross-process collisions.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(format!(".tmp.{}", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
