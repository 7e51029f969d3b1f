//! Meal Tracker Status Tool
//!
//! Provides runtime status information and the usage guide for assistants.

use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{Database, MEALS_FILE, SETTINGS_FILE};

/// Usage guide for AI assistants
pub const MEAL_TRACKER_INSTRUCTIONS: &str = r#"
# Meal Tracker Instructions

The meal tracker records whether breakfast, lunch, and dinner were eaten on
each day and reports adherence over time.

## Getting the Current Date

**IMPORTANT:** Dates are always `YYYY-MM-DD`. When the user says "today" or
"yesterday", do not guess the date. `get_all_stats` and `get_calendar_month`
report the server's local `today`; derive relative dates from it.

---

## Recording Meals

**Tool:** `mark_meal_complete`
- `date`: `YYYY-MM-DD`
- `meal_type`: `breakfast`, `lunch`, or `dinner`

Marking is idempotent in effect: marking an already completed meal keeps it
completed and refreshes `completed_at`. There is no "unmark"; to start over
use `clear_all_data`, which removes every record and cannot be undone.
Always confirm with the user before calling it.

**Tool:** `get_meals`
- Returns all three meals for a date. Days with no record show every meal
  as not completed.

---

## Statistics

**Tool:** `get_stats`
- `period`: `daily`, `weekly`, or `monthly`
- `start_date` (optional): overrides the saved tracking start date

Days before the tracking start date are never counted as missed, so a new
user is not penalized for the time before they started.

| Period  | Completed meals counted from      | Expected meals counted over            |
|---------|-----------------------------------|----------------------------------------|
| daily   | today                             | today (3)                              |
| weekly  | the Sunday on or before today     | the Monday after that Sunday, 7 days   |
| monthly | the 1st of the month              | the whole month from the start date    |

Expected totals cover the whole week or month, including days that have not
happened yet, so percentages grow as the period goes on.

**Tool:** `get_all_stats` returns all three periods at once.

**Tool:** `get_daily_stats` summarizes a single date.

**Tool:** `get_calendar_month`
- `year`, `month` (optional, default: current month)
- Per-day completion, miss counts per meal, the most-missed meal(s),
  perfect days, and the average daily score.

---

## Settings

**Tool:** `get_settings` / `update_settings`
- `start_date`: tracking start date (`""` clears it; unset means today)
- `meal_times`: `{ "breakfast": { "start": "07:00", "end": "10:00" }, ... }`

Meal windows are informational and do not change statistics.

---

## Reports

**Tool:** `generate_monthly_report`
- `year`, `month`, `output_path` (absolute path ending in `.pdf`)
- Writes a PDF with a summary, a per-day table, and a completion chart.
"#;

/// Runtime status of the meal tracker
#[derive(Debug, Clone, Serialize)]
pub struct MealTrackerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Data information
    pub data_dir: String,
    pub meals_file_size_bytes: Option<u64>,
    pub settings_file_size_bytes: Option<u64>,
    pub recorded_days: usize,
    pub load_warning: Option<String>,
    pub settings_load_warning: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database: Database,
}

impl StatusTracker {
    pub fn new(database: Database) -> Self {
        Self {
            start_time: Instant::now(),
            database,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> Result<MealTrackerStatus, String> {
        let build_info = BuildInfo::current();
        let data_dir = self.database.data_dir();

        let (recorded_days, load_warning) = self
            .database
            .with_records(|records| Ok((records.len(), records.load_warning().map(str::to_string))))
            .map_err(|e| format!("Database error: {}", e))?;
        let settings_load_warning = self
            .database
            .with_settings(|settings| Ok(settings.load_warning().map(str::to_string)))
            .map_err(|e| format!("Database error: {}", e))?;

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Ok(MealTrackerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            data_dir: data_dir.display().to_string(),
            meals_file_size_bytes: file_size(&data_dir.join(MEALS_FILE)),
            settings_file_size_bytes: file_size(&data_dir.join(SETTINGS_FILE)),
            recorded_days,
            load_warning,
            settings_load_warning,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, MealKind};

    #[test]
    fn test_status_reports_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        let date = parse_date("2024-01-10").unwrap();
        db.with_records(|r| Ok(r.mark_complete(date, MealKind::Lunch)?)).unwrap();

        let status = StatusTracker::new(db).get_status().unwrap();
        assert_eq!(status.recorded_days, 1);
        assert!(status.meals_file_size_bytes.unwrap() > 2);
        assert_eq!(status.settings_file_size_bytes, None);
        assert!(status.load_warning.is_none());
        assert!(status.settings_load_warning.is_none());
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_status_surfaces_load_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MEALS_FILE), "{ not json").unwrap();

        let db = Database::open(dir.path()).unwrap();
        let status = StatusTracker::new(db).get_status().unwrap();
        assert!(status.load_warning.is_some());
        assert_eq!(status.recorded_days, 0);
    }

    #[test]
    fn test_status_surfaces_settings_load_warning() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{\"start_date\": 5").unwrap();

        let db = Database::open(dir.path()).unwrap();
        let status = StatusTracker::new(db).get_status().unwrap();
        assert!(status.load_warning.is_none());
        assert!(status.settings_load_warning.unwrap().contains("settings.json.corrupt"));
    }

    #[test]
    fn test_instructions_only_name_own_tools() {
        assert!(!MEAL_TRACKER_INSTRUCTIONS.contains("ucm_"));
        assert!(MEAL_TRACKER_INSTRUCTIONS.contains("get_all_stats"));
    }

    #[test]
    fn test_instructions_cover_every_tool() {
        for tool in [
            "mark_meal_complete",
            "get_meals",
            "get_stats",
            "clear_all_data",
            "get_calendar_month",
            "update_settings",
            "generate_monthly_report",
        ] {
            assert!(MEAL_TRACKER_INSTRUCTIONS.contains(tool), "missing {}", tool);
        }
    }
}
