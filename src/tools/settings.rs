//! Settings MCP Tools

use serde::{Deserialize, Serialize};

use super::meals::parse_date_param;
use crate::db::Database;
use crate::models::{MealTimes, MealWindow, Settings};

/// Partial meal window update; omitted ends keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealWindowUpdate {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealTimesUpdate {
    pub breakfast: Option<MealWindowUpdate>,
    pub lunch: Option<MealWindowUpdate>,
    pub dinner: Option<MealWindowUpdate>,
}

/// Response for update_settings
#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub success: bool,
    pub settings: Settings,
}

fn apply_window(current: &mut MealWindow, update: Option<MealWindowUpdate>) {
    if let Some(update) = update {
        if let Some(start) = update.start {
            current.start = start;
        }
        if let Some(end) = update.end {
            current.end = end;
        }
    }
}

fn apply_meal_times(current: &mut MealTimes, update: MealTimesUpdate) {
    apply_window(&mut current.breakfast, update.breakfast);
    apply_window(&mut current.lunch, update.lunch);
    apply_window(&mut current.dinner, update.dinner);
}

/// Get current tracker settings
pub fn get_settings(db: &Database) -> Result<Settings, String> {
    db.with_settings(|settings| Ok(settings.get().clone()))
        .map_err(|e| format!("Settings error: {}", e))
}

/// Update the start date and/or meal windows.
///
/// An empty `start_date` string clears the saved start date.
pub fn update_settings(
    db: &Database,
    start_date: Option<&str>,
    meal_times: Option<MealTimesUpdate>,
) -> Result<UpdateSettingsResponse, String> {
    let start_date = match start_date.map(str::trim) {
        Some("") => Some(None),
        Some(date) => Some(Some(parse_date_param(date)?)),
        None => None,
    };

    let settings = db
        .with_settings(|store| {
            let mut settings = store.get().clone();
            if let Some(start_date) = start_date {
                settings.start_date = start_date;
            }
            if let Some(update) = meal_times {
                apply_meal_times(&mut settings.meal_times, update);
            }
            store.save(settings.clone())?;
            Ok(settings)
        })
        .map_err(|e| format!("Failed to update settings: {}", e))?;

    Ok(UpdateSettingsResponse {
        success: true,
        settings,
    })
}
