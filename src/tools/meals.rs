//! Meal MCP Tools
//!
//! Reading and marking the three daily meals, and wiping all records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::models::{format_date, parse_date, DayRecord, MealKind};
use crate::stats::{daily_stats, DailyStats};

/// Response for get_meals
#[derive(Debug, Serialize)]
pub struct DayMealsResponse {
    pub date: String,
    #[serde(flatten)]
    pub meals: DayRecord,
    pub completed: u32,
}

/// Response for mark_meal_complete
#[derive(Debug, Serialize)]
pub struct MarkMealResponse {
    pub success: bool,
    pub date: String,
    pub meal_type: MealKind,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response for clear_all_data
#[derive(Debug, Serialize)]
pub struct ClearAllResponse {
    pub success: bool,
    pub message: String,
    pub days_removed: usize,
}

pub(crate) fn parse_meal_kind(meal_type: &str) -> Result<MealKind, String> {
    MealKind::parse(meal_type).ok_or_else(|| {
        format!(
            "Invalid meal type '{}': expected breakfast, lunch, or dinner",
            meal_type
        )
    })
}

pub(crate) fn parse_date_param(date: &str) -> Result<NaiveDate, String> {
    parse_date(date).map_err(|e| e.to_string())
}

// ============================================================================
// Meal Tools
// ============================================================================

/// Get all three meals for a date
pub fn get_meals(db: &Database, date: &str) -> Result<DayMealsResponse, String> {
    let date = parse_date_param(date)?;

    let meals = db
        .with_records(|records| Ok(records.get_day(date)))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(DayMealsResponse {
        date: format_date(date),
        completed: meals.completed_count(),
        meals,
    })
}

/// Mark a meal as completed for a date
pub fn mark_meal_complete(db: &Database, date: &str, meal_type: &str) -> Result<MarkMealResponse, String> {
    let date = parse_date_param(date)?;
    let kind = parse_meal_kind(meal_type)?;

    let record = db
        .with_records(|records| Ok(records.mark_complete(date, kind)?))
        .map_err(|e| format!("Failed to mark {} complete: {}", kind, e))?;

    Ok(MarkMealResponse {
        success: true,
        date: format_date(date),
        meal_type: kind,
        completed_at: record.completed_at,
    })
}

/// Per-date completion summary
pub fn get_daily_stats(db: &Database, date: &str) -> Result<DailyStats, String> {
    let date = parse_date_param(date)?;

    db.with_records(|records| Ok(daily_stats(date, records.days())))
        .map_err(|e| format!("Database error: {}", e))
}

/// Remove every meal record
pub fn clear_all_data(db: &Database) -> Result<ClearAllResponse, String> {
    let days_removed = db
        .with_records(|records| Ok(records.clear_all()?))
        .map_err(|e| format!("Failed to clear data: {}", e))?;

    Ok(ClearAllResponse {
        success: true,
        message: "All data cleared successfully".to_string(),
        days_removed,
    })
}
