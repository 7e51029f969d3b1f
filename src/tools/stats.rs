//! Statistics MCP Tools
//!
//! Period totals for the dashboard and the monthly calendar breakdown.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::meals::parse_date_param;
use crate::db::Database;
use crate::models::format_date;
use crate::stats::{compute_stats, monthly_breakdown, MonthlyBreakdown, Period, PeriodStats};

/// Response for get_stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub period: Period,
    pub start_date: String,
    #[serde(flatten)]
    pub stats: PeriodStats,
}

/// Response for get_all_stats
#[derive(Debug, Serialize)]
pub struct AllStatsResponse {
    pub start_date: String,
    pub today: String,
    pub daily: PeriodStats,
    pub weekly: PeriodStats,
    pub monthly: PeriodStats,
}

/// Response for get_calendar_month
#[derive(Debug, Serialize)]
pub struct CalendarMonthResponse {
    pub start_date: String,
    pub today: String,
    #[serde(flatten)]
    pub breakdown: MonthlyBreakdown,
}

pub(crate) fn parse_period(period: &str) -> Result<Period, String> {
    Period::parse(period)
        .ok_or_else(|| format!("Invalid period '{}': expected daily, weekly, or monthly", period))
}

/// Explicit start date, else the saved setting, else today
pub fn resolve_start_date(db: &Database, explicit: Option<&str>, today: NaiveDate) -> Result<NaiveDate, String> {
    if let Some(date) = explicit.filter(|s| !s.trim().is_empty()) {
        return parse_date_param(date);
    }

    db.with_settings(|settings| Ok(settings.get().effective_start_date(today)))
        .map_err(|e| format!("Settings error: {}", e))
}

// ============================================================================
// Stats Tools
// ============================================================================

/// Completed/expected meals for one period
pub fn get_stats(
    db: &Database,
    period: &str,
    start_date: Option<&str>,
    today: NaiveDate,
) -> Result<StatsResponse, String> {
    let period = parse_period(period)?;
    let start = resolve_start_date(db, start_date, today)?;

    let stats = db
        .with_records(|records| Ok(compute_stats(period, start, today, records.days())))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(StatsResponse {
        period,
        start_date: format_date(start),
        stats,
    })
}

/// Daily, weekly, and monthly stats in one call
pub fn get_all_stats(db: &Database, start_date: Option<&str>, today: NaiveDate) -> Result<AllStatsResponse, String> {
    let start = resolve_start_date(db, start_date, today)?;

    let [daily, weekly, monthly] = db
        .with_records(|records| {
            Ok(Period::ALL.map(|period| compute_stats(period, start, today, records.days())))
        })
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(AllStatsResponse {
        start_date: format_date(start),
        today: format_date(today),
        daily,
        weekly,
        monthly,
    })
}

/// Calendar breakdown for a month (defaults to the current month)
pub fn get_calendar_month(
    db: &Database,
    year: Option<i32>,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<CalendarMonthResponse, String> {
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| format!("Invalid month: {}-{:02}", year, month))?;

    let start = resolve_start_date(db, None, today)?;

    let breakdown = db
        .with_records(|records| Ok(monthly_breakdown(first, start, today, records.days())))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(CalendarMonthResponse {
        start_date: format_date(start),
        today: format_date(today),
        breakdown,
    })
}
