//! Single-date summary

use chrono::NaiveDate;
use serde::Serialize;

use super::{percentage, MEALS_PER_DAY};
use crate::models::{DayMap, MealKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

pub fn daily_stats(date: NaiveDate, days: &DayMap) -> DailyStats {
    let stored = days.get(&date);
    let done = |kind| stored.is_some_and(|day| day.is_completed(kind));
    let completed = stored.map_or(0, |day| day.completed_count());

    DailyStats {
        date,
        breakfast: done(MealKind::Breakfast),
        lunch: done(MealKind::Lunch),
        dinner: done(MealKind::Dinner),
        completed,
        total: MEALS_PER_DAY,
        percentage: percentage(completed, MEALS_PER_DAY),
    }
}
