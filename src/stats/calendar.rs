//! Calendar aggregation
//!
//! Per-day cells and miss statistics for one month of the calendar view.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{percentage, MEALS_PER_DAY};
use crate::models::date::{first_of_month, inclusive_days, last_of_month, month_days};
use crate::models::{DayMap, MealKind};

/// One calendar cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
    pub breakfast: bool,
    pub lunch: bool,
    pub dinner: bool,
    /// Before the tracking start date; rendered apart, never as missed
    pub before_start: bool,
    pub is_future: bool,
}

/// A count per meal kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissCounts {
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
}

impl MissCounts {
    pub fn get(&self, kind: MealKind) -> u32 {
        match kind {
            MealKind::Breakfast => self.breakfast,
            MealKind::Lunch => self.lunch,
            MealKind::Dinner => self.dinner,
        }
    }

    fn increment(&mut self, kind: MealKind) {
        match kind {
            MealKind::Breakfast => self.breakfast += 1,
            MealKind::Lunch => self.lunch += 1,
            MealKind::Dinner => self.dinner += 1,
        }
    }

    fn map(&self, f: impl Fn(u32) -> u32) -> Self {
        Self {
            breakfast: f(self.breakfast),
            lunch: f(self.lunch),
            dinner: f(self.dinner),
        }
    }

    /// Kinds ordered from most to least missed; ties keep meal order
    pub fn most_missed(&self) -> Vec<MealKind> {
        let mut kinds = MealKind::ALL.to_vec();
        kinds.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        kinds
    }

    /// Kinds sharing the highest miss count; empty when nothing was missed
    pub fn top_missed(&self) -> Vec<MealKind> {
        let max = MealKind::ALL.iter().map(|k| self.get(*k)).max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        MealKind::ALL
            .into_iter()
            .filter(|k| self.get(*k) == max)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdown {
    pub year: i32,
    pub month: u32,
    /// Keyed by day of month (1-based)
    pub per_day: BTreeMap<u32, DayStats>,
    pub miss_counts: MissCounts,
    /// `miss_counts` as a share of `total_tracked_days`
    pub miss_percentages: MissCounts,
    pub most_missed: Vec<MealKind>,
    /// Stored dates of the month inside `[start_date, today]`
    pub total_tracked_days: u32,
    /// Days from the start date through today, whether or not data exists
    pub expected_days: u32,
    pub perfect_days: u32,
    /// Average completed meals per tracked day, times 100 (0..=300)
    pub average_daily_score: u32,
    /// Share of the tracked days' meals that were completed (0..=100)
    pub completion_rate: u32,
}

/// Build the calendar breakdown for the month containing `month`.
pub fn monthly_breakdown(
    month: NaiveDate,
    start_date: NaiveDate,
    today: NaiveDate,
    days: &DayMap,
) -> MonthlyBreakdown {
    let month_start = first_of_month(month);
    let month_end = last_of_month(month);

    let per_day = month_days(month_start.year(), month_start.month())
        .into_iter()
        .flatten()
        .map(|date| (date.day(), day_stats(date, start_date, today, days)))
        .collect();

    let mut miss_counts = MissCounts::default();
    let mut total_tracked_days = 0u32;
    let mut perfect_days = 0u32;
    let mut completed_sum = 0u32;

    for (date, day) in days.range(month_start..=month_end) {
        if *date < start_date || *date > today {
            continue;
        }
        total_tracked_days += 1;

        let completed = day.completed_count();
        completed_sum += completed;
        if completed == MEALS_PER_DAY {
            perfect_days += 1;
        }

        for kind in MealKind::ALL {
            if !day.is_completed(kind) {
                miss_counts.increment(kind);
            }
        }
    }

    let expected_days = inclusive_days(start_date, today).max(0) as u32;

    MonthlyBreakdown {
        year: month_start.year(),
        month: month_start.month(),
        per_day,
        miss_counts,
        miss_percentages: miss_counts.map(|count| percentage(count, total_tracked_days)),
        most_missed: miss_counts.most_missed(),
        total_tracked_days,
        expected_days,
        perfect_days,
        average_daily_score: percentage(completed_sum, total_tracked_days),
        completion_rate: percentage(completed_sum, total_tracked_days * MEALS_PER_DAY),
    }
}

fn day_stats(date: NaiveDate, start_date: NaiveDate, today: NaiveDate, days: &DayMap) -> DayStats {
    let is_future = date > today;

    if date < start_date {
        return DayStats {
            date,
            completed: 0,
            total: 0,
            breakfast: false,
            lunch: false,
            dinner: false,
            before_start: true,
            is_future,
        };
    }

    let stored = days.get(&date);
    let done = |kind| stored.is_some_and(|day| day.is_completed(kind));

    DayStats {
        date,
        completed: stored.map_or(0, |day| day.completed_count()),
        total: MEALS_PER_DAY,
        breakfast: done(MealKind::Breakfast),
        lunch: done(MealKind::Lunch),
        dinner: done(MealKind::Dinner),
        before_start: false,
        is_future,
    }
}
