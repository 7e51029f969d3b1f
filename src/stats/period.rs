//! Period statistics
//!
//! Completed versus expected meal counts for the current day, week, or month.
//!
//! Two windows are involved. The *filter* window decides which stored meals
//! count as completed and always ends at `today`. The *expected* window
//! decides the denominator and is clipped to the tracking start date:
//!
//! | period  | filter starts at            | expected window                            |
//! |---------|-----------------------------|--------------------------------------------|
//! | daily   | today                       | one day                                    |
//! | weekly  | Sunday on or before today   | Monday after that Sunday..+6 days, clipped |
//! | monthly | first of today's month      | max(start, month start)..max(start, end)   |
//!
//! On a Sunday the weekly expected window is the week that starts tomorrow.
//!
//! Every expected window is floored at one day.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{percentage, MEALS_PER_DAY};
use crate::models::date::{first_of_month, inclusive_days, last_of_month, monday_after_sunday, sunday_on_or_before};
use crate::models::DayMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            _ => None,
        }
    }

    /// First date whose completed meals are counted
    pub fn filter_start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Daily => today,
            Period::Weekly => sunday_on_or_before(today),
            Period::Monthly => first_of_month(today),
        }
    }

    /// Window of days whose meals are expected, before the one-day floor
    pub fn expected_window(&self, start_date: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Daily => (today, today),
            Period::Weekly => {
                let week_start = monday_after_sunday(today);
                let week_end = week_start + Duration::days(6);
                if start_date < week_start {
                    (week_start, week_end)
                } else if start_date <= week_end {
                    (start_date, week_end)
                } else {
                    (start_date, start_date)
                }
            }
            Period::Monthly => {
                let month_start = first_of_month(today);
                let month_end = last_of_month(today);
                (start_date.max(month_start), start_date.max(month_end))
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Compute completed/expected totals for `period`.
///
/// `completed` is not clipped to `start_date`; callers wanting only tracked
/// days must filter the snapshot first.
pub fn compute_stats(period: Period, start_date: NaiveDate, today: NaiveDate, days: &DayMap) -> PeriodStats {
    let filter_start = period.filter_start(today);

    let completed: u32 = days
        .range(filter_start..=today)
        .map(|(_, day)| day.completed_count())
        .sum();

    let total = match period {
        Period::Daily => MEALS_PER_DAY,
        Period::Weekly | Period::Monthly => {
            let (from, to) = period.expected_window(start_date, today);
            let day_count = inclusive_days(from, to).max(1);
            day_count as u32 * MEALS_PER_DAY
        }
    };

    tracing::debug!(
        period = %period,
        %start_date,
        %today,
        %filter_start,
        completed,
        total,
        "computed period stats"
    );

    PeriodStats {
        completed,
        total,
        percentage: percentage(completed, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, MealKind, MealRecord, StoredDay};
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn day_with(kinds: &[MealKind]) -> StoredDay {
        let mut day = StoredDay::default();
        for kind in kinds {
            day.set(*kind, MealRecord::completed_at(Utc::now()));
        }
        day
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("Weekly"), Some(Period::Weekly));
        assert_eq!(Period::parse("yearly"), None);
    }

    #[test]
    fn test_daily_one_of_three() {
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(today, day_with(&[MealKind::Breakfast]));

        let stats = compute_stats(Period::Daily, d("2024-01-01"), today, &days);
        assert_eq!(stats, PeriodStats { completed: 1, total: 3, percentage: 33 });
    }

    #[test]
    fn test_daily_ignores_other_dates() {
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(d("2024-01-09"), day_with(&MealKind::ALL));
        days.insert(d("2024-01-11"), day_with(&MealKind::ALL));
        days.insert(today, day_with(&[MealKind::Lunch, MealKind::Dinner]));

        let stats = compute_stats(Period::Daily, today, today, &days);
        assert_eq!(stats, PeriodStats { completed: 2, total: 3, percentage: 67 });
    }

    #[test]
    fn test_weekly_start_before_week_uses_full_week() {
        // Wednesday; ISO week is 2024-01-08..=2024-01-14
        let today = d("2024-01-10");
        let stats = compute_stats(Period::Weekly, d("2023-12-01"), today, &DayMap::new());
        assert_eq!(stats.total, 21);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_weekly_start_inside_week_clips_window() {
        let today = d("2024-01-10");
        let stats = compute_stats(Period::Weekly, d("2024-01-10"), today, &DayMap::new());
        // 2024-01-10..=2024-01-14
        assert_eq!(stats.total, 15);
    }

    #[test]
    fn test_weekly_start_after_week_collapses_to_one_day() {
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(today, day_with(&[MealKind::Breakfast, MealKind::Lunch]));

        let stats = compute_stats(Period::Weekly, d("2024-02-01"), today, &days);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.percentage, 67);
    }

    #[test]
    fn test_weekly_filter_starts_on_sunday() {
        // Sunday 2024-01-07 is inside the filter but before the week's Monday
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(d("2024-01-06"), day_with(&MealKind::ALL));
        days.insert(d("2024-01-07"), day_with(&MealKind::ALL));
        days.insert(d("2024-01-08"), day_with(&[MealKind::Dinner]));

        let stats = compute_stats(Period::Weekly, d("2024-01-01"), today, &days);
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.total, 21);
        assert_eq!(stats.percentage, 19);
    }

    #[test]
    fn test_weekly_total_on_sunday_uses_following_week() {
        // Sunday: the expected window is Monday 2024-01-15..=Sunday 2024-01-21
        let today = d("2024-01-14");
        let mut days = DayMap::new();
        days.insert(d("2024-01-13"), day_with(&MealKind::ALL));
        days.insert(today, day_with(&[MealKind::Breakfast]));

        let started_today = compute_stats(Period::Weekly, today, today, &days);
        assert_eq!(started_today, PeriodStats { completed: 1, total: 21, percentage: 5 });

        let started_earlier = compute_stats(Period::Weekly, d("2024-01-09"), today, &days);
        assert_eq!(started_earlier.total, 21);
        assert_eq!(started_earlier.completed, 1);

        // 2024-01-17..=2024-01-21
        let starts_midweek = compute_stats(Period::Weekly, d("2024-01-17"), today, &days);
        assert_eq!(starts_midweek.total, 15);
    }

    #[test]
    fn test_weekly_counts_records_before_start_date() {
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(d("2024-01-08"), day_with(&MealKind::ALL));

        let stats = compute_stats(Period::Weekly, d("2024-01-10"), today, &days);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.total, 15);
    }

    #[test]
    fn test_monthly_full_month() {
        let today = d("2024-02-10");
        let stats = compute_stats(Period::Monthly, d("2024-01-01"), today, &DayMap::new());
        assert_eq!(stats.total, 29 * 3);
    }

    #[test]
    fn test_monthly_start_mid_month_includes_future_days() {
        let today = d("2024-01-10");
        let stats = compute_stats(Period::Monthly, d("2024-01-10"), today, &DayMap::new());
        // 2024-01-10..=2024-01-31
        assert_eq!(stats.total, 22 * 3);
    }

    #[test]
    fn test_monthly_future_start_date_clamps_to_one_day() {
        let today = d("2024-01-10");
        let stats = compute_stats(Period::Monthly, d("2024-03-15"), today, &DayMap::new());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_monthly_completed_excludes_future_records() {
        let today = d("2024-01-10");
        let mut days = DayMap::new();
        days.insert(d("2024-01-01"), day_with(&MealKind::ALL));
        days.insert(d("2024-01-10"), day_with(&[MealKind::Lunch]));
        days.insert(d("2024-01-11"), day_with(&MealKind::ALL));
        days.insert(d("2023-12-31"), day_with(&MealKind::ALL));

        let stats = compute_stats(Period::Monthly, d("2024-01-01"), today, &days);
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.total, 93);
        assert_eq!(stats.percentage, 4);
    }

    #[test]
    fn test_today_before_start_date_never_divides_by_zero() {
        let today = d("2024-01-10");
        for period in Period::ALL {
            let stats = compute_stats(period, d("2025-06-01"), today, &DayMap::new());
            assert!(stats.total >= 3, "{period} total {}", stats.total);
            assert_eq!(stats.percentage, 0);
        }
    }
}
