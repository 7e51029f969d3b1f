//! Statistics module
//!
//! Pure reductions over a snapshot of stored days: period totals,
//! per-date summaries, and the monthly calendar breakdown.

pub mod calendar;
pub mod daily;
pub mod period;

pub use calendar::{monthly_breakdown, DayStats, MissCounts, MonthlyBreakdown};
pub use daily::{daily_stats, DailyStats};
pub use period::{compute_stats, Period, PeriodStats};

/// Meals expected per tracked day
pub const MEALS_PER_DAY: u32 = 3;

/// `part / whole` as a whole percentage, rounded half-up; 0 when `whole` is 0
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part);
    let whole = u64::from(whole);
    ((part * 200 + whole) / (whole * 2)) as u32
}
