//! Calendar date helpers
//!
//! Dates travel as `YYYY-MM-DD` strings with no time or timezone part.

use chrono::{Datelike, Duration, Local, NaiveDate};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date '{input}': expected YYYY-MM-DD")]
pub struct InvalidDateError {
    pub input: String,
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDateError> {
    let trimmed = input.trim();
    let invalid = || InvalidDateError {
        input: input.to_string(),
    };

    // chrono accepts unpadded fields; the storage keys never are
    if trimmed.len() != 10 {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Days in `start..=end`; zero or negative when `end` precedes `start`
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    // December 31 of the last representable year has no successor month
    next_first.map_or(first, |next| next - Duration::days(1))
}

/// Most recent Sunday on or before `date`
pub fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Monday after the most recent Sunday on or before `date`.
///
/// Matches the ISO Monday on every day except Sunday, where it is the next day.
pub fn monday_after_sunday(date: NaiveDate) -> NaiveDate {
    sunday_on_or_before(date) + Duration::days(1)
}

/// Iterate every date of the month `year`-`month`
pub fn month_days(year: i32, month: u32) -> Option<impl Iterator<Item = NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = last_of_month(first);
    Some(first.iter_days().take_while(move |d| *d <= last))
}
