//! Data models
//!
//! Meal completion records, dates, and tracker settings.

pub mod date;
mod day;
mod meal;
mod settings;

pub use date::{format_date, parse_date, InvalidDateError};
pub use day::{with_defaults, DayMap, DayRecord, StoredDay};
pub use meal::{MealKind, MealRecord};
pub use settings::{MealTimes, MealWindow, Settings};
