//! Tracker settings
//!
//! The tracking start date plus the meal time windows shown to the user.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::MealKind;

const TIME_FORMAT: &str = "%H:%M";

/// A meal's expected time window, as `HH:MM` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindow {
    pub start: String,
    pub end: String,
}

impl MealWindow {
    fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Check both ends parse as `HH:MM` and the window is not inverted
    pub fn validate(&self) -> Result<(), String> {
        let start = NaiveTime::parse_from_str(&self.start, TIME_FORMAT)
            .map_err(|_| format!("Invalid start time '{}': expected HH:MM", self.start))?;
        let end = NaiveTime::parse_from_str(&self.end, TIME_FORMAT)
            .map_err(|_| format!("Invalid end time '{}': expected HH:MM", self.end))?;
        if end < start {
            return Err(format!("Window {}-{} ends before it starts", self.start, self.end));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTimes {
    pub breakfast: MealWindow,
    pub lunch: MealWindow,
    pub dinner: MealWindow,
}

impl MealTimes {
    pub fn get(&self, kind: MealKind) -> &MealWindow {
        match kind {
            MealKind::Breakfast => &self.breakfast,
            MealKind::Lunch => &self.lunch,
            MealKind::Dinner => &self.dinner,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for kind in MealKind::ALL {
            self.get(kind)
                .validate()
                .map_err(|e| format!("{}: {}", kind, e))?;
        }
        Ok(())
    }
}

impl Default for MealTimes {
    fn default() -> Self {
        Self {
            breakfast: MealWindow::new("07:00", "10:00"),
            lunch: MealWindow::new("12:00", "14:00"),
            dinner: MealWindow::new("18:00", "21:00"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Days before this date are never counted as missed
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub meal_times: MealTimes,
}

impl Settings {
    /// Start date to use for statistics; an unset start date means tracking begins today
    pub fn effective_start_date(&self, today: NaiveDate) -> NaiveDate {
        self.start_date.unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_meal_times_are_valid() {
        assert!(MealTimes::default().validate().is_ok());
    }

    #[test]
    fn test_window_validation() {
        assert!(MealWindow::new("7am", "10:00").validate().is_err());
        assert!(MealWindow::new("10:00", "07:00").validate().is_err());
        assert!(MealWindow::new("06:30", "06:30").validate().is_ok());
    }

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"start_date": "2024-01-10"}"#).unwrap();
        assert_eq!(settings.start_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(settings.meal_times, MealTimes::default());
    }

    #[test]
    fn test_effective_start_date_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(Settings::default().effective_start_date(today), today);
    }
}
