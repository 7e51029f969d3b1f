//! Meal model
//!
//! The three trackable meals of a day and their completion state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meal kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealKind {
    /// Every kind, in the order the day is eaten
    pub const ALL: [MealKind; 3] = [MealKind::Breakfast, MealKind::Lunch, MealKind::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealKind::Breakfast => "breakfast",
            MealKind::Lunch => "lunch",
            MealKind::Dinner => "dinner",
        }
    }

    /// Parse a meal kind, case-insensitively. Unknown names are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealKind::Breakfast),
            "lunch" => Some(MealKind::Lunch),
            "dinner" => Some(MealKind::Dinner),
            _ => None,
        }
    }
}

impl std::fmt::Display for MealKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion state of a single meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl MealRecord {
    /// A meal completed at `at`
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(at),
        }
    }

    /// Drop a stray timestamp on an incomplete meal so `completed_at` is only
    /// ever set alongside `completed`.
    pub fn normalized(&self) -> Self {
        if self.completed {
            self.clone()
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_kind() {
        assert_eq!(MealKind::parse("breakfast"), Some(MealKind::Breakfast));
        assert_eq!(MealKind::parse(" Lunch "), Some(MealKind::Lunch));
        assert_eq!(MealKind::parse("DINNER"), Some(MealKind::Dinner));
        assert_eq!(MealKind::parse("snack"), None);
        assert_eq!(MealKind::parse(""), None);
    }

    #[test]
    fn test_meal_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MealKind::Breakfast).unwrap();
        assert_eq!(json, "\"breakfast\"");
    }

    #[test]
    fn test_normalized_clears_stray_timestamp() {
        let stray = MealRecord {
            completed: false,
            completed_at: Some(Utc::now()),
        };
        assert_eq!(stray.normalized(), MealRecord::default());

        let done = MealRecord::completed_at(Utc::now());
        assert_eq!(done.normalized(), done);
    }

    #[test]
    fn test_deserialize_millisecond_utc_timestamp() {
        let record: MealRecord =
            serde_json::from_str(r#"{"completed": true, "completed_at": "2024-01-10T08:15:00.000Z"}"#)
                .unwrap();
        assert!(record.completed);
        assert!(record.completed_at.is_some());
    }
}
