//! Day model
//!
//! A stored day holds only the meals that were ever marked; the full
//! `DayRecord` view is rebuilt with defaults at the store boundary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MealKind, MealRecord};

/// All stored days, keyed by calendar date
pub type DayMap = BTreeMap<NaiveDate, StoredDay>;

/// A day as persisted in `meals.json`; unmarked meals are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<MealRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<MealRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<MealRecord>,
}

impl StoredDay {
    pub fn get(&self, kind: MealKind) -> Option<&MealRecord> {
        match kind {
            MealKind::Breakfast => self.breakfast.as_ref(),
            MealKind::Lunch => self.lunch.as_ref(),
            MealKind::Dinner => self.dinner.as_ref(),
        }
    }

    pub fn set(&mut self, kind: MealKind, record: MealRecord) {
        let slot = match kind {
            MealKind::Breakfast => &mut self.breakfast,
            MealKind::Lunch => &mut self.lunch,
            MealKind::Dinner => &mut self.dinner,
        };
        *slot = Some(record);
    }

    pub fn is_completed(&self, kind: MealKind) -> bool {
        self.get(kind).is_some_and(|m| m.completed)
    }

    /// Number of completed meals (0..=3)
    pub fn completed_count(&self) -> u32 {
        MealKind::ALL
            .iter()
            .filter(|kind| self.is_completed(**kind))
            .count() as u32
    }
}

/// The three meals of one date, every kind present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub breakfast: MealRecord,
    pub lunch: MealRecord,
    pub dinner: MealRecord,
}

impl DayRecord {
    pub fn get(&self, kind: MealKind) -> &MealRecord {
        match kind {
            MealKind::Breakfast => &self.breakfast,
            MealKind::Lunch => &self.lunch,
            MealKind::Dinner => &self.dinner,
        }
    }

    pub fn completed_count(&self) -> u32 {
        MealKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).completed)
            .count() as u32
    }
}

/// Fill every meal kind missing from `partial` with an incomplete record
pub fn with_defaults(partial: Option<&StoredDay>) -> DayRecord {
    let fill = |kind: MealKind| {
        partial
            .and_then(|day| day.get(kind))
            .map(MealRecord::normalized)
            .unwrap_or_default()
    };

    DayRecord {
        breakfast: fill(MealKind::Breakfast),
        lunch: fill(MealKind::Lunch),
        dinner: fill(MealKind::Dinner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_with_defaults_on_missing_day() {
        let day = with_defaults(None);
        for kind in MealKind::ALL {
            assert!(!day.get(kind).completed);
            assert!(day.get(kind).completed_at.is_none());
        }
    }

    #[test]
    fn test_with_defaults_keeps_stored_meals() {
        let mut stored = StoredDay::default();
        stored.set(MealKind::Lunch, MealRecord::completed_at(Utc::now()));

        let day = with_defaults(Some(&stored));
        assert!(!day.breakfast.completed);
        assert!(day.lunch.completed);
        assert!(day.lunch.completed_at.is_some());
        assert!(!day.dinner.completed);
        assert_eq!(day.completed_count(), 1);
    }

    #[test]
    fn test_stored_day_omits_unmarked_meals() {
        let mut stored = StoredDay::default();
        stored.set(MealKind::Dinner, MealRecord::completed_at(Utc::now()));

        let json = serde_json::to_value(&stored).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("dinner"));
    }

    #[test]
    fn test_stored_day_ignores_unknown_keys() {
        let stored: StoredDay = serde_json::from_str(
            r#"{"breakfast": {"completed": true, "completed_at": null}, "snack": {"completed": true}}"#,
        )
        .unwrap();
        assert!(stored.is_completed(MealKind::Breakfast));
        assert_eq!(stored.completed_count(), 1);
    }
}
