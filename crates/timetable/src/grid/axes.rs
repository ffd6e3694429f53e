/// The fixed enumerations a grid is laid out along
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::GridError;
use super::types::Day;

/// Ordered days, classes and time slots, plus the designated break slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Axes {
    pub days: Vec<Day>,
    pub classes: Vec<String>,
    pub time_slots: Vec<String>,
    /// Must be one of `time_slots`; never holds content in a grid
    pub break_slot: Option<String>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            days: Day::ALL.to_vec(),
            classes: ["MCA I", "MCA II", "BCA I", "BCA II"]
                .into_iter()
                .map(String::from)
                .collect(),
            time_slots: [
                "9:00 to 10:00",
                "10:00 to 11:00",
                "11:15 to 12:15",
                "12:15 to 1:15",
                "1:15 to 2:00",
                "2:00 to 3:00",
                "3:00 to 4:00",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            break_slot: Some("1:15 to 2:00".to_string()),
        }
    }
}

impl Axes {
    /// Returns true if `time` is the designated break slot.
    pub fn is_break_slot(&self, time: &str) -> bool {
        self.break_slot.as_deref() == Some(time)
    }

    pub fn day_position(&self, day: Day) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    pub fn class_position(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    pub fn slot_position(&self, time: &str) -> Option<usize> {
        self.time_slots.iter().position(|t| t == time)
    }

    /// Checks that every axis is non-empty, free of duplicates, and that the
    /// break slot (if any) is one of the time slots.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.days.is_empty() || self.classes.is_empty() || self.time_slots.is_empty() {
            return Err(GridError::InvalidAxes {
                message: "days, classes and time slots must all be non-empty".to_string(),
            });
        }

        let mut seen_days = HashSet::new();
        if let Some(day) = self.days.iter().find(|d| !seen_days.insert(**d)) {
            return Err(GridError::InvalidAxes {
                message: format!("duplicate day {day}"),
            });
        }
        if let Some(class) = first_duplicate(&self.classes) {
            return Err(GridError::InvalidAxes {
                message: format!("duplicate class {class:?}"),
            });
        }
        if let Some(slot) = first_duplicate(&self.time_slots) {
            return Err(GridError::InvalidAxes {
                message: format!("duplicate time slot {slot:?}"),
            });
        }

        if let Some(ref break_slot) = self.break_slot {
            if self.slot_position(break_slot).is_none() {
                return Err(GridError::InvalidAxes {
                    message: format!("break slot {break_slot:?} is not a configured time slot"),
                });
            }
        }

        Ok(())
    }
}

fn first_duplicate(values: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .find(|v| !seen.insert(v.as_str()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axes_are_valid() {
        let axes = Axes::default();
        assert!(axes.validate().is_ok());
        assert!(axes.is_break_slot("1:15 to 2:00"));
        assert!(!axes.is_break_slot("9:00 to 10:00"));
    }

    #[test]
    fn test_break_slot_must_be_a_time_slot() {
        let axes = Axes {
            break_slot: Some("Lunch".to_string()),
            ..Axes::default()
        };
        assert!(matches!(
            axes.validate(),
            Err(GridError::InvalidAxes { .. })
        ));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut axes = Axes::default();
        axes.classes.push("MCA I".to_string());
        let err = axes.validate().unwrap_err();
        assert!(err.to_string().contains("MCA I"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let axes: Axes = serde_json::from_str(r#"{"classes": ["BSc I"]}"#).unwrap();
        assert_eq!(axes.classes, vec!["BSc I".to_string()]);
        assert_eq!(axes.days.len(), 5);
        assert_eq!(axes.time_slots.len(), 7);
    }
}
