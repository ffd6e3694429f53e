/// Types shared by the pivot engine, the exporters and the store
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::GridError;

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(alias = "monday")]
    Monday,
    #[serde(alias = "tuesday")]
    Tuesday,
    #[serde(alias = "wednesday")]
    Wednesday,
    #[serde(alias = "thursday")]
    Thursday,
    #[serde(alias = "friday")]
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = GridError;

    /// Case-insensitive, so both `Monday` and the lecture form's `monday` parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GridError::MalformedScope {
                axis: "day",
                value: s.to_string(),
            })
    }
}

/// One scheduled (day, class, time) -> (subject, room) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: String,
    pub day: Day,
    pub class: String,
    pub time: String,
    pub subject: String,
    pub room: String,
    /// Weak reference to a teacher id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    /// Resolved by the store before entries reach the grid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

impl TimetableEntry {
    /// Text shown for this entry in a grid cell, e.g. `OOM (NGM) (110)`.
    pub fn cell_text(&self) -> String {
        format!("{} ({})", self.subject, self.room)
    }
}

/// Which days a day-oriented grid covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayScope {
    Single(Day),
    All,
}

/// Which classes a class-oriented grid covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassScope {
    Single(String),
    All,
}
