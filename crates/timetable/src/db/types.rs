/// Stored records and the payloads used to create or replace them
use chrono::{DateTime, Utc};
use regex::Regex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::error::StoreError;
use crate::grid::Day;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static CLOCK_TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

const GENDERS: [&str; 3] = ["male", "female", "other"];
pub const LECTURES_PER_DAY: i64 = 6;

impl ToSql for Day {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Day {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Day>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn require(entity: &'static str, field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid(entity, format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub experience: String,
    pub subject: String,
    pub gender: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub experience: String,
    pub subject: String,
    pub gender: String,
    pub address: String,
}

impl TeacherInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        const ENTITY: &str = "teacher";
        require(ENTITY, "firstName", &self.first_name)?;
        require(ENTITY, "lastName", &self.last_name)?;
        require(ENTITY, "phone", &self.phone)?;
        require(ENTITY, "city", &self.city)?;
        require(ENTITY, "experience", &self.experience)?;
        require(ENTITY, "subject", &self.subject)?;
        require(ENTITY, "address", &self.address)?;

        if !EMAIL_REGEX.is_match(self.email.trim()) {
            return Err(StoreError::invalid(
                ENTITY,
                format!("invalid email address: {:?}", self.email),
            ));
        }
        if !GENDERS.contains(&self.gender.to_ascii_lowercase().as_str()) {
            return Err(StoreError::invalid(
                ENTITY,
                format!("gender must be one of {}", GENDERS.join(", ")),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    pub code: i64,
}

impl SubjectInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        require("subject", "name", &self.name)?;
        if self.code <= 0 {
            return Err(StoreError::invalid("subject", "code must be positive"));
        }
        Ok(())
    }
}

/// A class or cohort, e.g. `MCA I`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
}

impl DepartmentInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        require("department", "name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: String,
    pub day: Day,
    /// Usually `Subject (Teacher)`
    pub name: String,
    pub lecture_number: i64,
    pub from_time: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureInput {
    pub day: Day,
    pub name: String,
    pub lecture_number: i64,
    pub from_time: String,
    pub department: String,
}

impl LectureInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        const ENTITY: &str = "lecture";
        require(ENTITY, "name", &self.name)?;
        require(ENTITY, "department", &self.department)?;

        if !(1..=LECTURES_PER_DAY).contains(&self.lecture_number) {
            return Err(StoreError::invalid(
                ENTITY,
                format!("lectureNumber must be between 1 and {LECTURES_PER_DAY}"),
            ));
        }
        if !CLOCK_TIME_REGEX.is_match(&self.from_time) {
            return Err(StoreError::invalid(
                ENTITY,
                format!("fromTime must be HH:MM, got {:?}", self.from_time),
            ));
        }
        Ok(())
    }
}

/// Payload for creating or replacing a timetable entry. Day and time are
/// checked against the configured axes by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    pub day: Day,
    pub class: String,
    pub time: String,
    pub subject: String,
    pub room: String,
    #[serde(default)]
    pub teacher: Option<String>,
}

impl EntryInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        const ENTITY: &str = "timetable entry";
        require(ENTITY, "class", &self.class)?;
        require(ENTITY, "time", &self.time)?;
        require(ENTITY, "subject", &self.subject)?;
        require(ENTITY, "room", &self.room)
    }
}
