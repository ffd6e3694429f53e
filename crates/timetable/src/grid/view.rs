/// Projection mode plus scope, passed explicitly into the pivot engine
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::axes::Axes;
use super::error::GridError;
use super::types::{ClassScope, Day, DayScope};

/// Which grid projection to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Time rows by class columns for one day, or (day, class) rows by time
    /// columns for the whole week
    Day(DayScope),
    /// (class, day) rows by time columns
    Class(ClassScope),
}

impl View {
    /// Parses raw selector values, rejecting anything outside the axes.
    ///
    /// `mode` defaults to the day view, `day` to the first configured day and
    /// `class` to all classes. The literal `all` (any case) selects every
    /// day or class.
    pub fn parse(
        mode: Option<&str>,
        day: Option<&str>,
        class: Option<&str>,
        axes: &Axes,
    ) -> Result<Self, GridError> {
        match mode.map(str::trim).unwrap_or("day") {
            m if m.eq_ignore_ascii_case("day") => {
                let scope = match day.map(str::trim) {
                    Some(d) if d.eq_ignore_ascii_case("all") => DayScope::All,
                    Some(d) => {
                        let parsed: Day = d.parse()?;
                        if axes.day_position(parsed).is_none() {
                            return Err(GridError::MalformedScope {
                                axis: "day",
                                value: d.to_string(),
                            });
                        }
                        DayScope::Single(parsed)
                    }
                    None => match axes.days.first() {
                        Some(first) => DayScope::Single(*first),
                        None => DayScope::All,
                    },
                };
                Ok(View::Day(scope))
            }
            m if m.eq_ignore_ascii_case("class") => {
                let scope = match class.map(str::trim) {
                    None => ClassScope::All,
                    Some(c) if c.eq_ignore_ascii_case("all") => ClassScope::All,
                    Some(c) => match axes.class_position(c) {
                        Some(_) => ClassScope::Single(c.to_string()),
                        None => {
                            return Err(GridError::MalformedScope {
                                axis: "class",
                                value: c.to_string(),
                            })
                        }
                    },
                };
                Ok(View::Class(scope))
            }
            other => Err(GridError::MalformedScope {
                axis: "view",
                value: other.to_string(),
            }),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            View::Day(_) => "day",
            View::Class(_) => "class",
        }
    }

    /// `Monday`, `MCA I` or `all`.
    pub fn scope_label(&self) -> String {
        match self {
            View::Day(DayScope::Single(day)) => day.to_string(),
            View::Class(ClassScope::Single(class)) => class.clone(),
            View::Day(DayScope::All) | View::Class(ClassScope::All) => "all".to_string(),
        }
    }

    /// Human readable caption, used above rendered grids.
    pub fn describe(&self) -> String {
        match self {
            View::Day(DayScope::Single(day)) => format!("Day view: {day}"),
            View::Day(DayScope::All) => "Day view: all days".to_string(),
            View::Class(ClassScope::Single(class)) => format!("Class view: {class}"),
            View::Class(ClassScope::All) => "Class view: all classes".to_string(),
        }
    }

    /// File name without extension for exports of this view.
    pub fn file_stem(&self) -> String {
        match self {
            View::Day(DayScope::Single(day)) => format!("timetable-{day}"),
            View::Day(DayScope::All) => "timetable-all-days".to_string(),
            View::Class(ClassScope::Single(class)) => format!("timetable-{class}"),
            View::Class(ClassScope::All) => "complete-timetable-class-view".to_string(),
        }
    }

    /// Returns true if cells for this day and class belong to the view.
    pub fn includes(&self, day: Day, class: &str) -> bool {
        match self {
            View::Day(DayScope::Single(d)) => *d == day,
            View::Class(ClassScope::Single(c)) => c == class,
            View::Day(DayScope::All) | View::Class(ClassScope::All) => true,
        }
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("View", 2)?;
        state.serialize_field("mode", self.mode())?;
        state.serialize_field("scope", &self.scope_label())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_first_day() {
        let view = View::parse(None, None, None, &Axes::default()).unwrap();
        assert_eq!(view, View::Day(DayScope::Single(Day::Monday)));
    }

    #[test]
    fn test_parse_scopes() {
        let axes = Axes::default();
        assert_eq!(
            View::parse(Some("day"), Some("ALL"), None, &axes).unwrap(),
            View::Day(DayScope::All)
        );
        assert_eq!(
            View::parse(Some("day"), Some("wednesday"), None, &axes).unwrap(),
            View::Day(DayScope::Single(Day::Wednesday))
        );
        assert_eq!(
            View::parse(Some("class"), None, Some("BCA II"), &axes).unwrap(),
            View::Class(ClassScope::Single("BCA II".to_string()))
        );
        assert_eq!(
            View::parse(Some("class"), None, None, &axes).unwrap(),
            View::Class(ClassScope::All)
        );
    }

    #[test]
    fn test_parse_rejects_values_outside_axes() {
        let axes = Axes {
            days: vec![Day::Monday, Day::Tuesday],
            ..Axes::default()
        };
        assert_eq!(
            View::parse(Some("day"), Some("Saturday"), None, &axes),
            Err(GridError::MalformedScope {
                axis: "day",
                value: "Saturday".to_string()
            })
        );
        assert!(View::parse(Some("day"), Some("Friday"), None, &axes).is_err());
        assert!(View::parse(Some("class"), None, Some("PhD I"), &axes).is_err());
        assert!(View::parse(Some("week"), None, None, &axes).is_err());
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(
            View::Day(DayScope::Single(Day::Monday)).file_stem(),
            "timetable-Monday"
        );
        assert_eq!(View::Day(DayScope::All).file_stem(), "timetable-all-days");
        assert_eq!(
            View::Class(ClassScope::Single("MCA I".to_string())).file_stem(),
            "timetable-MCA I"
        );
        assert_eq!(
            View::Class(ClassScope::All).file_stem(),
            "complete-timetable-class-view"
        );
    }
}
