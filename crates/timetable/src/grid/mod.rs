//! Grid pivot engine.
//!
//! Turns the flat list of timetable entries into one of the generator's grid
//! projections. The engine is a pure function over an entry snapshot: it
//! pre-indexes entries by (day, class, time), lays out row and column
//! descriptors for the requested [`View`], and resolves every cell once.

mod axes;
mod error;
mod index;
mod types;
mod view;

pub use axes::Axes;
pub use error::GridError;
pub use index::{key_for, CellKey, EntryIndex};
pub use types::{ClassScope, Day, DayScope, TimetableEntry};
pub use view::View;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Describes one grid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowHeader {
    /// Single-day view: one row per time slot
    Slot { time: String, is_break: bool },
    /// Whole-week day view, grouped by day
    DayClass { day: Day, class: String },
    /// Class view, grouped by class
    ClassDay { class: String, day: Day },
}

impl RowHeader {
    pub fn label(&self) -> String {
        match self {
            RowHeader::Slot { time, .. } => time.clone(),
            RowHeader::DayClass { day, class } => format!("{day} - {class}"),
            RowHeader::ClassDay { class, day } => format!("{class} - {day}"),
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, RowHeader::Slot { is_break: true, .. })
    }

    fn matches(&self, day: Day, class: &str, time: &str) -> bool {
        match self {
            RowHeader::Slot { time: t, .. } => t == time,
            RowHeader::DayClass { day: d, class: c } | RowHeader::ClassDay { class: c, day: d } => {
                *d == day && c == class
            }
        }
    }
}

/// Describes one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnHeader {
    Class { class: String },
    Slot { time: String, is_break: bool },
}

impl ColumnHeader {
    pub fn label(&self) -> &str {
        match self {
            ColumnHeader::Class { class } => class,
            ColumnHeader::Slot { time, .. } => time,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ColumnHeader::Slot { is_break: true, .. })
    }

    fn matches(&self, class: &str, time: &str) -> bool {
        match self {
            ColumnHeader::Class { class: c } => c == class,
            ColumnHeader::Slot { time: t, .. } => t == time,
        }
    }
}

/// A run of consecutive rows sharing an outer label (a merged header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowGroup {
    pub label: String,
    pub start: usize,
    pub span: usize,
}

/// A built grid projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    view: View,
    rows: Vec<RowHeader>,
    columns: Vec<ColumnHeader>,
    groups: Vec<RowGroup>,
    /// Row-major, `rows.len() * columns.len()` cells
    cells: Vec<Option<TimetableEntry>>,
    shadowed: usize,
    unplaced: usize,
}

impl Grid {
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn rows(&self) -> &[RowHeader] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnHeader] {
        &self.columns
    }

    /// Merged outer groups. Empty for the single-day view.
    pub fn groups(&self) -> &[RowGroup] {
        &self.groups
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The entry shown at (row, col), if any.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TimetableEntry> {
        if row >= self.rows.len() || col >= self.columns.len() {
            return None;
        }
        self.cells[row * self.columns.len() + col].as_ref()
    }

    /// Point lookup by labels. `None` when the cell is outside this view,
    /// empty, or the break slot.
    pub fn lookup(&self, day: Day, class: &str, time: &str) -> Option<&TimetableEntry> {
        if !self.view.includes(day, class) {
            return None;
        }
        let row = self.rows.iter().position(|r| r.matches(day, class, time))?;
        let col = self.columns.iter().position(|c| c.matches(class, time))?;
        self.cell(row, col)
    }

    /// Number of entries inside this view hidden by the first-wins rule.
    pub fn shadowed_entries(&self) -> usize {
        self.shadowed
    }

    /// Number of entries whose day, class or time is not on the axes at
    /// all. They appear in no view.
    pub fn unplaced_entries(&self) -> usize {
        self.unplaced
    }

    /// Number of non-empty cells.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let width = self.columns.len().max(1);
        let cells: Vec<&[Option<TimetableEntry>]> = self.cells.chunks(width).collect();

        let mut state = serializer.serialize_struct("Grid", 7)?;
        state.serialize_field("view", &self.view)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("groups", &self.groups)?;
        state.serialize_field("cells", &cells)?;
        state.serialize_field("shadowed_entries", &self.shadowed)?;
        state.serialize_field("unplaced_entries", &self.unplaced)?;
        state.end()
    }
}

/// Partial cell coordinates contributed by a row or a column.
#[derive(Debug, Clone, Copy, Default)]
struct Partial {
    day: Option<usize>,
    class: Option<usize>,
    slot: Option<usize>,
}

impl Partial {
    fn merge(self, other: Partial) -> Option<CellKey> {
        Some(CellKey {
            day: self.day.or(other.day)?,
            class: self.class.or(other.class)?,
            slot: self.slot.or(other.slot)?,
        })
    }
}

/// Builds the grid for `view` from an entry snapshot.
///
/// Never fails. Scope values are expected to come from `axes` (see
/// [`View::parse`]); a scope that does not resolve yields a grid of empty
/// cells rather than an error.
pub fn build_grid(entries: &[TimetableEntry], axes: &Axes, view: &View) -> Grid {
    let index = EntryIndex::build(entries, axes);

    let slot_columns = || -> Vec<(ColumnHeader, Partial)> {
        axes.time_slots
            .iter()
            .enumerate()
            .map(|(i, time)| {
                (
                    ColumnHeader::Slot {
                        time: time.clone(),
                        is_break: axes.is_break_slot(time),
                    },
                    Partial {
                        slot: Some(i),
                        ..Partial::default()
                    },
                )
            })
            .collect()
    };

    let mut rows: Vec<(RowHeader, Partial)> = Vec::new();
    let mut groups = Vec::new();

    let columns: Vec<(ColumnHeader, Partial)> = match view {
        View::Day(DayScope::Single(day)) => {
            let day_pos = axes.day_position(*day);
            for (i, time) in axes.time_slots.iter().enumerate() {
                rows.push((
                    RowHeader::Slot {
                        time: time.clone(),
                        is_break: axes.is_break_slot(time),
                    },
                    Partial {
                        day: day_pos,
                        slot: Some(i),
                        ..Partial::default()
                    },
                ));
            }
            axes.classes
                .iter()
                .enumerate()
                .map(|(j, class)| {
                    (
                        ColumnHeader::Class {
                            class: class.clone(),
                        },
                        Partial {
                            class: Some(j),
                            ..Partial::default()
                        },
                    )
                })
                .collect()
        }
        View::Day(DayScope::All) => {
            for (d, day) in axes.days.iter().enumerate() {
                groups.push(RowGroup {
                    label: day.to_string(),
                    start: rows.len(),
                    span: axes.classes.len(),
                });
                for (c, class) in axes.classes.iter().enumerate() {
                    rows.push((
                        RowHeader::DayClass {
                            day: *day,
                            class: class.clone(),
                        },
                        Partial {
                            day: Some(d),
                            class: Some(c),
                            slot: None,
                        },
                    ));
                }
            }
            slot_columns()
        }
        View::Class(scope) => {
            let classes: Vec<(Option<usize>, &String)> = match scope {
                ClassScope::Single(class) => vec![(axes.class_position(class), class)],
                ClassScope::All => axes
                    .classes
                    .iter()
                    .enumerate()
                    .map(|(c, class)| (Some(c), class))
                    .collect(),
            };
            for (class_pos, class) in classes {
                groups.push(RowGroup {
                    label: class.clone(),
                    start: rows.len(),
                    span: axes.days.len(),
                });
                for (d, day) in axes.days.iter().enumerate() {
                    rows.push((
                        RowHeader::ClassDay {
                            class: class.clone(),
                            day: *day,
                        },
                        Partial {
                            day: Some(d),
                            class: class_pos,
                            slot: None,
                        },
                    ));
                }
            }
            slot_columns()
        }
    };

    let mut cells = Vec::with_capacity(rows.len() * columns.len());
    for (_, row_part) in &rows {
        for (_, col_part) in &columns {
            let cell = row_part
                .merge(*col_part)
                .filter(|key| !axes.is_break_slot(&axes.time_slots[key.slot]))
                .and_then(|key| index.get(key))
                .cloned();
            cells.push(cell);
        }
    }

    let shadowed = index
        .shadowed()
        .iter()
        .filter(|(key, entry)| {
            view.includes(entry.day, &entry.class) && !axes.is_break_slot(&axes.time_slots[key.slot])
        })
        .count();

    Grid {
        view: view.clone(),
        rows: rows.into_iter().map(|(header, _)| header).collect(),
        columns: columns.into_iter().map(|(header, _)| header).collect(),
        groups,
        cells,
        shadowed,
        unplaced: index.unplaced(),
    }
}
