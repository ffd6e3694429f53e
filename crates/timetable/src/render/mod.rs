//! Presentation layer for built grids.
//!
//! A [`Snapshot`] is the grid as it is laid out for display: header cells,
//! body rows with merged group cells, per-cell text lines and shading, and
//! optionally the add/edit/delete controls of the generator screen. The HTML
//! view and the PDF export both paint from a snapshot, so an export shows
//! exactly what is on screen minus the controls.

pub mod html;

use serde::Serialize;

use crate::grid::{ClassScope, DayScope, Grid, RowHeader, View};

/// Whether interactive per-cell controls are part of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordances {
    Shown,
    /// Used for every export
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shade {
    Header,
    Group,
    Filled,
    Empty,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Add,
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotCell {
    pub lines: Vec<String>,
    /// Rows covered by this cell. 0 marks a cell hidden under a merged
    /// group cell from an earlier row.
    pub row_span: usize,
    pub shade: Shade,
    /// Entry shown in the cell, target of the edit/delete controls
    pub entry_id: Option<String>,
    pub controls: Vec<Control>,
}

impl SnapshotCell {
    fn label(text: impl Into<String>, shade: Shade) -> Self {
        Self {
            lines: vec![text.into()],
            row_span: 1,
            shade,
            entry_id: None,
            controls: Vec::new(),
        }
    }

    fn covered() -> Self {
        Self {
            lines: Vec::new(),
            row_span: 0,
            shade: Shade::Group,
            entry_id: None,
            controls: Vec::new(),
        }
    }

    pub fn is_covered(&self) -> bool {
        self.row_span == 0
    }
}

/// A display-ready table for one grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub title: String,
    pub caption: String,
    /// Leading columns that hold row labels rather than cells
    pub label_columns: usize,
    pub header: Vec<SnapshotCell>,
    pub body: Vec<Vec<SnapshotCell>>,
}

impl Snapshot {
    /// Walks `grid` into a table, with or without the per-cell controls.
    pub fn from_grid(grid: &Grid, title: &str, affordances: Affordances) -> Self {
        let leading: Vec<&str> = match grid.view() {
            View::Day(DayScope::Single(_)) => vec!["Time/Class"],
            View::Day(DayScope::All) => vec!["Day", "Class"],
            View::Class(ClassScope::Single(_) | ClassScope::All) => vec!["Class", "Day"],
        };

        let mut header: Vec<SnapshotCell> = leading
            .iter()
            .map(|label| SnapshotCell::label(*label, Shade::Header))
            .collect();
        header.extend(grid.columns().iter().map(|column| {
            let shade = if column.is_break() {
                Shade::Break
            } else {
                Shade::Header
            };
            SnapshotCell::label(column.label(), shade)
        }));

        let mut body = Vec::with_capacity(grid.row_count());
        for (r, row) in grid.rows().iter().enumerate() {
            let mut cells = Vec::with_capacity(leading.len() + grid.column_count());

            match row {
                RowHeader::Slot { time, is_break } => {
                    let shade = if *is_break { Shade::Break } else { Shade::Header };
                    cells.push(SnapshotCell::label(time.clone(), shade));
                }
                RowHeader::DayClass { day, class } => {
                    cells.push(group_cell(grid, r, day.to_string()));
                    cells.push(SnapshotCell::label(class.clone(), Shade::Header));
                }
                RowHeader::ClassDay { class, day } => {
                    cells.push(group_cell(grid, r, class.clone()));
                    cells.push(SnapshotCell::label(day.to_string(), Shade::Header));
                }
            }

            for (c, column) in grid.columns().iter().enumerate() {
                let is_break = row.is_break() || column.is_break();
                cells.push(body_cell(grid, r, c, is_break, affordances));
            }
            body.push(cells);
        }

        Self {
            title: title.to_string(),
            caption: grid.view().describe(),
            label_columns: leading.len(),
            header,
            body,
        }
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Largest number of text lines in any cell, at least 1.
    pub fn max_lines(&self) -> usize {
        self.header
            .iter()
            .chain(self.body.iter().flatten())
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn has_controls(&self) -> bool {
        self.body.iter().flatten().any(|cell| !cell.controls.is_empty())
    }
}

/// The merged outer label, spanning its group on the group's first row.
fn group_cell(grid: &Grid, row: usize, label: String) -> SnapshotCell {
    match grid.groups().iter().find(|g| g.start <= row && row < g.start + g.span) {
        Some(group) if group.start == row => SnapshotCell {
            row_span: group.span,
            ..SnapshotCell::label(label, Shade::Group)
        },
        Some(_) => SnapshotCell::covered(),
        None => SnapshotCell::label(label, Shade::Group),
    }
}

fn body_cell(
    grid: &Grid,
    row: usize,
    col: usize,
    is_break: bool,
    affordances: Affordances,
) -> SnapshotCell {
    if is_break {
        return SnapshotCell {
            lines: Vec::new(),
            row_span: 1,
            shade: Shade::Break,
            entry_id: None,
            controls: Vec::new(),
        };
    }

    let shown = affordances == Affordances::Shown;
    match grid.cell(row, col) {
        Some(entry) => {
            let mut lines = vec![entry.subject.clone(), format!("Room: {}", entry.room)];
            if let Some(ref teacher) = entry.teacher_name {
                lines.push(teacher.clone());
            }
            SnapshotCell {
                lines,
                row_span: 1,
                shade: Shade::Filled,
                entry_id: Some(entry.id.clone()),
                controls: if shown {
                    vec![Control::Edit, Control::Delete]
                } else {
                    Vec::new()
                },
            }
        }
        None => SnapshotCell {
            lines: Vec::new(),
            row_span: 1,
            shade: Shade::Empty,
            entry_id: None,
            controls: if shown { vec![Control::Add] } else { Vec::new() },
        },
    }
}
