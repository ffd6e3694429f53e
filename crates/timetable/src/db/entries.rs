/// Timetable entries: the rows the grid is pivoted from
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

use super::{new_id, EntryInput, StoreError, TimetableDb};
use crate::grid::TimetableEntry;

const ENTRY_SELECT: &str = "SELECT e.id, e.day, e.class, e.time, e.subject, e.room, e.teacher_id,
            CASE WHEN t.id IS NULL THEN NULL ELSE t.first_name || ' ' || t.last_name END
     FROM timetable_entries e
     LEFT JOIN teachers t ON t.id = e.teacher_id";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<TimetableEntry> {
    Ok(TimetableEntry {
        id: row.get(0)?,
        day: row.get(1)?,
        class: row.get(2)?,
        time: row.get(3)?,
        subject: row.get(4)?,
        room: row.get(5)?,
        teacher: row.get(6)?,
        teacher_name: row.get(7)?,
    })
}

impl TimetableDb {
    /// Returns every entry in insertion order, with teacher names resolved.
    ///
    /// The order matters: when two entries claim the same cell the grid
    /// shows the one inserted first.
    pub fn list_entries(&self) -> Result<Vec<TimetableEntry>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!("{ENTRY_SELECT} ORDER BY e.seq"))?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn get_entry(&self, id: &str) -> Result<TimetableEntry, StoreError> {
        let db = self.conn()?;
        fetch_entry(&db, id)
    }

    pub fn create_entry(&self, input: &EntryInput) -> Result<TimetableEntry, StoreError> {
        self.check_entry(input)?;

        let id = new_id();
        let db = self.conn()?;
        check_teacher(&db, input.teacher.as_deref())?;
        warn_on_collision(&db, input, None)?;

        db.execute(
            "INSERT INTO timetable_entries (
                id, day, class, time, subject, room, teacher_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                id,
                input.day,
                input.class.trim(),
                input.time,
                input.subject.trim(),
                input.room.trim(),
                input.teacher,
                Utc::now(),
            ],
        )?;
        fetch_entry(&db, &id)
    }

    /// Replaces every field of the entry `id`. Its position in insertion
    /// order is kept.
    pub fn update_entry(
        &self,
        id: &str,
        input: &EntryInput,
    ) -> Result<TimetableEntry, StoreError> {
        self.check_entry(input)?;

        let db = self.conn()?;
        check_teacher(&db, input.teacher.as_deref())?;
        warn_on_collision(&db, input, Some(id))?;

        let changed = db.execute(
            "UPDATE timetable_entries SET
                day = ?2, class = ?3, time = ?4, subject = ?5, room = ?6,
                teacher_id = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                id,
                input.day,
                input.class.trim(),
                input.time,
                input.subject.trim(),
                input.room.trim(),
                input.teacher,
                Utc::now(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("timetable entry", id));
        }
        fetch_entry(&db, id)
    }

    pub fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        if db.execute("DELETE FROM timetable_entries WHERE id = ?1", [id])? == 0 {
            return Err(StoreError::not_found("timetable entry", id));
        }
        Ok(())
    }

    pub fn count_entries(&self) -> Result<usize, StoreError> {
        let db = self.conn()?;
        let count: i64 =
            db.query_row("SELECT COUNT(*) FROM timetable_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Checks the entry against the configured axes. The break slot never
    /// holds an entry.
    fn check_entry(&self, input: &EntryInput) -> Result<(), StoreError> {
        const ENTITY: &str = "timetable entry";
        input.validate()?;

        let axes = self.axes();
        if axes.day_position(input.day).is_none() {
            return Err(StoreError::invalid(
                ENTITY,
                format!("{} is not a teaching day", input.day),
            ));
        }
        if axes.slot_position(&input.time).is_none() {
            return Err(StoreError::invalid(
                ENTITY,
                format!("unknown time slot {:?}", input.time),
            ));
        }
        if axes.is_break_slot(&input.time) {
            return Err(StoreError::invalid(
                ENTITY,
                format!("{:?} is the break slot", input.time),
            ));
        }
        Ok(())
    }
}

fn fetch_entry(db: &Connection, id: &str) -> Result<TimetableEntry, StoreError> {
    db.query_row(&format!("{ENTRY_SELECT} WHERE e.id = ?1"), [id], entry_from_row)
        .optional()?
        .ok_or_else(|| StoreError::not_found("timetable entry", id))
}

fn check_teacher(db: &Connection, teacher: Option<&str>) -> Result<(), StoreError> {
    let Some(teacher) = teacher else {
        return Ok(());
    };
    let exists = db
        .query_row("SELECT 1 FROM teachers WHERE id = ?1", [teacher], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        return Err(StoreError::invalid(
            "timetable entry",
            format!("teacher {teacher} does not exist"),
        ));
    }
    Ok(())
}

/// Writes that land on an occupied cell are accepted; the earlier entry
/// keeps showing in the grid.
fn warn_on_collision(
    db: &Connection,
    input: &EntryInput,
    exclude: Option<&str>,
) -> Result<(), StoreError> {
    let occupant: Option<String> = db
        .query_row(
            "SELECT id FROM timetable_entries
             WHERE day = ?1 AND class = ?2 AND time = ?3 AND id IS NOT ?4
             ORDER BY seq LIMIT 1",
            params![input.day, input.class.trim(), input.time, exclude],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(occupant) = occupant {
        warn!(
            "{} {} at {} is already taken by entry {}; the new entry will be shadowed",
            input.day, input.class, input.time, occupant
        );
    }
    Ok(())
}
