use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, Lecture, LectureInput, StoreError, TimetableDb};

fn lecture_from_row(row: &Row<'_>) -> rusqlite::Result<Lecture> {
    Ok(Lecture {
        id: row.get(0)?,
        day: row.get(1)?,
        name: row.get(2)?,
        lecture_number: row.get(3)?,
        from_time: row.get(4)?,
        department: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const LECTURE_COLUMNS: &str =
    "id, day, name, lecture_number, from_time, department, created_at, updated_at";

impl TimetableDb {
    /// Lists lectures in creation order.
    pub fn list_lectures(&self) -> Result<Vec<Lecture>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {LECTURE_COLUMNS} FROM lectures ORDER BY created_at, rowid"
        ))?;
        let lectures = stmt
            .query_map([], lecture_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lectures)
    }

    pub fn get_lecture(&self, id: &str) -> Result<Lecture, StoreError> {
        let db = self.conn()?;
        db.query_row(
            &format!("SELECT {LECTURE_COLUMNS} FROM lectures WHERE id = ?1"),
            [id],
            lecture_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("lecture", id))
    }

    pub fn create_lecture(&self, input: &LectureInput) -> Result<Lecture, StoreError> {
        input.validate()?;

        let id = new_id();
        {
            let db = self.conn()?;
            db.execute(
                "INSERT INTO lectures (
                    id, day, name, lecture_number, from_time, department, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    id,
                    input.day,
                    input.name.trim(),
                    input.lecture_number,
                    input.from_time,
                    input.department.trim(),
                    Utc::now(),
                ],
            )?;
        }
        self.get_lecture(&id)
    }

    pub fn update_lecture(&self, id: &str, input: &LectureInput) -> Result<Lecture, StoreError> {
        input.validate()?;

        let changed = {
            let db = self.conn()?;
            db.execute(
                "UPDATE lectures SET
                    day = ?2, name = ?3, lecture_number = ?4, from_time = ?5,
                    department = ?6, updated_at = ?7
                 WHERE id = ?1",
                params![
                    id,
                    input.day,
                    input.name.trim(),
                    input.lecture_number,
                    input.from_time,
                    input.department.trim(),
                    Utc::now(),
                ],
            )?
        };
        if changed == 0 {
            return Err(StoreError::not_found("lecture", id));
        }
        self.get_lecture(id)
    }

    pub fn delete_lecture(&self, id: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        if db.execute("DELETE FROM lectures WHERE id = ?1", [id])? == 0 {
            return Err(StoreError::not_found("lecture", id));
        }
        Ok(())
    }
}
