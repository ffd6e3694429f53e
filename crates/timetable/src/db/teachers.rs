use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{new_id, StoreError, Teacher, TeacherInput, TimetableDb};

const TEACHER_COLUMNS: &str = "id, first_name, last_name, email, phone, city, experience, \
                               subject, gender, address, created_at, updated_at";

fn teacher_from_row(row: &Row<'_>) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        city: row.get(5)?,
        experience: row.get(6)?,
        subject: row.get(7)?,
        gender: row.get(8)?,
        address: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

impl TimetableDb {
    pub fn list_teachers(&self) -> Result<Vec<Teacher>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY last_name, first_name"
        ))?;
        let teachers = stmt
            .query_map([], teacher_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teachers)
    }

    pub fn get_teacher(&self, id: &str) -> Result<Teacher, StoreError> {
        let db = self.conn()?;
        db.query_row(
            &format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = ?1"),
            [id],
            teacher_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("teacher", id))
    }

    pub fn create_teacher(&self, input: &TeacherInput) -> Result<Teacher, StoreError> {
        input.validate()?;

        let id = new_id();
        let now = Utc::now();
        {
            let db = self.conn()?;
            db.execute(
                "INSERT INTO teachers (
                    id, first_name, last_name, email, phone, city, experience,
                    subject, gender, address, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                params![
                    id,
                    input.first_name.trim(),
                    input.last_name.trim(),
                    input.email.trim(),
                    input.phone.trim(),
                    input.city.trim(),
                    input.experience.trim(),
                    input.subject.trim(),
                    input.gender.to_ascii_lowercase(),
                    input.address.trim(),
                    now,
                ],
            )?;
        }
        self.get_teacher(&id)
    }

    /// Replaces every field of the teacher `id`.
    pub fn update_teacher(&self, id: &str, input: &TeacherInput) -> Result<Teacher, StoreError> {
        input.validate()?;

        let changed = {
            let db = self.conn()?;
            db.execute(
                "UPDATE teachers SET
                    first_name = ?2, last_name = ?3, email = ?4, phone = ?5, city = ?6,
                    experience = ?7, subject = ?8, gender = ?9, address = ?10, updated_at = ?11
                 WHERE id = ?1",
                params![
                    id,
                    input.first_name.trim(),
                    input.last_name.trim(),
                    input.email.trim(),
                    input.phone.trim(),
                    input.city.trim(),
                    input.experience.trim(),
                    input.subject.trim(),
                    input.gender.to_ascii_lowercase(),
                    input.address.trim(),
                    Utc::now(),
                ],
            )?
        };
        if changed == 0 {
            return Err(StoreError::not_found("teacher", id));
        }
        self.get_teacher(id)
    }

    /// Deletes the teacher. Entries that referenced it keep their slot but
    /// lose the teacher reference.
    pub fn delete_teacher(&self, id: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        let changed = db.execute("DELETE FROM teachers WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::not_found("teacher", id));
        }
        Ok(())
    }
}
