/// Subjects and departments: small named lookups with uniqueness rules
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::error::unique_conflict;
use super::{new_id, Department, DepartmentInput, StoreError, Subject, SubjectInput, TimetableDb};

fn subject_from_row(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

impl TimetableDb {
    /// Lists subjects ordered by code.
    pub fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, name, code, created_at, updated_at FROM subjects ORDER BY code",
        )?;
        let subjects = stmt
            .query_map([], subject_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subjects)
    }

    pub fn get_subject(&self, id: &str) -> Result<Subject, StoreError> {
        let db = self.conn()?;
        db.query_row(
            "SELECT id, name, code, created_at, updated_at FROM subjects WHERE id = ?1",
            [id],
            subject_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("subject", id))
    }

    pub fn create_subject(&self, input: &SubjectInput) -> Result<Subject, StoreError> {
        input.validate()?;

        let id = new_id();
        {
            let db = self.conn()?;
            db.execute(
                "INSERT INTO subjects (id, name, code, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![id, input.name.trim(), input.code, Utc::now()],
            )
            .map_err(|e| unique_conflict(e, format!("subject code {} is taken", input.code)))?;
        }
        self.get_subject(&id)
    }

    pub fn update_subject(&self, id: &str, input: &SubjectInput) -> Result<Subject, StoreError> {
        input.validate()?;

        let changed = {
            let db = self.conn()?;
            db.execute(
                "UPDATE subjects SET name = ?2, code = ?3, updated_at = ?4 WHERE id = ?1",
                params![id, input.name.trim(), input.code, Utc::now()],
            )
            .map_err(|e| unique_conflict(e, format!("subject code {} is taken", input.code)))?
        };
        if changed == 0 {
            return Err(StoreError::not_found("subject", id));
        }
        self.get_subject(id)
    }

    pub fn delete_subject(&self, id: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        if db.execute("DELETE FROM subjects WHERE id = ?1", [id])? == 0 {
            return Err(StoreError::not_found("subject", id));
        }
        Ok(())
    }

    pub fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, name, created_at, updated_at FROM departments ORDER BY name",
        )?;
        let departments = stmt
            .query_map([], department_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(departments)
    }

    pub fn get_department(&self, id: &str) -> Result<Department, StoreError> {
        let db = self.conn()?;
        db.query_row(
            "SELECT id, name, created_at, updated_at FROM departments WHERE id = ?1",
            [id],
            department_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("department", id))
    }

    pub fn create_department(&self, input: &DepartmentInput) -> Result<Department, StoreError> {
        input.validate()?;

        let id = new_id();
        let name = input.name.trim();
        {
            let db = self.conn()?;
            db.execute(
                "INSERT INTO departments (id, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params![id, name, Utc::now()],
            )
            .map_err(|e| unique_conflict(e, format!("department {name:?} already exists")))?;
        }
        self.get_department(&id)
    }

    pub fn update_department(
        &self,
        id: &str,
        input: &DepartmentInput,
    ) -> Result<Department, StoreError> {
        input.validate()?;

        let name = input.name.trim();
        let changed = {
            let db = self.conn()?;
            db.execute(
                "UPDATE departments SET name = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, name, Utc::now()],
            )
            .map_err(|e| unique_conflict(e, format!("department {name:?} already exists")))?
        };
        if changed == 0 {
            return Err(StoreError::not_found("department", id));
        }
        self.get_department(id)
    }

    pub fn delete_department(&self, id: &str) -> Result<(), StoreError> {
        let db = self.conn()?;
        if db.execute("DELETE FROM departments WHERE id = ?1", [id])? == 0 {
            return Err(StoreError::not_found("department", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Axes;

    fn subject(name: &str, code: i64) -> SubjectInput {
        SubjectInput {
            name: name.into(),
            code,
        }
    }

    #[test]
    fn test_subjects_ordered_by_code() {
        let db = TimetableDb::open_in_memory(Axes::default()).unwrap();
        db.create_subject(&subject("Operating Systems", 305)).unwrap();
        db.create_subject(&subject("Data Structures", 101)).unwrap();
        db.create_subject(&subject("Computer Networks", 210)).unwrap();

        let codes: Vec<i64> = db.list_subjects().unwrap().iter().map(|s| s.code).collect();
        assert_eq!(codes, vec![101, 210, 305]);
    }

    #[test]
    fn test_duplicate_subject_code_conflicts() {
        let db = TimetableDb::open_in_memory(Axes::default()).unwrap();
        let first = db.create_subject(&subject("Python", 401)).unwrap();
        let other = db.create_subject(&subject("STQA", 402)).unwrap();

        assert!(matches!(
            db.create_subject(&subject("Python II", 401)),
            Err(StoreError::Conflict { .. })
        ));
        assert!(matches!(
            db.update_subject(&other.id, &subject("STQA", 401)),
            Err(StoreError::Conflict { .. })
        ));

        let renamed = db.update_subject(&first.id, &subject("Python Lab", 401)).unwrap();
        assert_eq!(renamed.name, "Python Lab");
    }

    #[test]
    fn test_department_crud() {
        let db = TimetableDb::open_in_memory(Axes::default()).unwrap();
        let mca = db
            .create_department(&DepartmentInput {
                name: " MCA I ".into(),
            })
            .unwrap();
        assert_eq!(mca.name, "MCA I");

        assert!(matches!(
            db.create_department(&DepartmentInput {
                name: "MCA I".into()
            }),
            Err(StoreError::Conflict { .. })
        ));

        db.delete_department(&mca.id).unwrap();
        assert!(db.list_departments().unwrap().is_empty());
        assert!(matches!(
            db.delete_department(&mca.id),
            Err(StoreError::NotFound {
                entity: "department",
                ..
            })
        ));
    }
}
