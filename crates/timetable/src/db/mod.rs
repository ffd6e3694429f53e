/// SQLite store for teachers, subjects, departments, lectures and timetable entries
mod catalog;
mod entries;
mod error;
mod lectures;
mod seed;
mod teachers;
mod types;

pub use error::StoreError;
pub use types::{
    Department, DepartmentInput, EntryInput, Lecture, LectureInput, Subject, SubjectInput,
    Teacher, TeacherInput, LECTURES_PER_DAY,
};

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::grid::Axes;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_timetable.sql");

pub struct TimetableDb {
    db: Mutex<Connection>,
    /// Enumerations entry writes are checked against
    axes: Axes,
}

impl TimetableDb {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn open(path: impl AsRef<Path>, axes: Axes) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::invalid("database path", format!("{}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)?;
        info!("Opened timetable database at {}", path.display());
        Self::init(conn, axes)
    }

    pub fn open_in_memory(axes: Axes) -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, axes)
    }

    fn init(conn: Connection, axes: Axes) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            db: Mutex::new(conn),
            axes,
        })
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
