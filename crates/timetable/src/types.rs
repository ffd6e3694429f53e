use crate::config::AppConfig;
use crate::db::TimetableDb;
use crate::grid::Axes;

/// State shared by every request handler.
pub struct AppState {
    /// The timetable store. Its axes are the ones entries are validated against.
    pub db: TimetableDb,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: TimetableDb, config: AppConfig) -> Self {
        Self { db, config }
    }

    pub fn axes(&self) -> &Axes {
        self.db.axes()
    }
}
