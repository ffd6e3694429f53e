use thiserror::Error;

/// Errors raised by [`super::TimetableDb`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid {entity}: {message}")]
    Invalid {
        entity: &'static str,
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid(entity: &'static str, message: impl Into<String>) -> Self {
        StoreError::Invalid {
            entity,
            message: message.into(),
        }
    }
}

/// Maps a UNIQUE constraint failure to [`StoreError::Conflict`].
pub(crate) fn unique_conflict(err: rusqlite::Error, message: impl Into<String>) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::Conflict {
                message: message.into(),
            }
        }
        other => StoreError::Sqlite(other),
    }
}
