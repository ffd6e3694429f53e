use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::db::StoreError;
use crate::export::ExportError;
use crate::grid::GridError;

/// An error response. Serialized as `{ success: false, message, error }`.
#[derive(Debug, Clone)]
pub struct ApiErrorType {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, message, error): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            message: message.to_string(),
            error,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.message,
            "error": self.error,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiErrorType {
    fn from(e: StoreError) -> Self {
        let (status, message) = match &e {
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "Record not found"),
            StoreError::Invalid { .. } => (StatusCode::BAD_REQUEST, "Validation failed"),
            StoreError::Conflict { .. } => (StatusCode::CONFLICT, "Record already exists"),
            StoreError::Sqlite(_) | StoreError::Poisoned => {
                error!("Store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        };
        ApiErrorType::from((status, message, Some(e.to_string())))
    }
}

impl From<GridError> for ApiErrorType {
    fn from(e: GridError) -> Self {
        ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Invalid timetable view",
            Some(e.to_string()),
        ))
    }
}

impl From<ExportError> for ApiErrorType {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::UnsupportedFormat(_) => ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Unsupported export format",
                Some(e.to_string()),
            )),
            _ => {
                error!("Export failed: {}", e);
                ApiErrorType::from((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Export failed",
                    Some(e.to_string()),
                ))
            }
        }
    }
}

impl From<JsonRejection> for ApiErrorType {
    fn from(rejection: JsonRejection) -> Self {
        ApiErrorType::from((
            rejection.status(),
            "Malformed request body",
            Some(rejection.body_text()),
        ))
    }
}

/// A successful response: `{ success: true, message, data }`.
pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body = json!({
        "success": true,
        "message": message,
        "data": data,
    });
    (status, Json(body)).into_response()
}
