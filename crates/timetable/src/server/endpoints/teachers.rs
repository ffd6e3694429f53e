use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::TeacherInput;
use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /teachers
pub async fn get_teachers(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /teachers");

    match s.db.list_teachers() {
        Ok(teachers) => success(StatusCode::OK, "Teachers fetched", teachers),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /teachers/:id
pub async fn get_teacher(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /teachers/{}", id);

    match s.db.get_teacher(&id) {
        Ok(teacher) => success(StatusCode::OK, "Teacher fetched", teacher),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /teachers
pub async fn post_teacher(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<TeacherInput>, JsonRejection>,
) -> Response {
    info!("POST /teachers");

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.create_teacher(&input) {
        Ok(teacher) => {
            info!("Added teacher {} ({})", teacher.display_name(), teacher.id);
            success(StatusCode::CREATED, "Teacher added", teacher)
        }
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /teachers/:id
pub async fn put_teacher(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<TeacherInput>, JsonRejection>,
) -> Response {
    info!("PUT /teachers/{}", id);

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.update_teacher(&id, &input) {
        Ok(teacher) => success(StatusCode::OK, "Teacher updated", teacher),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// DELETE /teachers/:id
///
/// Timetable entries taught by this teacher stay, without a teacher.
pub async fn delete_teacher(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /teachers/{}", id);

    match s.db.delete_teacher(&id) {
        Ok(()) => success(StatusCode::OK, "Teacher deleted", serde_json::Value::Null),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
