use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::SubjectInput;
use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /subjects
///
/// Subjects are listed by code.
pub async fn get_subjects(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /subjects");

    match s.db.list_subjects() {
        Ok(subjects) => success(StatusCode::OK, "Subjects fetched", subjects),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /subjects/:id
pub async fn get_subject(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /subjects/{}", id);

    match s.db.get_subject(&id) {
        Ok(subject) => success(StatusCode::OK, "Subject fetched", subject),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /subjects
pub async fn post_subject(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<SubjectInput>, JsonRejection>,
) -> Response {
    info!("POST /subjects");

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.create_subject(&input) {
        Ok(subject) => success(StatusCode::CREATED, "Subject added", subject),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /subjects/:id
pub async fn put_subject(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<SubjectInput>, JsonRejection>,
) -> Response {
    info!("PUT /subjects/{}", id);

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.update_subject(&id, &input) {
        Ok(subject) => success(StatusCode::OK, "Subject updated", subject),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// DELETE /subjects/:id
pub async fn delete_subject(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /subjects/{}", id);

    match s.db.delete_subject(&id) {
        Ok(()) => success(StatusCode::OK, "Subject deleted", serde_json::Value::Null),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_util;

    fn subject(name: &str, code: i64) -> SubjectInput {
        SubjectInput {
            name: name.into(),
            code,
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_is_a_conflict() {
        let state = test_util::state();

        let resp = post_subject(State(state.clone()), Ok(Json(subject("DBMS", 201)))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = post_subject(State(state.clone()), Ok(Json(subject("DWDM", 201)))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body = test_util::body_json(get_subjects(State(state)).await).await;
        assert_eq!(body["data"][0]["name"], "DBMS");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_subject() {
        let state = test_util::state();
        let resp = put_subject(
            Path("nope".to_string()),
            State(state.clone()),
            Ok(Json(subject("OS", 1))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = delete_subject(Path("nope".to_string()), State(state)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
