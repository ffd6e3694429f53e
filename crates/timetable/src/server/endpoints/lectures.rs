use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::LectureInput;
use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /lectures
pub async fn get_lectures(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /lectures");

    match s.db.list_lectures() {
        Ok(lectures) => success(StatusCode::OK, "Lectures fetched", lectures),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /lectures/:id
pub async fn get_lecture(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /lectures/{}", id);

    match s.db.get_lecture(&id) {
        Ok(lecture) => success(StatusCode::OK, "Lecture fetched", lecture),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /lectures
pub async fn post_lecture(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<LectureInput>, JsonRejection>,
) -> Response {
    info!("POST /lectures");

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.create_lecture(&input) {
        Ok(lecture) => success(StatusCode::CREATED, "Lecture added", lecture),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /lectures/:id
pub async fn put_lecture(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<LectureInput>, JsonRejection>,
) -> Response {
    info!("PUT /lectures/{}", id);

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.update_lecture(&id, &input) {
        Ok(lecture) => success(StatusCode::OK, "Lecture updated", lecture),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// DELETE /lectures/:id
pub async fn delete_lecture(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /lectures/{}", id);

    match s.db.delete_lecture(&id) {
        Ok(()) => success(StatusCode::OK, "Lecture deleted", serde_json::Value::Null),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_util;

    fn lecture(number: i64) -> LectureInput {
        serde_json::from_value(serde_json::json!({
            "day": "thursday",
            "name": "CN (MP)",
            "lectureNumber": number,
            "fromTime": "09:00",
            "department": "MCA I"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_lectures() {
        let state = test_util::state();
        let resp = post_lecture(State(state.clone()), Ok(Json(lecture(1)))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test_util::body_json(resp).await;
        assert_eq!(body["data"]["day"], "Thursday");
        assert_eq!(body["data"]["lectureNumber"], 1);

        let body = test_util::body_json(get_lectures(State(state)).await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lecture_number_out_of_range() {
        let state = test_util::state();
        let resp = post_lecture(State(state), Ok(Json(lecture(9)))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
