use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::EntryInput;
use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /entries
///
/// All timetable entries in insertion order.
pub async fn get_entries(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /entries");

    match s.db.list_entries() {
        Ok(entries) => success(StatusCode::OK, "Timetable entries fetched", entries),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /entries/:id
pub async fn get_entry(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /entries/{}", id);

    match s.db.get_entry(&id) {
        Ok(entry) => success(StatusCode::OK, "Timetable entry fetched", entry),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /entries
///
/// Adding to an occupied cell succeeds, but the existing entry keeps
/// showing in the grid.
pub async fn post_entry(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> Response {
    info!("POST /entries");

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.create_entry(&input) {
        Ok(entry) => success(StatusCode::CREATED, "Timetable entry added", entry),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /entries/:id
pub async fn put_entry(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> Response {
    info!("PUT /entries/{}", id);

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.update_entry(&id, &input) {
        Ok(entry) => success(StatusCode::OK, "Timetable entry updated", entry),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// DELETE /entries/:id
pub async fn delete_entry(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /entries/{}", id);

    match s.db.delete_entry(&id) {
        Ok(()) => success(StatusCode::OK, "Timetable entry deleted", serde_json::Value::Null),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_util;

    fn entry(time: &str) -> EntryInput {
        serde_json::from_value(serde_json::json!({
            "day": "Tuesday",
            "class": "MCA I",
            "time": time,
            "subject": "Python (VIP)",
            "room": "110"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_entry_crud() {
        let state = test_util::state();

        let resp = post_entry(State(state.clone()), Ok(Json(entry("9:00 to 10:00")))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test_util::body_json(resp).await;
        assert_eq!(body["data"]["class"], "MCA I");
        assert!(body["data"].get("teacher").is_none());
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let resp = put_entry(
            Path(id.clone()),
            State(state.clone()),
            Ok(Json(entry("2:00 to 3:00"))),
        )
        .await;
        let body = test_util::body_json(resp).await;
        assert_eq!(body["data"]["time"], "2:00 to 3:00");

        let resp = delete_entry(Path(id.clone()), State(state.clone())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = get_entry(Path(id), State(state)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_break_slot_entry_rejected() {
        let state = test_util::state();
        let resp = post_entry(State(state.clone()), Ok(Json(entry("1:15 to 2:00")))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = test_util::body_json(get_entries(State(state)).await).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
