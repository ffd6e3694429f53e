use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::DepartmentInput;
use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /departments
pub async fn get_departments(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /departments");

    match s.db.list_departments() {
        Ok(departments) => success(StatusCode::OK, "Departments fetched", departments),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /departments/:id
pub async fn get_department(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /departments/{}", id);

    match s.db.get_department(&id) {
        Ok(department) => success(StatusCode::OK, "Department fetched", department),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /departments
pub async fn post_department(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<DepartmentInput>, JsonRejection>,
) -> Response {
    info!("POST /departments");

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.create_department(&input) {
        Ok(department) => success(StatusCode::CREATED, "Department added", department),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// PUT /departments/:id
pub async fn put_department(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<DepartmentInput>, JsonRejection>,
) -> Response {
    info!("PUT /departments/{}", id);

    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };

    match s.db.update_department(&id, &input) {
        Ok(department) => success(StatusCode::OK, "Department updated", department),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// DELETE /departments/:id
pub async fn delete_department(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /departments/{}", id);

    match s.db.delete_department(&id) {
        Ok(()) => success(StatusCode::OK, "Department deleted", serde_json::Value::Null),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_util;

    #[tokio::test]
    async fn test_department_round_trip() {
        let state = test_util::state();
        let resp = post_department(
            State(state.clone()),
            Ok(Json(DepartmentInput {
                name: "BCA II".into(),
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = test_util::body_json(resp).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let resp = put_department(
            Path(id.clone()),
            State(state.clone()),
            Ok(Json(DepartmentInput {
                name: "BCA III".into(),
            })),
        )
        .await;
        let body = test_util::body_json(resp).await;
        assert_eq!(body["data"]["name"], "BCA III");

        let resp = get_department(Path(id), State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_blank_department_name() {
        let state = test_util::state();
        let resp = post_department(
            State(state),
            Ok(Json(DepartmentInput { name: " ".into() })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
