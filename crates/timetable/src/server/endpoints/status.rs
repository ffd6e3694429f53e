use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::server::types::{success, ApiErrorType};
use crate::types::AppState;

/// GET /health
///
/// Reports that the service is up and the store answers queries.
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /health");

    match s.db.count_entries() {
        Ok(entries) => success(
            StatusCode::OK,
            "OK",
            json!({
                "entries": entries,
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => {
            let mut err = ApiErrorType::from(e);
            err.status = StatusCode::SERVICE_UNAVAILABLE;
            err.into_response()
        }
    }
}
