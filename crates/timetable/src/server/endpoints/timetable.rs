//! Generator endpoints: the pivoted grid as JSON or HTML, and its exports.
//!
//! Every endpoint takes the same `view` / `day` / `class` query (see
//! [`GridQuery`]) and builds a fresh grid from the stored entries.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::export::{self, pdf, Artifact, ExportError, ExportFormat};
use crate::grid::{build_grid, Grid};
use crate::render::{html, Affordances, Snapshot};
use crate::server::types::{success, ApiErrorType};
use crate::server::util::{attachment, GridQuery};
use crate::types::AppState;

/// Builds the grid selected by `query` from the current entries.
fn load_grid(s: &AppState, query: &GridQuery) -> Result<Grid, ApiErrorType> {
    let view = query.to_view(s.axes())?;
    let entries = s.db.list_entries()?;
    let grid = build_grid(&entries, s.axes(), &view);

    if grid.shadowed_entries() > 0 {
        warn!(
            "{}: {} entries share a cell with an earlier entry and are hidden",
            view.describe(),
            grid.shadowed_entries()
        );
    }
    if grid.unplaced_entries() > 0 {
        warn!(
            "{} entries name a class or time slot that is not configured",
            grid.unplaced_entries()
        );
    }
    Ok(grid)
}

fn join_error(e: tokio::task::JoinError) -> ExportError {
    ExportError::Task {
        message: e.to_string(),
    }
}

/// GET /timetable/axes
///
/// The configured days, classes and time slots, and the break slot.
pub async fn get_axes(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /timetable/axes");
    success(StatusCode::OK, "Timetable axes", s.axes())
}

/// GET /timetable/grid
///
/// Query parameters:
/// - `view` (optional): `day` (default) or `class`
/// - `day` (optional): a day or `all`; defaults to the first day
/// - `class` (optional): a class or `all` (default)
pub async fn get_grid(
    State(s): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    info!(
        "GET /timetable/grid (view={:?}, day={:?}, class={:?})",
        query.view, query.day, query.class
    );

    match load_grid(&s, &query) {
        Ok(grid) => success(StatusCode::OK, &grid.view().describe(), grid),
        Err(e) => e.into_response(),
    }
}

/// GET /timetable/view
///
/// The generator screen: the grid as an HTML table with add, edit and
/// delete controls on each cell.
pub async fn get_view(
    State(s): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    info!(
        "GET /timetable/view (view={:?}, day={:?}, class={:?})",
        query.view, query.day, query.class
    );

    match load_grid(&s, &query) {
        Ok(grid) => {
            let snapshot = Snapshot::from_grid(&grid, &s.config.title, Affordances::Shown);
            Html(html::to_html(&snapshot)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /timetable/export/csv
pub async fn get_export_csv(
    State(s): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    info!(
        "GET /timetable/export/csv (view={:?}, day={:?}, class={:?})",
        query.view, query.day, query.class
    );

    let grid = match load_grid(&s, &query) {
        Ok(grid) => grid,
        Err(e) => return e.into_response(),
    };

    match Artifact::render(&grid, ExportFormat::Csv, &s.config.title) {
        Ok(artifact) => attachment(
            &artifact.file_name,
            artifact.format.content_type(),
            artifact.bytes,
        ),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /timetable/export/pdf
///
/// The snapshot is taken without controls before the render is handed to
/// the blocking pool.
pub async fn get_export_pdf(
    State(s): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    info!(
        "GET /timetable/export/pdf (view={:?}, day={:?}, class={:?})",
        query.view, query.day, query.class
    );

    let grid = match load_grid(&s, &query) {
        Ok(grid) => grid,
        Err(e) => return e.into_response(),
    };

    let file_name = export::file_name(grid.view(), ExportFormat::Pdf);
    let snapshot = Snapshot::from_grid(&grid, &s.config.title, Affordances::Hidden);

    let rendered = tokio::task::spawn_blocking(move || pdf::export_pdf(&snapshot))
        .await
        .map_err(join_error)
        .and_then(|r| r);

    match rendered {
        Ok(bytes) => attachment(&file_name, ExportFormat::Pdf.content_type(), bytes),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /timetable/export/save
///
/// Writes the export into the configured export directory and returns the
/// saved path.
///
/// Query parameters: those of `/timetable/grid`, plus `format` (`csv`
/// by default, or `pdf`).
pub async fn post_export_save(
    State(s): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    info!(
        "POST /timetable/export/save (format={:?}, view={:?}, day={:?}, class={:?})",
        query.format, query.view, query.day, query.class
    );

    let format: ExportFormat = match query.format.as_deref().unwrap_or("csv").parse() {
        Ok(format) => format,
        Err(e) => return ApiErrorType::from(e).into_response(),
    };
    let grid = match load_grid(&s, &query) {
        Ok(grid) => grid,
        Err(e) => return e.into_response(),
    };

    let title = s.config.title.clone();
    let dir = s.config.export_dir.clone();
    let saved = tokio::task::spawn_blocking(move || {
        let artifact = Artifact::render(&grid, format, &title)?;
        let path = export::write_artifact(&dir, &artifact)?;
        Ok::<_, ExportError>((artifact.file_name, artifact.bytes.len(), path))
    })
    .await
    .map_err(join_error)
    .and_then(|r| r);

    match saved {
        Ok((file_name, bytes, path)) => success(
            StatusCode::CREATED,
            "Export saved",
            json!({
                "fileName": file_name,
                "path": path.display().to_string(),
                "bytes": bytes,
            }),
        ),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_util;
    use axum::http::header;

    fn query(view: &str, day: Option<&str>, class: Option<&str>) -> GridQuery {
        GridQuery {
            view: Some(view.to_string()),
            day: day.map(String::from),
            class: class.map(String::from),
            format: None,
        }
    }

    fn seeded() -> Arc<AppState> {
        let state = test_util::state();
        state.db.seed_sample_week().unwrap();
        state
    }

    #[tokio::test]
    async fn test_grid_json() {
        let state = seeded();
        let resp = get_grid(State(state), Query(query("day", Some("Monday"), None))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test_util::body_json(resp).await;
        assert_eq!(body["message"], "Day view: Monday");
        assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 7);
        assert_eq!(body["data"]["columns"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["cells"][0][0]["subject"], "OOM (NGM)");
        assert_eq!(body["data"]["shadowed_entries"], 0);
        assert_eq!(body["data"]["unplaced_entries"], 0);
    }

    #[tokio::test]
    async fn test_malformed_scope_is_bad_request() {
        let state = seeded();
        let resp = get_grid(
            State(state.clone()),
            Query(query("class", None, Some("PhD I"))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = get_export_csv(State(state), Query(query("week", None, None))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_csv_download() {
        let state = seeded();
        let resp = get_export_csv(State(state), Query(GridQuery::default())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"timetable-Monday.csv\""
        );

        let text = String::from_utf8(test_util::body_bytes(resp).await).unwrap();
        assert!(text.starts_with("\"Time\",\"MCA I\",\"MCA II\",\"BCA I\",\"BCA II\"\r\n"));
        assert!(text.contains("\"OOM (NGM) (110)\""));
    }

    #[tokio::test]
    async fn test_pdf_download_has_no_controls() {
        let state = seeded();
        let resp = get_export_pdf(State(state), Query(query("class", None, Some("all")))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"complete-timetable-class-view.pdf\""
        );

        let bytes = test_util::body_bytes(resp).await;
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(!bytes.windows(6).any(|w| w == b"(Edit)"));
    }

    #[tokio::test]
    async fn test_html_view_shows_controls() {
        let state = seeded();
        let resp = get_view(State(state), Query(query("day", Some("all"), None))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = String::from_utf8(test_util::body_bytes(resp).await).unwrap();
        assert!(html.contains("TIME TABLE-DEPARTMENT OF COMPUTER APPLICATION"));
        assert!(html.contains("data-action=\"edit\""));
        assert!(html.contains("data-action=\"add\""));
    }

    #[tokio::test]
    async fn test_save_export_to_directory() {
        let dir = std::env::temp_dir().join(format!(
            "timetable-save-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));

        let mut config = crate::config::AppConfig::default();
        config.export_dir = dir.clone();
        let db = crate::db::TimetableDb::open_in_memory(config.axes.clone()).unwrap();
        db.seed_sample_week().unwrap();
        let state = Arc::new(AppState::new(db, config));

        let mut q = query("class", None, Some("MCA II"));
        q.format = Some("csv".to_string());
        let resp = post_export_save(State(state.clone()), Query(q)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = test_util::body_json(resp).await;
        assert_eq!(body["data"]["fileName"], "timetable-MCA II.csv");
        let saved = std::fs::read_to_string(dir.join("timetable-MCA II.csv")).unwrap();
        assert!(saved.starts_with("\"Class\\Time\""));

        let mut q = query("day", None, None);
        q.format = Some("docx".to_string());
        let resp = post_export_save(State(state), Query(q)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_axes() {
        let state = test_util::state();
        let body = test_util::body_json(get_axes(State(state)).await).await;
        assert_eq!(body["data"]["break_slot"], "1:15 to 2:00");
        assert_eq!(body["data"]["days"][0], "Monday");
    }
}
