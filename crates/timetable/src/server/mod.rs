use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{
    departments, entries, lectures, status, subjects, teachers, timetable,
};
use crate::server::middleware::request_log;
use crate::types::AppState;

mod endpoints;
mod middleware;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Record management
    let admin_router = Router::new()
        .route(
            "/teachers",
            get(teachers::get_teachers).post(teachers::post_teacher),
        )
        .route(
            "/teachers/:id",
            get(teachers::get_teacher)
                .put(teachers::put_teacher)
                .delete(teachers::delete_teacher),
        )
        .route(
            "/subjects",
            get(subjects::get_subjects).post(subjects::post_subject),
        )
        .route(
            "/subjects/:id",
            get(subjects::get_subject)
                .put(subjects::put_subject)
                .delete(subjects::delete_subject),
        )
        .route(
            "/departments",
            get(departments::get_departments).post(departments::post_department),
        )
        .route(
            "/departments/:id",
            get(departments::get_department)
                .put(departments::put_department)
                .delete(departments::delete_department),
        )
        .route(
            "/lectures",
            get(lectures::get_lectures).post(lectures::post_lecture),
        )
        .route(
            "/lectures/:id",
            get(lectures::get_lecture)
                .put(lectures::put_lecture)
                .delete(lectures::delete_lecture),
        )
        .route("/entries", get(entries::get_entries).post(entries::post_entry))
        .route(
            "/entries/:id",
            get(entries::get_entry)
                .put(entries::put_entry)
                .delete(entries::delete_entry),
        );

    // Generator view and exports
    let timetable_router = Router::new()
        .route("/axes", get(timetable::get_axes))
        .route("/grid", get(timetable::get_grid))
        .route("/view", get(timetable::get_view))
        .route("/export/csv", get(timetable::get_export_csv))
        .route("/export/pdf", get(timetable::get_export_pdf))
        .route("/export/save", post(timetable::post_export_save));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(admin_router)
        .nest("/timetable", timetable_router)
        .layer(mw::from_fn(request_log::log_requests))
        .with_state(app_state)
}
