use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::grid::{Axes, GridError, View};

/// Query string shared by the timetable endpoints, e.g.
/// `?view=class&class=MCA%20I` or `?view=day&day=all`.
#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    pub view: Option<String>,
    pub day: Option<String>,
    pub class: Option<String>,
    /// Only read by the save endpoint
    pub format: Option<String>,
}

impl GridQuery {
    /// Resolves the query against `axes`. Missing values fall back to the
    /// day view of the first configured day and all classes.
    pub fn to_view(&self, axes: &Axes) -> Result<View, GridError> {
        View::parse(
            self.view.as_deref(),
            self.day.as_deref(),
            self.class.as_deref(),
            axes,
        )
    }
}

/// Builds a file download response.
pub fn attachment(file_name: &str, content_type: &'static str, bytes: Vec<u8>) -> Response {
    // Quotes and non-ASCII would break the header; class labels are plain text
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '"' || !c.is_ascii() || c.is_ascii_control() { '_' } else { c })
        .collect();
    let disposition = format!("attachment; filename=\"{safe_name}\"");

    let mut resp = (StatusCode::OK, bytes).into_response();
    let headers = resp.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    resp
}
