//! Error types for the grid subsystem.

use thiserror::Error;

/// Errors raised while validating grid inputs.
///
/// Building a grid never fails; these are returned by the callers that turn
/// user input into a [`super::View`] or load the axis enumerations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A view, day or class selector outside the configured enumerations
    #[error("Malformed {axis} scope: {value:?}")]
    MalformedScope { axis: &'static str, value: String },

    /// The configured axes cannot produce a coherent grid
    #[error("Invalid axes: {message}")]
    InvalidAxes { message: String },
}
