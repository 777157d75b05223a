// ---------------------------------------------------------------------------
// GeometryError: failures raised while building terrain and road geometry
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised by height-field queries, spline evaluation and the mesh
/// builders.
///
/// Every variant is fail-fast: the caller aborts the current build and hands
/// the error to whoever loaded the level.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Grid, altitude or vertex-index access outside valid bounds.
    IndexOutOfRange(String),
    /// A query argument outside its domain (curve parameter, NaN coordinate).
    InvalidArgument(String),
    /// Malformed input data: control-point count, width, dimensions, sample
    /// rate or a degenerate spline.
    InvalidConfiguration(String),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::IndexOutOfRange(msg) => write!(f, "Index out of range: {msg}"),
            GeometryError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            GeometryError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
