//! Error types for swath

use thiserror::Error;

/// Main error type for swath operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid geometry for polygon {id}: {reason}")]
    InvalidGeometry { id: i64, reason: String },

    #[error("Feature {feature} has no usable '{field}' attribute")]
    MissingAttribute { field: String, feature: usize },

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`] with a displayable value.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for swath operations
pub type Result<T> = std::result::Result<T, Error>;
