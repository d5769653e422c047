//! Error types for the featimp crate

use thiserror::Error;

/// Result type alias for featimp operations
pub type Result<T> = std::result::Result<T, FeatimpError>;

/// Main error type for the featimp crate
#[derive(Error, Debug)]
pub enum FeatimpError {
    /// Data loading or conversion failure
    #[error("Data error: {0}")]
    DataError(String),

    /// Requested feature does not exist in the dataset
    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    /// Dimension mismatch between collaborating arrays
    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    /// Invalid argument or dataset state
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The prediction function reported a failure
    #[error("Prediction error: {0}")]
    PredictionError(String),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// No plot backend was configured for rendering
    #[error("Rendering backend unavailable: {0}")]
    RenderBackendUnavailable(String),

    /// The plot backend exists but cannot open a drawing surface
    #[error("Rendering display unavailable: {0}")]
    RenderDisplayUnavailable(String),

    /// Drawing onto a surface failed
    #[error("Render error: {0}")]
    RenderError(String),
}

impl From<polars::error::PolarsError> for FeatimpError {
    fn from(err: polars::error::PolarsError) -> Self {
        FeatimpError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for FeatimpError {
    fn from(err: serde_json::Error) -> Self {
        FeatimpError::SerializationError(err.to_string())
    }
}
