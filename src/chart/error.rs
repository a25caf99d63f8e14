//! Chart engine error types.

use thiserror::Error;

/// Errors surfaced by the chart engine.
///
/// Computation edge cases (insufficient history, degenerate windows) are not
/// errors: calculators resolve them locally with empty or sentinel output.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Unknown indicator type requested from the factory
    #[error("unsupported indicator type: {0}")]
    UnsupportedType(String),

    /// Persisted or migrated config is missing required fields
    #[error("invalid indicator config: {0}")]
    InvalidConfig(String),

    /// Pane index rejected by the chart surface
    #[error("invalid pane index: {0}")]
    InvalidPane(usize),

    /// Series handle no longer known to the chart surface
    #[error("series not found on chart surface: {0}")]
    SeriesNotFound(u64),

    /// Chart surface refused to create one of the requested series
    #[error("chart surface rejected series creation: {0}")]
    SurfaceRejected(String),

    /// No live indicator with the given id
    #[error("indicator not found: {0}")]
    IndicatorNotFound(String),

    /// IO failure while persisting configs
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ChartError {
    /// Creates an `InvalidConfig` error with a message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ChartError::InvalidConfig(msg.into())
    }

    /// Creates a `SurfaceRejected` error with a message.
    pub fn surface_rejected(msg: impl Into<String>) -> Self {
        ChartError::SurfaceRejected(msg.into())
    }
}
