//! Error types for the track engine.

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Raster input is not a proper two-dimensional grid
    #[error("Incompatible image dimension: {0}")]
    RasterDimension(String),

    /// Path primitive parameters that would produce NaN or an empty sequence
    #[error("Invalid primitive parameter: {0}")]
    InvalidPrimitive(String),

    /// Sensor construction parameter out of range
    #[error("Invalid sensor parameter: {0}")]
    InvalidParameter(String),

    /// Malformed configuration JSON
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
