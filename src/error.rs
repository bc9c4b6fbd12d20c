use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to decode payload: {0}")]
    Decode(String),
    #[error("No input supplied: {0}")]
    EmptyInput(String),
    #[error("Detector unavailable: {0}")]
    DetectorUnavailable(String),
    #[error("Geometry Error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Failed to bind to port {1}: {0}")]
    Bind(std::io::Error, u16),
    #[error("The camera is already owned by a running capture loop.")]
    CameraBusy,
    #[error("Camera Error: {0}")]
    Camera(String),
    #[error("Session store error: {0}")]
    Store(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

// Geometry Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate geometry: {0} coincides with the vertex")]
    Degenerate(&'static str),
    #[error("Non-finite coordinate in angle input")]
    NonFinite,
}
