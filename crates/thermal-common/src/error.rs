//! Error types for the thermal camera crates.

use thiserror::Error;

/// Result type alias using ThermalError.
pub type ThermalResult<T> = Result<T, ThermalError>;

/// Primary error type for thermal viewer operations.
#[derive(Debug, Error)]
pub enum ThermalError {
    // === Data Errors ===
    #[error("Invalid grid: expected {expected} samples, got {actual}")]
    InvalidGrid { expected: usize, actual: usize },

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Unknown interpolation: {0}")]
    UnknownInterpolation(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThermalError {
    /// Whether the error stems from user-supplied configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ThermalError::Config(_)
                | ThermalError::UnknownPalette(_)
                | ThermalError::UnknownInterpolation(_)
        )
    }
}
