//! Frame source abstraction over the thermal sensor driver.

use thermal_common::RawGrid;
use thiserror::Error;

/// Failure reported by a frame source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The sensor returned samples that could not be read as numbers.
    #[error("malformed sensor read: {0}")]
    Malformed(String),

    /// Transient bus failure.
    #[error("sensor bus timeout: {0}")]
    BusTimeout(String),

    /// The driver gave up after its own internal retries.
    #[error("sensor reported too many retries")]
    TooManyRetries,
}

impl SensorError {
    /// Faults recovered by substituting a fill frame.
    pub fn is_transient(&self) -> bool {
        matches!(self, SensorError::Malformed(_) | SensorError::BusTimeout(_))
    }
}

/// Anything that produces sensor frames on demand.
pub trait FrameSource {
    /// Read the next frame. May block until the sensor has one.
    fn pull_frame(&mut self) -> Result<RawGrid, SensorError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn pull_frame(&mut self) -> Result<RawGrid, SensorError> {
        (**self).pull_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SensorError::Malformed("x".into()).is_transient());
        assert!(SensorError::BusTimeout("x".into()).is_transient());
        assert!(!SensorError::TooManyRetries.is_transient());
    }
}
