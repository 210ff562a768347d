//! Fixed-size sensor grids.
//!
//! The sensor delivers 768 temperature samples laid out as 24 rows of 32
//! columns (row-major, top row first).

use crate::{ThermalError, ThermalResult};
use serde::{Deserialize, Serialize};

/// Number of sensor columns.
pub const SENSOR_WIDTH: usize = 32;
/// Number of sensor rows.
pub const SENSOR_HEIGHT: usize = 24;
/// Total number of samples per frame.
pub const SENSOR_PIXELS: usize = SENSOR_WIDTH * SENSOR_HEIGHT;

/// Minimum and maximum temperature of a single frame, in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBounds {
    pub min: f32,
    pub max: f32,
}

impl FrameBounds {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Temperature span of the frame.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// True when the span cannot be used as a divisor.
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !span.is_finite() || span <= 0.0
    }
}

impl Default for FrameBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// One frame of raw temperatures in Celsius. May contain non-finite samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGrid {
    data: Vec<f32>,
}

impl RawGrid {
    /// Zero-filled frame, substituted when an acquisition fails.
    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; SENSOR_PIXELS],
        }
    }

    /// Frame with every sample set to `value`.
    pub fn filled(value: f32) -> Self {
        Self {
            data: vec![value; SENSOR_PIXELS],
        }
    }

    /// Build a frame from row-major samples.
    pub fn from_vec(data: Vec<f32>) -> ThermalResult<Self> {
        if data.len() != SENSOR_PIXELS {
            return Err(ThermalError::InvalidGrid {
                expected: SENSOR_PIXELS,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> usize {
        SENSOR_WIDTH
    }

    pub fn height(&self) -> usize {
        SENSOR_HEIGHT
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Min and max over the finite samples. A frame with no finite sample
    /// reports `0.0..0.0`.
    pub fn bounds(&self) -> FrameBounds {
        let (min, max) = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        if min > max {
            FrameBounds::default()
        } else {
            FrameBounds::new(min, max)
        }
    }

    /// Mean temperature of the whole field of view, ignoring non-finite samples.
    pub fn mean(&self) -> f32 {
        let (sum, count) = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0usize), |(sum, count), &v| (sum + v as f64, count + 1));

        if count == 0 {
            0.0
        } else {
            (sum / count as f64) as f32
        }
    }

    /// Copy of this frame with non-finite samples replaced by zero.
    pub fn sanitized(&self) -> Self {
        Self {
            data: self
                .data
                .iter()
                .map(|&v| if v.is_finite() { v } else { 0.0 })
                .collect(),
        }
    }
}

impl Default for RawGrid {
    fn default() -> Self {
        Self::zeros()
    }
}

/// 8-bit normalized frame, ready for palette lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    data: Vec<u8>,
}

impl IntensityGrid {
    /// Frame with every sample set to `value`.
    pub fn filled(value: u8) -> Self {
        Self {
            data: vec![value; SENSOR_PIXELS],
        }
    }

    pub fn from_vec(data: Vec<u8>) -> ThermalResult<Self> {
        if data.len() != SENSOR_PIXELS {
            return Err(ThermalError::InvalidGrid {
                expected: SENSOR_PIXELS,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> usize {
        SENSOR_WIDTH
    }

    pub fn height(&self) -> usize {
        SENSOR_HEIGHT
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = RawGrid::from_vec(vec![0.0; 10]).unwrap_err();
        assert!(matches!(
            err,
            ThermalError::InvalidGrid { expected: 768, actual: 10 }
        ));
    }

    #[test]
    fn test_bounds_skip_non_finite() {
        let mut grid = RawGrid::filled(21.0);
        grid.as_mut_slice()[0] = f32::NAN;
        grid.as_mut_slice()[1] = f32::INFINITY;
        grid.as_mut_slice()[2] = 30.5;
        grid.as_mut_slice()[3] = 18.0;

        let bounds = grid.bounds();
        assert_eq!(bounds.min, 18.0);
        assert_eq!(bounds.max, 30.5);
    }

    #[test]
    fn test_bounds_all_nan() {
        let grid = RawGrid::filled(f32::NAN);
        assert_eq!(grid.bounds(), FrameBounds::default());
        assert!(grid.bounds().is_degenerate());
    }

    #[test]
    fn test_mean() {
        let mut grid = RawGrid::filled(20.0);
        grid.as_mut_slice()[5] = f32::NAN;
        assert!((grid.mean() - 20.0).abs() < 1e-5);
        assert_eq!(RawGrid::filled(f32::NAN).mean(), 0.0);
    }

    #[test]
    fn test_sanitized() {
        let mut grid = RawGrid::filled(25.0);
        grid.as_mut_slice()[7] = f32::NEG_INFINITY;
        let clean = grid.sanitized();
        assert_eq!(clean.as_slice()[7], 0.0);
        assert_eq!(clean.as_slice()[8], 25.0);
        assert!(clean.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_intensity_from_vec_rejects_wrong_length() {
        assert!(IntensityGrid::from_vec(vec![0u8; SENSOR_PIXELS]).is_ok());
        assert!(IntensityGrid::from_vec(vec![0u8; SENSOR_PIXELS - 1]).is_err());
    }
}
