//! Common types and utilities shared across the thermal camera crates.

pub mod error;
pub mod grid;

pub use error::{ThermalError, ThermalResult};
pub use grid::{FrameBounds, IntensityGrid, RawGrid, SENSOR_HEIGHT, SENSOR_PIXELS, SENSOR_WIDTH};
