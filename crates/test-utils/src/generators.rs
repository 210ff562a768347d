//! Synthetic sensor frames with predictable, verifiable patterns.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thermal_common::{RawGrid, SENSOR_HEIGHT, SENSOR_PIXELS, SENSOR_WIDTH};

/// Linear ramp over the row-major sample order, from `start` at the first
/// sample to `end` at the last one.
///
/// # Example
///
/// ```
/// use test_utils::ramp_grid;
///
/// let grid = ramp_grid(15.0, 35.0);
/// assert_eq!(grid.as_slice()[0], 15.0);
/// assert_eq!(grid.as_slice()[767], 35.0);
/// ```
pub fn ramp_grid(start: f32, end: f32) -> RawGrid {
    let last = (SENSOR_PIXELS - 1) as f32;
    let mut grid = RawGrid::zeros();
    for (i, v) in grid.as_mut_slice().iter_mut().enumerate() {
        *v = if i == SENSOR_PIXELS - 1 {
            end
        } else {
            start + (end - start) * i as f32 / last
        };
    }
    grid
}

/// Every sample at `value`.
pub fn uniform_grid(value: f32) -> RawGrid {
    RawGrid::filled(value)
}

/// Room-temperature background with a warm disc centered on (`col`, `row`).
///
/// Samples inside `radius` fall off linearly from `peak` at the center to
/// `background` at the edge.
pub fn hot_spot_grid(background: f32, peak: f32, col: f32, row: f32, radius: f32) -> RawGrid {
    let mut grid = RawGrid::filled(background);
    let radius = radius.max(f32::EPSILON);
    for r in 0..SENSOR_HEIGHT {
        for c in 0..SENSOR_WIDTH {
            let d = ((c as f32 - col).powi(2) + (r as f32 - row).powi(2)).sqrt();
            if d < radius {
                let t = 1.0 - d / radius;
                grid.as_mut_slice()[r * SENSOR_WIDTH + c] = background + (peak - background) * t;
            }
        }
    }
    grid
}

/// Copy of `grid` with NaN written at each index in `indices`.
pub fn with_glitches(grid: &RawGrid, indices: &[usize]) -> RawGrid {
    let mut out = grid.clone();
    for &i in indices {
        if let Some(v) = out.as_mut_slice().get_mut(i) {
            *v = f32::NAN;
        }
    }
    out
}

/// `base` plus uniform noise in `[-amplitude, amplitude]`, reproducible for
/// a given `seed`.
pub fn noisy_grid(base: f32, amplitude: f32, seed: u64) -> RawGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = RawGrid::filled(base);
    if amplitude > 0.0 {
        for v in grid.as_mut_slice() {
            *v += rng.gen_range(-amplitude..=amplitude);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_is_monotonic() {
        let grid = ramp_grid(15.0, 35.0);
        assert!(grid.as_slice().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(grid.bounds().min, 15.0);
        assert_eq!(grid.bounds().max, 35.0);
    }

    #[test]
    fn test_hot_spot_peak() {
        let grid = hot_spot_grid(21.0, 36.0, 10.0, 5.0, 4.0);
        assert_eq!(grid.as_slice()[5 * 32 + 10], 36.0);
        assert_eq!(grid.as_slice()[23 * 32], 21.0);
        assert_eq!(grid.bounds().max, 36.0);
    }

    #[test]
    fn test_with_glitches() {
        let grid = with_glitches(&uniform_grid(20.0), &[0, 5, 10_000]);
        let glitches = grid.as_slice().iter().filter(|v| !v.is_finite()).count();
        assert_eq!(glitches, 2);
    }

    #[test]
    fn test_noisy_grid_is_reproducible() {
        let a = noisy_grid(22.0, 0.5, 7);
        let b = noisy_grid(22.0, 0.5, 7);
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|v| (v - 22.0).abs() <= 0.5));
    }
}
