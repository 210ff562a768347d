//! Synthetic frame source: a warm blob drifting over a room-temperature
//! background, with sensor noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thermal_common::{RawGrid, SENSOR_HEIGHT, SENSOR_WIDTH};
use viewer::{FrameSource, SensorError};

const BACKGROUND_C: f32 = 22.0;
const PEAK_C: f32 = 34.5;
const BLOB_RADIUS: f32 = 5.0;
const NOISE_C: f32 = 0.25;

pub struct SyntheticSensor {
    rng: StdRng,
    frame: u64,
    period: Option<Duration>,
    last_pull: Option<Instant>,
    fault_every: Option<u64>,
}

impl SyntheticSensor {
    /// `refresh_hz` paces pulls like the real sensor; zero disables pacing.
    /// `fault_every` injects a bus timeout on every n-th pull.
    pub fn new(refresh_hz: f32, fault_every: Option<u64>, seed: u64) -> Self {
        let period = (refresh_hz > 0.0 && refresh_hz.is_finite())
            .then(|| Duration::from_secs_f32(1.0 / refresh_hz));
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            period,
            last_pull: None,
            fault_every: fault_every.filter(|n| *n > 0),
        }
    }

    fn pace(&mut self) {
        if let (Some(period), Some(last)) = (self.period, self.last_pull) {
            let elapsed = last.elapsed();
            if elapsed < period {
                std::thread::sleep(period - elapsed);
            }
        }
        self.last_pull = Some(Instant::now());
    }

    /// Blob center for frame `n`, tracing a slow Lissajous curve.
    fn blob_center(n: u64) -> (f32, f32) {
        let t = n as f32 * 0.15;
        let cx = (SENSOR_WIDTH as f32 - 1.0) * (0.5 + 0.35 * t.sin());
        let cy = (SENSOR_HEIGHT as f32 - 1.0) * (0.5 + 0.3 * (t * 0.7).cos());
        (cx, cy)
    }
}

impl FrameSource for SyntheticSensor {
    fn pull_frame(&mut self) -> Result<RawGrid, SensorError> {
        self.pace();
        self.frame += 1;

        if let Some(n) = self.fault_every {
            if self.frame % n == 0 {
                return Err(SensorError::BusTimeout(format!(
                    "injected fault on frame {}",
                    self.frame
                )));
            }
        }

        let (cx, cy) = Self::blob_center(self.frame);
        let mut grid = RawGrid::filled(BACKGROUND_C);
        for (i, v) in grid.as_mut_slice().iter_mut().enumerate() {
            let col = (i % SENSOR_WIDTH) as f32;
            let row = (i / SENSOR_WIDTH) as f32;
            let d = ((col - cx).powi(2) + (row - cy).powi(2)).sqrt();
            if d < BLOB_RADIUS {
                *v += (PEAK_C - BACKGROUND_C) * (1.0 - d / BLOB_RADIUS);
            }
            *v += self.rng.gen_range(-NOISE_C..=NOISE_C);
        }
        Ok(grid)
    }
}
