//! Frame acquisition with fault substitution and retry.
//!
//! - Transient faults (malformed read, bus timeout) never stop the viewer:
//!   a fill frame is substituted and the fault is counted.
//! - A retry storm (`TooManyRetries`) is retried with exponential backoff.
//!   Without an attempt limit the pull is retried until it succeeds. With a
//!   limit, exhausting it substitutes the fill frame and marks the source
//!   degraded until the next successful pull.

use crate::sensor::{FrameSource, SensorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thermal_common::RawGrid;
use tracing::{debug, error, info, warn};

/// What to show when a pull fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultFill {
    /// All-zero frame.
    #[default]
    Zero,
    /// Most recent good frame, or zeros before the first one.
    LastGood,
}

/// Retry settings for retry storms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pulls allowed per acquisition before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Delay after the first failed pull (doubles each retry).
    pub initial_delay: Duration,
    /// Upper bound on the delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Retry forever without sleeping.
    pub fn immediate() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay to wait after failed pull number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }
}

/// How an acquisition ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A frame straight from the sensor.
    Fresh,
    /// A transient fault; the fill frame was substituted.
    Substituted(SensorError),
    /// Retry budget exhausted; the fill frame was substituted.
    Degraded,
}

/// Result of one acquisition.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub grid: RawGrid,
    pub outcome: AcquireOutcome,
    /// Retry storm pulls that preceded this result.
    pub retries: u32,
}

/// Stateful acquisition policy.
#[derive(Debug, Clone)]
pub struct Acquirer {
    fill: FaultFill,
    retry: RetryPolicy,
    last_good: Option<RawGrid>,
    degraded: bool,
    transient_faults: u64,
    retry_storms: u64,
}

impl Acquirer {
    pub fn new(fill: FaultFill, retry: RetryPolicy) -> Self {
        Self {
            fill,
            retry,
            last_good: None,
            degraded: false,
            transient_faults: 0,
            retry_storms: 0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn transient_faults(&self) -> u64 {
        self.transient_faults
    }

    /// Acquisitions that hit at least one `TooManyRetries`.
    pub fn retry_storms(&self) -> u64 {
        self.retry_storms
    }

    fn fill_grid(&self) -> RawGrid {
        match (self.fill, &self.last_good) {
            (FaultFill::LastGood, Some(grid)) => grid.clone(),
            _ => RawGrid::zeros(),
        }
    }

    /// Pull one frame from `source`, applying the fault policy.
    pub fn acquire<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Acquisition {
        let mut attempt: u32 = 0;

        loop {
            match source.pull_frame() {
                Ok(grid) => {
                    if self.degraded {
                        info!(retries = attempt, "Sensor recovered");
                        self.degraded = false;
                    }
                    if self.fill == FaultFill::LastGood {
                        self.last_good = Some(grid.clone());
                    }
                    return Acquisition {
                        grid,
                        outcome: AcquireOutcome::Fresh,
                        retries: attempt,
                    };
                }
                Err(e) if e.is_transient() => {
                    self.transient_faults += 1;
                    warn!(
                        error = %e,
                        faults = self.transient_faults,
                        fill = ?self.fill,
                        "Transient sensor fault, substituting fill frame"
                    );
                    return Acquisition {
                        grid: self.fill_grid(),
                        outcome: AcquireOutcome::Substituted(e),
                        retries: attempt,
                    };
                }
                Err(_) => {
                    attempt += 1;
                    if attempt == 1 {
                        self.retry_storms += 1;
                    }

                    if let Some(max) = self.retry.max_attempts {
                        if attempt >= max.max(1) {
                            self.degraded = true;
                            error!(
                                attempts = attempt,
                                fill = ?self.fill,
                                "Sensor retry budget exhausted, showing fill frame"
                            );
                            return Acquisition {
                                grid: self.fill_grid(),
                                outcome: AcquireOutcome::Degraded,
                                retries: attempt,
                            };
                        }
                    }

                    let delay = self.retry.delay_for(attempt);
                    debug!(
                        attempt = attempt,
                        max_attempts = ?self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Sensor reported too many retries, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}

impl Default for Acquirer {
    fn default() -> Self {
        Self::new(FaultFill::default(), RetryPolicy::default())
    }
}
