//! Interactive thermal viewer.
//!
//! Drives the frame pipeline from a sensor to a display:
//! - [`state`]: user-adjustable rendering choices and the dirty flag
//! - [`controller`]: key bindings mapped onto state transitions
//! - [`sensor`], [`display`]: collaborator traits
//! - [`acquire`]: fault substitution and retry policy
//! - [`render_loop`]: the acquire, render, present, poll cycle
//! - [`config`]: YAML configuration with environment overrides

pub mod acquire;
pub mod config;
pub mod controller;
pub mod display;
pub mod render_loop;
pub mod sensor;
pub mod state;

pub use acquire::{AcquireOutcome, Acquirer, FaultFill, RetryPolicy};
pub use config::ViewerConfig;
pub use controller::{Action, InputCode, InteractionController, KeyBindings};
pub use display::{Display, DisplayError};
pub use render_loop::{LoopPhase, LoopStats, RenderLoop};
pub use sensor::{FrameSource, SensorError};
pub use state::ViewerState;
