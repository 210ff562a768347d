//! False-color rendering of thermal sensor frames.
//!
//! Stages, in pipeline order:
//! - Normalization of raw temperatures to 8-bit intensity
//! - Upscaling (direct resampling or spline magnification) and colorization
//! - Optional edge-preserving filter
//! - Status overlay
//!
//! plus a small PNG encoder for snapshots.

pub mod area;
pub mod filter;
pub mod normalize;
pub mod overlay;
pub mod palette;
pub mod pipeline;
pub mod png;
pub mod spline;
pub mod upscale;

pub use filter::BilateralParams;
pub use normalize::normalize;
pub use overlay::{format_overlay_text, FpsCounter, OverlayInfo, OverlayRenderer};
pub use palette::{available_palettes, Palette};
pub use pipeline::{FrameRenderer, RenderParams};
pub use upscale::{upscale, Interpolation, ResizeFilter, UpscalePlan};
