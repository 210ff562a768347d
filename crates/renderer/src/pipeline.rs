//! Raw frame to display image: normalize, upscale and colorize, filter.
//!
//! The overlay is not part of this pipeline; it depends on timing state
//! owned by the caller.

use crate::filter::{smooth, BilateralParams};
use crate::normalize::normalize;
use crate::palette::Palette;
use crate::upscale::{upscale, Interpolation};
use image::RgbImage;
use std::time::Instant;
use thermal_common::{FrameBounds, IntensityGrid, RawGrid, ThermalError, ThermalResult};
use tracing::debug;

/// Per-frame rendering choices, taken from the viewer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    pub palette_index: usize,
    pub interpolation: Interpolation,
    pub filter_enabled: bool,
}

/// Fixed rendering setup for one display surface.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    palettes: Vec<Palette>,
    width: u32,
    height: u32,
    filter: BilateralParams,
}

impl FrameRenderer {
    /// Compile `palette_names` in order for a `width` x `height` target.
    pub fn new<S: AsRef<str>>(
        palette_names: &[S],
        width: u32,
        height: u32,
        filter: BilateralParams,
    ) -> ThermalResult<Self> {
        if palette_names.is_empty() {
            return Err(ThermalError::Config("palette list is empty".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(ThermalError::Config(format!(
                "display size {}x{} is empty",
                width, height
            )));
        }

        let palettes = palette_names
            .iter()
            .map(|name| Palette::by_name(name.as_ref()))
            .collect::<ThermalResult<Vec<_>>>()?;

        Ok(Self {
            palettes,
            width,
            height,
            filter,
        })
    }

    pub fn palette_count(&self) -> usize {
        self.palettes.len()
    }

    /// Palette at `index`, wrapping past the end.
    pub fn palette(&self, index: usize) -> &Palette {
        &self.palettes[index % self.palettes.len()]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Full pipeline from a raw frame.
    pub fn render(&self, raw: &RawGrid, bounds: FrameBounds, params: &RenderParams) -> RgbImage {
        let intensity = normalize(raw, bounds);
        self.render_intensity(&intensity, params)
    }

    /// Pipeline from an already normalized grid.
    pub fn render_intensity(&self, intensity: &IntensityGrid, params: &RenderParams) -> RgbImage {
        let started = Instant::now();
        let palette = self.palette(params.palette_index);

        let mut image = upscale(
            intensity,
            palette,
            params.interpolation,
            self.width,
            self.height,
        );
        if params.filter_enabled {
            image = smooth(&image, &self.filter);
        }

        debug!(
            palette = palette.name(),
            interpolation = params.interpolation.name(),
            filtered = params.filter_enabled,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Rendered frame"
        );
        image
    }
}
