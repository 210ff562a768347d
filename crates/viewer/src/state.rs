//! User-adjustable viewer state.

use renderer::{Interpolation, RenderParams};

/// Rendering choices plus the cache and exit flags.
///
/// Palette and interpolation indices wrap in both directions. Every change
/// of a rendering choice marks the cached image stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    palette_index: usize,
    palette_count: usize,
    interpolation: Interpolation,
    filter_enabled: bool,
    overlay_enabled: bool,
    dirty: bool,
    exit_requested: bool,
}

impl ViewerState {
    /// New state over `palette_count` palettes. Starts dirty so the first
    /// frame is always rendered.
    pub fn new(
        palette_count: usize,
        palette_index: usize,
        interpolation: Interpolation,
        filter_enabled: bool,
        overlay_enabled: bool,
    ) -> Self {
        let palette_count = palette_count.max(1);
        Self {
            palette_index: palette_index % palette_count,
            palette_count,
            interpolation,
            filter_enabled,
            overlay_enabled,
            dirty: true,
            exit_requested: false,
        }
    }

    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn palette_count(&self) -> usize {
        self.palette_count
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    /// True when the cached image no longer matches the inputs.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn next_palette(&mut self) {
        self.palette_index = (self.palette_index + 1) % self.palette_count;
        self.dirty = true;
    }

    pub fn prev_palette(&mut self) {
        self.palette_index = (self.palette_index + self.palette_count - 1) % self.palette_count;
        self.dirty = true;
    }

    pub fn next_interpolation(&mut self) {
        self.interpolation = self.interpolation.next();
        self.dirty = true;
    }

    pub fn prev_interpolation(&mut self) {
        self.interpolation = self.interpolation.prev();
        self.dirty = true;
    }

    pub fn toggle_filter(&mut self) {
        self.filter_enabled = !self.filter_enabled;
        self.dirty = true;
    }

    pub fn toggle_overlay(&mut self) {
        self.overlay_enabled = !self.overlay_enabled;
        self.dirty = true;
    }

    /// Ask the render loop to stop. Does not invalidate the cache.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// A new raw frame arrived.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The cache was rebuilt.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            palette_index: self.palette_index,
            interpolation: self.interpolation,
            filter_enabled: self.filter_enabled,
        }
    }
}
