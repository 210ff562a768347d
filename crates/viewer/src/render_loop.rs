//! The acquire, render, present, poll cycle.

use crate::acquire::{AcquireOutcome, Acquirer};
use crate::config::ViewerConfig;
use crate::controller::InteractionController;
use crate::display::Display;
use crate::sensor::FrameSource;
use crate::state::ViewerState;
use image::RgbImage;
use renderer::{normalize, FpsCounter, FrameRenderer, OverlayInfo, OverlayRenderer};
use std::time::Instant;
use thermal_common::{FrameBounds, IntensityGrid, RawGrid, ThermalResult};
use tracing::{debug, info, warn};

/// Where the loop is within one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Acquiring,
    Processing,
    Presenting,
    PollingInput,
    Exited,
}

/// Counters reported when the loop finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_acquired: u64,
    pub frames_rendered: u64,
    pub frames_presented: u64,
    pub transient_faults: u64,
    pub retry_storms: u64,
    pub degraded: bool,
}

/// Single-threaded viewer driving one frame source and one display.
pub struct RenderLoop<S, D> {
    source: S,
    display: D,
    renderer: FrameRenderer,
    overlay: OverlayRenderer,
    controller: InteractionController,
    acquirer: Acquirer,
    state: ViewerState,
    raw: RawGrid,
    bounds: FrameBounds,
    image: RgbImage,
    overlay_text: Option<String>,
    fps: FpsCounter,
    phase: LoopPhase,
    stats: LoopStats,
    released: bool,
    help_logged: bool,
}

impl<S: FrameSource, D: Display> RenderLoop<S, D> {
    /// Build a loop from a validated configuration.
    pub fn new(config: &ViewerConfig, source: S, display: D) -> ThermalResult<Self> {
        config.validate()?;

        let renderer = FrameRenderer::new(
            &config.palettes,
            config.display.width,
            config.display.height,
            config.filter.params(),
        )?;
        let overlay = OverlayRenderer::new(
            config.overlay.anchor,
            config.overlay.font_path.as_deref(),
            config.overlay.font_size,
        );
        let controller = InteractionController::new(config.key_bindings()?);
        let acquirer = Acquirer::new(
            config.acquisition.fault_fill,
            config.acquisition.retry_policy(),
        );
        let state = ViewerState::new(
            renderer.palette_count(),
            config.default_palette_index,
            config.interpolation()?,
            config.filter.enabled_by_default,
            config.overlay.enabled_by_default,
        );

        info!(
            width = config.display.width,
            height = config.display.height,
            palettes = renderer.palette_count(),
            interpolation = state.interpolation().name(),
            truetype_overlay = overlay.uses_truetype(),
            "Viewer ready"
        );

        Ok(Self::from_parts(
            renderer, overlay, controller, acquirer, state, source, display,
        ))
    }

    /// Assemble a loop from already built components.
    pub fn from_parts(
        renderer: FrameRenderer,
        overlay: OverlayRenderer,
        controller: InteractionController,
        acquirer: Acquirer,
        state: ViewerState,
        source: S,
        display: D,
    ) -> Self {
        let (width, height) = renderer.dimensions();
        Self {
            source,
            display,
            renderer,
            overlay,
            controller,
            acquirer,
            state,
            raw: RawGrid::zeros(),
            bounds: FrameBounds::default(),
            image: RgbImage::new(width, height),
            overlay_text: None,
            fps: FpsCounter::new(Instant::now()),
            phase: LoopPhase::Idle,
            stats: LoopStats::default(),
            released: false,
            help_logged: false,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            transient_faults: self.acquirer.transient_faults(),
            retry_storms: self.acquirer.retry_storms(),
            degraded: self.acquirer.is_degraded(),
            ..self.stats.clone()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.acquirer.is_degraded()
    }

    /// Latest raw frame.
    pub fn current_raw(&self) -> &RawGrid {
        &self.raw
    }

    /// Bounds of the latest raw frame.
    pub fn current_bounds(&self) -> FrameBounds {
        self.bounds
    }

    /// Latest raw frame normalized with its own bounds.
    pub fn current_intensity(&self) -> IntensityGrid {
        normalize(&self.raw, self.bounds)
    }

    /// Mean temperature of the latest raw frame.
    pub fn mean_temperature(&self) -> f32 {
        self.raw.mean()
    }

    /// Cached image. Never renders.
    pub fn current_image(&self) -> &RgbImage {
        &self.image
    }

    /// Status line burned into the cached image, if the overlay was on.
    pub fn overlay_text(&self) -> Option<&str> {
        self.overlay_text.as_deref()
    }

    /// Timestamp of the last overlay draw.
    pub fn last_overlay_time(&self) -> Instant {
        self.fps.last()
    }

    /// Pull a new raw frame without rendering it.
    pub fn refresh_raw(&mut self) -> &RawGrid {
        let acquisition = self.acquirer.acquire(&mut self.source);
        if let AcquireOutcome::Substituted(ref e) = acquisition.outcome {
            debug!(error = %e, "Frame substituted");
        }

        self.raw = acquisition.grid;
        self.bounds = self.raw.bounds();
        self.stats.frames_acquired += 1;
        self.state.mark_dirty();
        &self.raw
    }

    /// Re-render the cache if anything changed since the last render.
    pub fn render(&mut self) -> &RgbImage {
        if self.state.is_dirty() {
            self.render_now();
        }
        &self.image
    }

    /// Pull a new frame and render it.
    pub fn update_image_frame(&mut self) -> &RgbImage {
        self.refresh_raw();
        self.render()
    }

    fn render_now(&mut self) {
        let params = self.state.render_params();
        let mut image = self.renderer.render(&self.raw, self.bounds, &params);

        self.overlay_text = None;
        if self.state.overlay_enabled() {
            let fps = self.fps.tick(Instant::now());
            let info = OverlayInfo {
                bounds: self.bounds,
                fps,
                interpolation: params.interpolation,
                palette: self.renderer.palette(params.palette_index).name(),
                filtered: params.filter_enabled,
                degraded: self.acquirer.is_degraded(),
            };
            self.overlay_text = Some(self.overlay.draw(&mut image, &info));
        }

        self.image = image;
        self.state.clear_dirty();
        self.stats.frames_rendered += 1;
    }

    /// Run one full iteration. Returns `Acquiring` to continue or `Exited`.
    pub fn step(&mut self) -> LoopPhase {
        if self.phase == LoopPhase::Exited {
            return LoopPhase::Exited;
        }

        self.phase = LoopPhase::Acquiring;
        self.refresh_raw();

        self.phase = LoopPhase::Processing;
        self.render();

        self.phase = LoopPhase::Presenting;
        match self.display.present(&self.image) {
            Ok(()) => {
                self.stats.frames_presented += 1;
                if !self.help_logged {
                    info!(bindings = %self.controller.bindings().help_text(), "Key bindings");
                    self.help_logged = true;
                }
            }
            Err(e) => warn!(error = %e, "Failed to present frame"),
        }

        self.phase = LoopPhase::PollingInput;
        if let Some(code) = self.display.poll_input() {
            self.controller.handle(code, &mut self.state);
        }

        if self.state.exit_requested() {
            self.shutdown();
            return LoopPhase::Exited;
        }

        self.phase = LoopPhase::Acquiring;
        self.phase
    }

    /// Loop until exit is requested.
    pub fn run(&mut self) -> LoopStats {
        self.run_for(None)
    }

    /// Loop until exit is requested or `max_iterations` have run. The
    /// display is released either way.
    pub fn run_for(&mut self, max_iterations: Option<u64>) -> LoopStats {
        let mut iterations = 0u64;
        while self.phase != LoopPhase::Exited {
            if max_iterations.is_some_and(|max| iterations >= max) {
                self.stop();
                break;
            }
            self.step();
            iterations += 1;
        }
        self.stats()
    }

    /// Request exit and release the display.
    pub fn stop(&mut self) {
        self.state.request_exit();
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.released {
            self.display.release();
            self.released = true;
            let stats = self.stats();
            info!(
                frames_acquired = stats.frames_acquired,
                frames_rendered = stats.frames_rendered,
                frames_presented = stats.frames_presented,
                transient_faults = stats.transient_faults,
                retry_storms = stats.retry_storms,
                degraded = stats.degraded,
                "Viewer stopped"
            );
        }
        self.phase = LoopPhase::Exited;
    }
}
