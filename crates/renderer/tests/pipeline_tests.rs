//! End-to-end tests for the frame pipeline.
//!
//! Covers:
//! - Normalization of realistic frames
//! - Every upscaling strategy at display resolution
//! - Overlay text contents

use image::RgbImage;
use renderer::{
    available_palettes, format_overlay_text, normalize, BilateralParams, FrameRenderer,
    Interpolation, OverlayInfo, OverlayRenderer, Palette, RenderParams,
};
use test_utils::{hot_spot_grid, ramp_grid, uniform_grid, with_glitches};

// ============================================================================
// Helper functions
// ============================================================================

fn renderer(width: u32, height: u32) -> FrameRenderer {
    FrameRenderer::new(&["jet", "gray", "tab10"], width, height, BilateralParams::default())
        .unwrap()
}

fn params(interpolation: Interpolation) -> RenderParams {
    RenderParams {
        palette_index: 0,
        interpolation,
        filter_enabled: false,
    }
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_ramp_normalizes_from_zero_to_full_scale() {
    let raw = ramp_grid(15.0, 35.0);
    let bounds = raw.bounds();
    assert_eq!((bounds.min, bounds.max), (15.0, 35.0));

    let intensity = normalize(&raw, bounds);
    let values = intensity.as_slice();
    assert_eq!(values[0], 0);
    assert_eq!(values[values.len() - 1], 255);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_uniform_frame_normalizes_without_fault() {
    let raw = uniform_grid(20.0);
    let intensity = normalize(&raw, raw.bounds());
    assert!(intensity.as_slice().iter().all(|&v| v == intensity.as_slice()[0]));
}

#[test]
fn test_glitched_frame_bounds_ignore_nan() {
    let raw = with_glitches(&hot_spot_grid(20.0, 30.0, 16.0, 12.0, 4.0), &[0, 1, 2]);
    let bounds = raw.bounds();
    assert_eq!(bounds.min, 20.0);
    assert_eq!(bounds.max, 30.0);

    // NaN reads as 0 °C, below the frame minimum, so it clamps to zero.
    let intensity = normalize(&raw, bounds);
    assert_eq!(intensity.as_slice()[0], 0);
}

// ============================================================================
// Upscaling
// ============================================================================

#[test]
fn test_every_strategy_renders_display_resolution() {
    let r = renderer(320, 240);
    let raw = ramp_grid(15.0, 35.0);
    for interp in Interpolation::ALL {
        let img = r.render(&raw, raw.bounds(), &params(interp));
        assert_eq!(img.dimensions(), (320, 240), "{}", interp);
    }
}

#[test]
fn test_nearest_ramp_keeps_palette_endpoints() {
    let r = renderer(320, 240);
    let raw = ramp_grid(15.0, 35.0);
    let img = r.render(&raw, raw.bounds(), &params(Interpolation::Nearest));

    let jet = Palette::by_name("jet").unwrap();
    assert_eq!(*img.get_pixel(0, 0), jet.map(0));
    assert_eq!(*img.get_pixel(319, 239), jet.map(255));
}

#[test]
fn test_spline_strategies_differ_from_nearest() {
    let r = renderer(320, 240);
    let raw = hot_spot_grid(21.0, 35.0, 16.0, 12.0, 5.0);
    let nearest = r.render(&raw, raw.bounds(), &params(Interpolation::Nearest));
    let hybrid = r.render(&raw, raw.bounds(), &params(Interpolation::Hybrid));
    assert_ne!(nearest, hybrid);
}

#[test]
fn test_filter_preserves_size_and_changes_noisy_frame() {
    let r = renderer(160, 120);
    let raw = test_utils::noisy_grid(22.0, 2.0, 11);
    let plain = r.render(&raw, raw.bounds(), &params(Interpolation::Nearest));
    let filtered = r.render(
        &raw,
        raw.bounds(),
        &RenderParams {
            filter_enabled: true,
            ..params(Interpolation::Nearest)
        },
    );
    assert_eq!(filtered.dimensions(), plain.dimensions());
    assert_ne!(filtered, plain);
}

#[test]
fn test_all_registered_palettes_render() {
    let names = available_palettes();
    let r = FrameRenderer::new(&names, 64, 48, BilateralParams::default()).unwrap();
    let raw = ramp_grid(0.0, 1.0);
    for i in 0..r.palette_count() {
        let p = RenderParams {
            palette_index: i,
            ..params(Interpolation::Bilinear)
        };
        assert_eq!(r.render(&raw, raw.bounds(), &p).dimensions(), (64, 48));
    }
}

// ============================================================================
// Overlay
// ============================================================================

#[test]
fn test_overlay_reports_ramp_bounds() {
    let raw = ramp_grid(15.0, 35.0);
    let info = OverlayInfo {
        bounds: raw.bounds(),
        fps: 4.0,
        interpolation: Interpolation::Nearest,
        palette: "jet",
        filtered: false,
        degraded: false,
    };

    let mut canvas = RgbImage::new(800, 60);
    let text = OverlayRenderer::builtin((30, 18)).draw(&mut canvas, &info);
    assert_eq!(text, format_overlay_text(&info));
    assert!(text.contains("Tmin=+15.0C"));
    assert!(text.contains("Tmax=+35.0C"));
    assert!(text.contains("Colormap: jet"));
}
