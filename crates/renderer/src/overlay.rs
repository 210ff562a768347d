//! Status line burned into the top-left corner of a rendered frame.
//!
//! Glyphs come from a TrueType font when one is configured and loads.
//! Otherwise a built-in monospace bitmap font is used, so the overlay always
//! has something to draw with.

use crate::upscale::Interpolation;
use embedded_graphics::{
    mono_font::{ascii::FONT_7X13, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use std::path::Path;
use std::time::Instant;
use thermal_common::FrameBounds;

/// Default top-left corner of the text box.
pub const DEFAULT_ANCHOR: (i32, i32) = (30, 18);

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Everything the status line reports about one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInfo<'a> {
    pub bounds: FrameBounds,
    pub fps: f32,
    pub interpolation: Interpolation,
    pub palette: &'a str,
    pub filtered: bool,
    pub degraded: bool,
}

/// Format the status line, e.g.
/// `Tmin=+15.0C - Tmax=+35.0C - FPS=4.0 - Interpolation: Nearest - Colormap: jet - Filtered: false`.
pub fn format_overlay_text(info: &OverlayInfo<'_>) -> String {
    let mut text = format!(
        "Tmin={:+.1}C - Tmax={:+.1}C - FPS={:.1} - Interpolation: {} - Colormap: {} - Filtered: {}",
        info.bounds.min,
        info.bounds.max,
        info.fps,
        info.interpolation.name(),
        info.palette,
        info.filtered,
    );
    if info.degraded {
        text.push_str(" - SENSOR DEGRADED");
    }
    text
}

/// Frame rate measured between consecutive overlay draws.
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    last: Instant,
}

impl FpsCounter {
    pub fn new(start: Instant) -> Self {
        Self { last: start }
    }

    /// Rate since the previous tick. Advances the timestamp.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        if elapsed > 0.0 {
            1.0 / elapsed
        } else {
            0.0
        }
    }

    pub fn last(&self) -> Instant {
        self.last
    }
}

enum Glyphs {
    TrueType { font: Font<'static>, scale: Scale },
    Builtin,
}

/// Draws the status line onto frames.
pub struct OverlayRenderer {
    anchor: (i32, i32),
    glyphs: Glyphs,
}

impl std::fmt::Debug for OverlayRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRenderer")
            .field("anchor", &self.anchor)
            .field("truetype", &self.uses_truetype())
            .finish()
    }
}

impl OverlayRenderer {
    /// Renderer using the built-in bitmap font.
    pub fn builtin(anchor: (i32, i32)) -> Self {
        Self {
            anchor,
            glyphs: Glyphs::Builtin,
        }
    }

    /// Renderer using the TrueType font at `font_path`, falling back to the
    /// built-in font when the file is missing or unparsable.
    pub fn new(anchor: (i32, i32), font_path: Option<&Path>, font_size: f32) -> Self {
        let Some(path) = font_path else {
            return Self::builtin(anchor);
        };

        let font = match std::fs::read(path) {
            Ok(bytes) => Font::try_from_vec(bytes),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read overlay font, using built-in font");
                return Self::builtin(anchor);
            }
        };

        match font {
            Some(font) => {
                tracing::debug!(path = %path.display(), size = font_size, "Loaded overlay font");
                Self {
                    anchor,
                    glyphs: Glyphs::TrueType {
                        font,
                        scale: Scale::uniform(font_size),
                    },
                }
            }
            None => {
                tracing::warn!(path = %path.display(), "Overlay font is not a valid TrueType font, using built-in font");
                Self::builtin(anchor)
            }
        }
    }

    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    pub fn uses_truetype(&self) -> bool {
        matches!(self.glyphs, Glyphs::TrueType { .. })
    }

    /// Burn the status line for `info` into `canvas`. Returns the text drawn.
    pub fn draw(&self, canvas: &mut RgbImage, info: &OverlayInfo<'_>) -> String {
        let text = format_overlay_text(info);
        let (x, y) = self.anchor;

        match &self.glyphs {
            Glyphs::TrueType { font, scale } => {
                draw_text_mut(canvas, TEXT_COLOR, x, y, *scale, font, &text);
            }
            Glyphs::Builtin => {
                let style = MonoTextStyle::new(&FONT_7X13, Rgb888::WHITE);
                let mut target = ImageTarget(canvas);
                // Drawing into an RgbImage cannot fail.
                let _ = Text::with_baseline(&text, Point::new(x, y), style, Baseline::Top)
                    .draw(&mut target);
            }
        }

        text
    }
}

/// `DrawTarget` adapter so embedded-graphics can draw into an `RgbImage`.
struct ImageTarget<'a>(&'a mut RgbImage);

impl OriginDimensions for ImageTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for ImageTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.0.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < width && y < height {
                self.0.put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}
