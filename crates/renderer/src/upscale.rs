//! Upscaling strategies from the 32x24 sensor grid to display resolution.
//!
//! Direct strategies colorize the sensor-sized grid first and resize the RGB
//! image. Spline strategies magnify the intensity grid first and colorize
//! the magnified grid, then resize the rest of the way with a bicubic filter.

use crate::area::resize_area;
use crate::palette::Palette;
use crate::spline::spline_zoom;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::fmt;
use std::str::FromStr;
use thermal_common::{IntensityGrid, ThermalError};

/// Zoom factor of the pure spline strategy.
pub const SPLINE_ZOOM: f32 = 25.0;
/// Zoom factor of the spline pass in the hybrid strategy.
pub const HYBRID_ZOOM: f32 = 10.0;

/// Selectable upscaling strategy, in cycling order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Area,
    Bicubic,
    Lanczos,
    Spline,
    #[default]
    Hybrid,
}

/// Resampling filter applied to an already colorized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    Area,
    Bicubic,
    Lanczos,
}

/// Ordering of the colorize and resize stages for one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpscalePlan {
    /// Colorize the sensor grid, then resize the RGB image.
    ColorizeThenResize(ResizeFilter),
    /// Spline-magnify the intensity grid by `zoom`, colorize, then resize
    /// the remainder bicubically.
    MagnifyThenColorize { zoom: f32 },
}

impl Interpolation {
    pub const ALL: [Interpolation; 7] = [
        Interpolation::Nearest,
        Interpolation::Bilinear,
        Interpolation::Area,
        Interpolation::Bicubic,
        Interpolation::Lanczos,
        Interpolation::Spline,
        Interpolation::Hybrid,
    ];

    /// Position in the cycling order.
    pub fn index(self) -> usize {
        match self {
            Interpolation::Nearest => 0,
            Interpolation::Bilinear => 1,
            Interpolation::Area => 2,
            Interpolation::Bicubic => 3,
            Interpolation::Lanczos => 4,
            Interpolation::Spline => 5,
            Interpolation::Hybrid => 6,
        }
    }

    /// Strategy at `index`, wrapping past the end.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }

    /// Label shown in the overlay.
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Nearest => "Nearest",
            Interpolation::Bilinear => "Bilinear",
            Interpolation::Area => "Area",
            Interpolation::Bicubic => "Bicubic",
            Interpolation::Lanczos => "Lanczos",
            Interpolation::Spline => "Spline x25",
            Interpolation::Hybrid => "Spline x10 + Bicubic",
        }
    }

    /// Short lowercase identifier used in configuration.
    pub fn key(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Area => "area",
            Interpolation::Bicubic => "bicubic",
            Interpolation::Lanczos => "lanczos",
            Interpolation::Spline => "spline",
            Interpolation::Hybrid => "hybrid",
        }
    }

    pub fn plan(self) -> UpscalePlan {
        match self {
            Interpolation::Nearest => UpscalePlan::ColorizeThenResize(ResizeFilter::Nearest),
            Interpolation::Bilinear => UpscalePlan::ColorizeThenResize(ResizeFilter::Bilinear),
            Interpolation::Area => UpscalePlan::ColorizeThenResize(ResizeFilter::Area),
            Interpolation::Bicubic => UpscalePlan::ColorizeThenResize(ResizeFilter::Bicubic),
            Interpolation::Lanczos => UpscalePlan::ColorizeThenResize(ResizeFilter::Lanczos),
            Interpolation::Spline => UpscalePlan::MagnifyThenColorize { zoom: SPLINE_ZOOM },
            Interpolation::Hybrid => UpscalePlan::MagnifyThenColorize { zoom: HYBRID_ZOOM },
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = ThermalError;

    /// Accepts the configuration key (case-insensitive) or a numeric index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            if index < Self::ALL.len() {
                return Ok(Self::ALL[index]);
            }
            return Err(ThermalError::UnknownInterpolation(s.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.key() == lower)
            .ok_or_else(|| ThermalError::UnknownInterpolation(s.to_string()))
    }
}

impl ResizeFilter {
    /// Resize a colorized image to `width` x `height`.
    pub fn resize(self, src: &RgbImage, width: u32, height: u32) -> RgbImage {
        let filter = match self {
            ResizeFilter::Area => return resize_area(src, width, height),
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Lanczos => FilterType::Lanczos3,
        };
        imageops::resize(src, width, height, filter)
    }
}

/// Turn a normalized grid into a colorized image of `width` x `height`.
pub fn upscale(
    intensity: &IntensityGrid,
    palette: &Palette,
    interpolation: Interpolation,
    width: u32,
    height: u32,
) -> RgbImage {
    let src_w = intensity.width();
    let src_h = intensity.height();

    match interpolation.plan() {
        UpscalePlan::ColorizeThenResize(filter) => {
            let small = palette.colorize(intensity.as_slice(), src_w as u32, src_h as u32);
            filter.resize(&small, width, height)
        }
        UpscalePlan::MagnifyThenColorize { zoom } => {
            let zoomed = spline_zoom(intensity.as_slice(), src_w, src_h, zoom);
            let colored = palette.colorize(&zoomed.data, zoomed.width, zoomed.height);
            if colored.dimensions() == (width, height) {
                colored
            } else {
                ResizeFilter::Bicubic.resize(&colored, width, height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut i = Interpolation::Nearest;
        for _ in 0..Interpolation::ALL.len() {
            i = i.next();
        }
        assert_eq!(i, Interpolation::Nearest);

        assert_eq!(Interpolation::Nearest.prev(), Interpolation::Hybrid);
        assert_eq!(Interpolation::Hybrid.next(), Interpolation::Nearest);
    }

    #[test]
    fn test_index_round_trips() {
        for (idx, interp) in Interpolation::ALL.iter().enumerate() {
            assert_eq!(interp.index(), idx);
            assert_eq!(Interpolation::from_index(idx), *interp);
        }
        assert_eq!(Interpolation::from_index(7), Interpolation::Nearest);
    }

    #[test]
    fn test_default_is_hybrid() {
        assert_eq!(Interpolation::default(), Interpolation::Hybrid);
        assert_eq!(Interpolation::default().index(), 6);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("hybrid".parse::<Interpolation>().unwrap(), Interpolation::Hybrid);
        assert_eq!("Lanczos".parse::<Interpolation>().unwrap(), Interpolation::Lanczos);
        assert_eq!("5".parse::<Interpolation>().unwrap(), Interpolation::Spline);
        assert!(matches!(
            "cubic-ish".parse::<Interpolation>(),
            Err(ThermalError::UnknownInterpolation(_))
        ));
        assert!("7".parse::<Interpolation>().is_err());
    }

    #[test]
    fn test_plans() {
        assert_eq!(
            Interpolation::Area.plan(),
            UpscalePlan::ColorizeThenResize(ResizeFilter::Area)
        );
        assert_eq!(
            Interpolation::Hybrid.plan(),
            UpscalePlan::MagnifyThenColorize { zoom: 10.0 }
        );
    }

    #[test]
    fn test_every_strategy_hits_target_size() {
        let palette = Palette::by_name("jet").unwrap();
        let grid = IntensityGrid::filled(100);
        for interp in Interpolation::ALL {
            let img = upscale(&grid, &palette, interp, 160, 120);
            assert_eq!(img.dimensions(), (160, 120), "{}", interp);
        }
    }

    #[test]
    fn test_uniform_grid_stays_uniform() {
        let palette = Palette::by_name("gray").unwrap();
        let grid = IntensityGrid::filled(90);
        for interp in [Interpolation::Nearest, Interpolation::Area, Interpolation::Hybrid] {
            let img = upscale(&grid, &palette, interp, 64, 48);
            assert!(img.pixels().all(|p| p.0 == [90, 90, 90]), "{}", interp);
        }
    }
}
