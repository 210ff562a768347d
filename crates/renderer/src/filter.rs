//! Edge-preserving smoothing of rendered frames.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::bilateral_filter;
use serde::{Deserialize, Serialize};

/// Bilateral filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilateralParams {
    /// Diameter of the pixel neighborhood.
    pub window_size: u32,
    pub sigma_color: f32,
    pub sigma_spatial: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            window_size: 15,
            sigma_color: 80.0,
            sigma_spatial: 80.0,
        }
    }
}

/// Smooth `image` while keeping strong edges, one channel at a time.
pub fn smooth(image: &RgbImage, params: &BilateralParams) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || params.window_size == 0 {
        return image.clone();
    }

    let channels: Vec<GrayImage> = (0..3)
        .map(|c| {
            let plane = GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[c]]));
            bilateral_filter(
                &plane,
                params.window_size,
                params.sigma_color,
                params.sigma_spatial,
            )
        })
        .collect();

    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            channels[0].get_pixel(x, y)[0],
            channels[1].get_pixel(x, y)[0],
            channels[2].get_pixel(x, y)[0],
        ])
    })
}
