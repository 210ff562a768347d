//! Area-coverage resampling.
//!
//! Each output pixel is the average of the source pixels its footprint
//! covers, weighted by overlap. When magnifying, most output pixels fall
//! inside a single source pixel and copy it, and only pixels that straddle a
//! source boundary are blended. The image crate has no equivalent filter.

use image::{Rgb, RgbImage};

/// Source indices and overlap weights for one output pixel along one axis.
#[derive(Debug, Clone)]
struct Coverage {
    start: usize,
    weights: Vec<f32>,
}

fn coverage(src_len: u32, dst_len: u32) -> Vec<Coverage> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|o| {
            let lo = o as f64 * scale;
            let hi = ((o + 1) as f64 * scale).min(src_len as f64);
            let first = lo.floor() as usize;
            let last = (hi.ceil() as usize).clamp(first + 1, src_len as usize);

            let mut weights = Vec::with_capacity(last - first);
            for i in first..last {
                let overlap = (hi.min((i + 1) as f64) - lo.max(i as f64)).max(0.0);
                weights.push(overlap as f32);
            }

            let total: f32 = weights.iter().sum();
            if total > 0.0 {
                for w in weights.iter_mut() {
                    *w /= total;
                }
            } else if let Some(w) = weights.first_mut() {
                *w = 1.0;
            }

            Coverage {
                start: first,
                weights,
            }
        })
        .collect()
}

/// Resize an RGB image with area-coverage averaging.
pub fn resize_area(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
        return RgbImage::new(width, height);
    }
    if (src_w, src_h) == (width, height) {
        return src.clone();
    }

    let cols = coverage(src_w, width);
    let rows = coverage(src_h, height);

    // Horizontal pass into a float buffer of src_h rows.
    let mut horizontal = vec![[0.0f32; 3]; width as usize * src_h as usize];
    for y in 0..src_h {
        for (x, cov) in cols.iter().enumerate() {
            let mut acc = [0.0f32; 3];
            for (k, &w) in cov.weights.iter().enumerate() {
                let px = src.get_pixel((cov.start + k) as u32, y);
                for c in 0..3 {
                    acc[c] += w * px[c] as f32;
                }
            }
            horizontal[y as usize * width as usize + x] = acc;
        }
    }

    let mut out = RgbImage::new(width, height);
    for (y, cov) in rows.iter().enumerate() {
        for x in 0..width as usize {
            let mut acc = [0.0f32; 3];
            for (k, &w) in cov.weights.iter().enumerate() {
                let px = horizontal[(cov.start + k) * width as usize + x];
                for c in 0..3 {
                    acc[c] += w * px[c];
                }
            }
            out.put_pixel(
                x as u32,
                y as u32,
                Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8)),
            );
        }
    }

    out
}
