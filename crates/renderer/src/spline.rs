//! Cubic B-spline magnification of intensity grids.
//!
//! Interpolating spline: samples are first converted to B-spline
//! coefficients with a recursive prefilter, then the coefficients are
//! evaluated on the magnified lattice. Both passes are separable and use a
//! mirror boundary (sample `-1` reflects to sample `1`), so the result passes
//! exactly through the original samples at the lattice corners.

/// Pole of the cubic B-spline prefilter (sqrt(3) - 2).
const POLE: f32 = -0.267_949_2;

/// A magnified intensity buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomedGrid {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Output length for a zoom factor, never less than one sample.
pub fn zoomed_len(len: usize, zoom: f32) -> usize {
    ((len as f32 * zoom).round() as usize).max(1)
}

/// Magnify `values` (row-major `width` x `height`) by `zoom` on both axes.
///
/// Output coordinates map onto the input with
/// `x_in = x_out * (width - 1) / (out_width - 1)`, so the first and last
/// output samples coincide with the first and last input samples.
pub fn spline_zoom(values: &[u8], width: usize, height: usize, zoom: f32) -> ZoomedGrid {
    let out_w = zoomed_len(width, zoom);
    let out_h = zoomed_len(height, zoom);

    if width == 0 || height == 0 || values.len() < width * height {
        return ZoomedGrid {
            data: vec![0; out_w * out_h],
            width: out_w as u32,
            height: out_h as u32,
        };
    }

    // Coefficients: prefilter rows, then columns.
    let mut coeffs: Vec<f32> = values[..width * height].iter().map(|&v| v as f32).collect();
    for row in coeffs.chunks_exact_mut(width) {
        prefilter(row);
    }
    let mut column = vec![0.0f32; height];
    for x in 0..width {
        for y in 0..height {
            column[y] = coeffs[y * width + x];
        }
        prefilter(&mut column);
        for y in 0..height {
            coeffs[y * width + x] = column[y];
        }
    }

    let taps_x = sample_taps(width, out_w);
    let taps_y = sample_taps(height, out_h);

    // Evaluate along x for every coefficient row.
    let mut horizontal = vec![0.0f32; height * out_w];
    for y in 0..height {
        let row = &coeffs[y * width..(y + 1) * width];
        let out = &mut horizontal[y * out_w..(y + 1) * out_w];
        for (dst, tap) in out.iter_mut().zip(&taps_x) {
            *dst = tap.apply(|i| row[i]);
        }
    }

    // Then along y.
    let mut data = vec![0u8; out_w * out_h];
    for (oy, tap) in taps_y.iter().enumerate() {
        let out_row = &mut data[oy * out_w..(oy + 1) * out_w];
        for (ox, dst) in out_row.iter_mut().enumerate() {
            let v = tap.apply(|i| horizontal[i * out_w + ox]);
            *dst = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    ZoomedGrid {
        data,
        width: out_w as u32,
        height: out_h as u32,
    }
}

/// Four source indices and cubic B-spline weights for one output sample.
#[derive(Debug, Clone, Copy)]
struct Tap {
    index: [usize; 4],
    weight: [f32; 4],
}

impl Tap {
    #[inline]
    fn apply<F: Fn(usize) -> f32>(&self, sample: F) -> f32 {
        let mut acc = 0.0;
        for k in 0..4 {
            acc += self.weight[k] * sample(self.index[k]);
        }
        acc
    }
}

fn sample_taps(in_len: usize, out_len: usize) -> Vec<Tap> {
    let scale = if out_len > 1 {
        (in_len - 1) as f32 / (out_len - 1) as f32
    } else {
        0.0
    };

    (0..out_len)
        .map(|o| {
            let x = o as f32 * scale;
            let base = x.floor();
            let t = x - base;
            let base = base as i64;

            let mut index = [0usize; 4];
            for (k, slot) in index.iter_mut().enumerate() {
                *slot = mirror(base + k as i64 - 1, in_len);
            }
            Tap {
                index,
                weight: bspline_weights(t),
            }
        })
        .collect()
}

/// Cubic B-spline basis weights for the four samples around fractional
/// offset `t` in `[0, 1)`.
#[inline]
fn bspline_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let one_minus = 1.0 - t;
    [
        one_minus * one_minus * one_minus / 6.0,
        (4.0 - 6.0 * t2 + 3.0 * t3) / 6.0,
        (1.0 + 3.0 * t + 3.0 * t2 - 3.0 * t3) / 6.0,
        t3 / 6.0,
    ]
}

/// Reflect an index into `0..len` without repeating the edge sample.
fn mirror(i: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let mut i = i.rem_euclid(period);
    if i >= len as i64 {
        i = period - i;
    }
    i as usize
}

/// In-place conversion of samples to cubic B-spline coefficients.
fn prefilter(c: &mut [f32]) {
    let n = c.len();
    if n < 2 {
        return;
    }

    let z = POLE;
    let gain = (1.0 - z) * (1.0 - 1.0 / z);
    for v in c.iter_mut() {
        *v *= gain;
    }

    c[0] = causal_init(c, z);
    for k in 1..n {
        c[k] += z * c[k - 1];
    }

    c[n - 1] = (z / (z * z - 1.0)) * (z * c[n - 2] + c[n - 1]);
    for k in (0..n - 1).rev() {
        c[k] = z * (c[k + 1] - c[k]);
    }
}

/// Exact mirror-boundary initial value of the causal filter.
fn causal_init(c: &[f32], z: f32) -> f32 {
    let n = c.len();
    let iz = 1.0 / z;
    let mut zn = z;
    let mut z2n = z.powi(n as i32 - 1);
    let mut sum = c[0] + z2n * c[n - 1];
    z2n = z2n * z2n * iz;

    for &v in &c[1..n - 1] {
        sum += (zn + z2n) * v;
        zn *= z;
        z2n *= iz;
    }

    sum / (1.0 - zn * zn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_mirror() {
        assert_eq!(mirror(-1, 4), 1);
        assert_eq!(mirror(0, 4), 0);
        assert_eq!(mirror(3, 4), 3);
        assert_eq!(mirror(4, 4), 2);
        assert_eq!(mirror(5, 4), 1);
        assert_eq!(mirror(7, 1), 0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for t in [0.0f32, 0.25, 0.5, 0.9] {
            let sum: f32 = bspline_weights(t).iter().sum();
            assert_approx_eq!(sum, 1.0, 1e-5);
        }
    }

    #[test]
    fn test_prefilter_then_evaluate_reproduces_samples() {
        let samples = [10.0f32, 40.0, 200.0, 90.0, 0.0, 255.0];
        let mut coeffs = samples;
        prefilter(&mut coeffs);

        // At integer positions the spline is (c[k-1] + 4 c[k] + c[k+1]) / 6.
        for k in 0..samples.len() {
            let l = coeffs[mirror(k as i64 - 1, samples.len())];
            let r = coeffs[mirror(k as i64 + 1, samples.len())];
            let v = (l + 4.0 * coeffs[k] + r) / 6.0;
            assert_approx_eq!(v, samples[k], 0.01);
        }
    }

    #[test]
    fn test_zoom_dimensions() {
        let values = vec![0u8; 32 * 24];
        let out = spline_zoom(&values, 32, 24, 25.0);
        assert_eq!((out.width, out.height), (800, 600));
        assert_eq!(out.data.len(), 800 * 600);

        let out = spline_zoom(&values, 32, 24, 10.0);
        assert_eq!((out.width, out.height), (320, 240));
    }

    #[test]
    fn test_zoom_preserves_constant_field() {
        let values = vec![77u8; 8 * 6];
        let out = spline_zoom(&values, 8, 6, 4.0);
        assert!(out.data.iter().all(|&v| v == 77));
    }

    #[test]
    fn test_zoom_passes_through_corners() {
        let mut values = vec![0u8; 4 * 3];
        values[0] = 200;
        values[11] = 50;
        let out = spline_zoom(&values, 4, 3, 5.0);
        assert_eq!(out.data[0], 200);
        assert_eq!(*out.data.last().unwrap(), 50);
    }

    #[test]
    fn test_zoom_of_ramp_is_monotonic() {
        let mut values = Vec::new();
        for _ in 0..3 {
            values.extend((0..8).map(|x| (x * 30) as u8));
        }
        let out = spline_zoom(&values, 8, 3, 3.0);
        let row = &out.data[..out.width as usize];
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(row[0], 0);
        assert_eq!(*row.last().unwrap(), 210);
    }
}
