//! Temperature to 8-bit intensity normalization.

use thermal_common::{FrameBounds, IntensityGrid, RawGrid};

/// Map a raw frame onto 0..=255 using that frame's own bounds.
///
/// Non-finite samples are treated as 0 °C before scaling. A degenerate span
/// (uniform field, or non-finite bounds) yields an all-zero grid.
pub fn normalize(raw: &RawGrid, bounds: FrameBounds) -> IntensityGrid {
    if bounds.is_degenerate() {
        return IntensityGrid::filled(0);
    }

    let scale = 255.0 / bounds.span();
    let data = raw
        .sanitized()
        .as_slice()
        .iter()
        .map(|&f| ((f - bounds.min) * scale).round().clamp(0.0, 255.0) as u8)
        .collect();

    // Length is preserved from a valid RawGrid, so this cannot fail.
    IntensityGrid::from_vec(data).unwrap_or_else(|_| IntensityGrid::filled(0))
}
