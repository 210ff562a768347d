//! Named color palettes for false-color rendering.
//!
//! Palettes follow the matplotlib colormap of the same name. Each definition
//! is plain data (color stops, per-channel segments, a listed table, or a
//! channel formula) and is compiled once into a 256-entry lookup table, so
//! colorizing a pixel is a single index operation.
//!
//! A name ending in `_r` selects the reversed table of the base palette.

use image::{Rgb, RgbImage};
use std::f32::consts::PI;
use thermal_common::{ThermalError, ThermalResult};

/// Number of entries in a compiled palette.
pub const PALETTE_SIZE: usize = 256;

/// Piecewise-linear channel definition: `(position, value)` pairs in `[0, 1]`.
type Segment = &'static [(f32, f32)];

/// How a palette is described before compilation.
enum PaletteDef {
    /// Independent red, green and blue segments.
    Segments {
        red: Segment,
        green: Segment,
        blue: Segment,
    },
    /// Evenly spaced hex color stops, linearly blended.
    Stops(&'static [u32]),
    /// Discrete qualitative colors, no blending.
    Listed(&'static [u32]),
    /// Channel values computed from the position.
    Formula(fn(f32) -> [f32; 3]),
}

// ============================================================================
// Palette definitions
// ============================================================================

const JET: PaletteDef = PaletteDef::Segments {
    red: &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    green: &[
        (0.0, 0.0),
        (0.125, 0.0),
        (0.375, 1.0),
        (0.64, 1.0),
        (0.91, 0.0),
        (1.0, 0.0),
    ],
    blue: &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
};

const HOT: PaletteDef = PaletteDef::Segments {
    red: &[(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)],
    green: &[(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)],
    blue: &[(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)],
};

const GIST_NCAR: PaletteDef = PaletteDef::Segments {
    red: &[
        (0.0, 0.0),
        (0.3098, 0.0),
        (0.3725, 0.3993),
        (0.4235, 0.5003),
        (0.5333, 1.0),
        (0.7922, 1.0),
        (0.8471, 0.6218),
        (0.8980, 0.9235),
        (1.0, 0.9961),
    ],
    green: &[
        (0.0, 0.0),
        (0.0510, 0.3722),
        (0.1059, 0.0),
        (0.1569, 0.7202),
        (0.1608, 0.7537),
        (0.1647, 0.7752),
        (0.2157, 1.0),
        (0.2588, 0.9804),
        (0.2706, 0.9804),
        (0.3176, 1.0),
        (0.3686, 0.8081),
        (0.4275, 1.0),
        (0.5216, 1.0),
        (0.6314, 0.7292),
        (0.6863, 0.2796),
        (0.7451, 0.0),
        (0.7922, 0.0),
        (0.8431, 0.1753),
        (0.8980, 0.5),
        (1.0, 0.9725),
    ],
    blue: &[
        (0.0, 0.5020),
        (0.0510, 0.0222),
        (0.1098, 1.0),
        (0.2039, 1.0),
        (0.2627, 0.6145),
        (0.3216, 0.0),
        (0.4157, 0.0),
        (0.4745, 0.2342),
        (0.5333, 0.0),
        (0.5804, 0.0),
        (0.6314, 0.0549),
        (0.6902, 0.0),
        (0.7373, 0.0),
        (0.7922, 0.9738),
        (0.8000, 1.0),
        (0.8431, 1.0),
        (0.8980, 0.9341),
        (1.0, 0.9961),
    ],
};

const BWR: PaletteDef = PaletteDef::Stops(&[0x0000FF, 0xFFFFFF, 0xFF0000]);

const SEISMIC: PaletteDef =
    PaletteDef::Stops(&[0x00004C, 0x0000FF, 0xFFFFFF, 0xFF0000, 0x800000]);

const BRG: PaletteDef = PaletteDef::Stops(&[0x0000FF, 0xFF0000, 0x00FF00]);

const COOLWARM: PaletteDef =
    PaletteDef::Stops(&[0x3B4CC0, 0x8DB0FE, 0xDDDDDD, 0xF49A7B, 0xB40426]);

const PIYG: PaletteDef = PaletteDef::Stops(&[
    0x8E0152, 0xC51B7D, 0xDE77AE, 0xF1B6DA, 0xFDE0EF, 0xF7F7F7, 0xE6F5D0, 0xB8E186, 0x7FBC41,
    0x4D9221, 0x276419,
]);

const INFERNO: PaletteDef = PaletteDef::Stops(&[
    0x000004, 0x1F0C48, 0x550F6D, 0x88226A, 0xBA3655, 0xE35933, 0xF98E09, 0xF8C932, 0xFCFFA4,
]);

const GRAY: PaletteDef = PaletteDef::Stops(&[0x000000, 0xFFFFFF]);

const SET1: PaletteDef = PaletteDef::Listed(&[
    0xE41A1C, 0x377EB8, 0x4DAF4A, 0x984EA3, 0xFF7F00, 0xFFFF33, 0xA65628, 0xF781BF, 0x999999,
]);

const TAB10: PaletteDef = PaletteDef::Listed(&[
    0x1F77B4, 0xFF7F0E, 0x2CA02C, 0xD62728, 0x9467BD, 0x8C564B, 0xE377C2, 0x7F7F7F, 0xBCBD22,
    0x17BECF,
]);

const TAB20: PaletteDef = PaletteDef::Listed(&[
    0x1F77B4, 0xAEC7E8, 0xFF7F0E, 0xFFBB78, 0x2CA02C, 0x98DF8A, 0xD62728, 0xFF9896, 0x9467BD,
    0xC5B0D5, 0x8C564B, 0xC49C94, 0xE377C2, 0xF7B6D2, 0x7F7F7F, 0xC7C7C7, 0xBCBD22, 0xDBDB8D,
    0x17BECF, 0x9EDAE5,
]);

const TAB20B: PaletteDef = PaletteDef::Listed(&[
    0x393B79, 0x5254A3, 0x6B6ECF, 0x9C9EDE, 0x637939, 0x8CA252, 0xB5CF6B, 0xCEDB9C, 0x8C6D31,
    0xBD9E39, 0xE7BA52, 0xE7CB94, 0x843C39, 0xAD494A, 0xD6616B, 0xE7969C, 0x7B4173, 0xA55194,
    0xCE6DBD, 0xDE9ED6,
]);

const PRISM: PaletteDef = PaletteDef::Formula(prism);

const GNUPLOT2: PaletteDef = PaletteDef::Formula(gnuplot2);

fn prism(x: f32) -> [f32; 3] {
    let t = x * 20.9;
    [
        0.75 * ((t + 0.25) * PI).sin() + 0.67,
        0.75 * ((t - 0.25) * PI).sin() + 0.33,
        -1.1 * (t * PI).sin(),
    ]
}

fn gnuplot2(x: f32) -> [f32; 3] {
    let blue = if x < 0.25 {
        4.0 * x
    } else if x < 0.92 {
        -2.0 * x + 1.84
    } else {
        x / 0.08 - 11.5
    };
    [x / 0.32 - 0.78125, 2.0 * x - 0.84, blue]
}

/// Every base palette known to the registry, in display order.
const REGISTRY: &[(&str, PaletteDef)] = &[
    ("jet", JET),
    ("gist_ncar", GIST_NCAR),
    ("Set1", SET1),
    ("prism", PRISM),
    ("brg", BRG),
    ("bwr", BWR),
    ("seismic", SEISMIC),
    ("coolwarm", COOLWARM),
    ("PiYG", PIYG),
    ("tab10", TAB10),
    ("tab20", TAB20),
    ("tab20b", TAB20B),
    ("gnuplot2", GNUPLOT2),
    ("hot", HOT),
    ("inferno", INFERNO),
    ("gray", GRAY),
];

/// Names of every base palette. Each also accepts an `_r` suffix.
pub fn available_palettes() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

// ============================================================================
// Compiled palette
// ============================================================================

/// A compiled 256-entry palette.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    lut: Box<[[u8; 3]; PALETTE_SIZE]>,
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette").field("name", &self.name).finish()
    }
}

impl Palette {
    /// Look up and compile a palette by name (case-sensitive, `_r` allowed).
    pub fn by_name(name: &str) -> ThermalResult<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };

        let def = REGISTRY
            .iter()
            .find(|(n, _)| *n == base)
            .map(|(_, def)| def)
            .ok_or_else(|| ThermalError::UnknownPalette(name.to_string()))?;

        let mut lut = compile(def);
        if reversed {
            lut.reverse();
        }

        Ok(Self {
            name: name.to_string(),
            lut,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for one intensity value.
    #[inline]
    pub fn map(&self, intensity: u8) -> Rgb<u8> {
        Rgb(self.lut[intensity as usize])
    }

    /// Colorize a row-major intensity buffer into an RGB image.
    pub fn colorize(&self, values: &[u8], width: u32, height: u32) -> RgbImage {
        let mut pixels = Vec::with_capacity(values.len() * 3);
        for &v in values {
            pixels.extend_from_slice(&self.lut[v as usize]);
        }
        RgbImage::from_raw(width, height, pixels)
            .unwrap_or_else(|| RgbImage::new(width, height))
    }
}

fn compile(def: &PaletteDef) -> Box<[[u8; 3]; PALETTE_SIZE]> {
    let mut lut = Box::new([[0u8; 3]; PALETTE_SIZE]);

    for (i, entry) in lut.iter_mut().enumerate() {
        let x = i as f32 / (PALETTE_SIZE - 1) as f32;
        *entry = match def {
            PaletteDef::Segments { red, green, blue } => to_rgb8([
                sample_segment(red, x),
                sample_segment(green, x),
                sample_segment(blue, x),
            ]),
            PaletteDef::Stops(colors) => sample_stops(colors, x),
            PaletteDef::Listed(colors) => {
                let idx = ((x * colors.len() as f32) as usize).min(colors.len() - 1);
                hex_to_rgb(colors[idx])
            }
            PaletteDef::Formula(f) => to_rgb8(f(x)),
        };
    }

    lut
}

/// Linear interpolation inside a sorted segment table.
fn sample_segment(segment: &[(f32, f32)], x: f32) -> f32 {
    let Some(&(first_x, first_v)) = segment.first() else {
        return 0.0;
    };
    if x <= first_x {
        return first_v;
    }

    for pair in segment.windows(2) {
        let (x0, v0) = pair[0];
        let (x1, v1) = pair[1];
        if x <= x1 {
            let t = if (x1 - x0).abs() < f32::EPSILON {
                0.0
            } else {
                (x - x0) / (x1 - x0)
            };
            return v0 + (v1 - v0) * t;
        }
    }

    segment.last().map(|&(_, v)| v).unwrap_or(0.0)
}

fn sample_stops(colors: &[u32], x: f32) -> [u8; 3] {
    if colors.len() == 1 {
        return hex_to_rgb(colors[0]);
    }

    let pos = x * (colors.len() - 1) as f32;
    let low = (pos.floor() as usize).min(colors.len() - 2);
    let t = pos - low as f32;

    let a = hex_to_rgb(colors[low]);
    let b = hex_to_rgb(colors[low + 1]);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (a[c] as f32 * (1.0 - t) + b[c] as f32 * t).round() as u8;
    }
    out
}

/// Split a `0xRRGGBB` constant into channels.
pub fn hex_to_rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

fn to_rgb8(channels: [f32; 3]) -> [u8; 3] {
    channels.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
