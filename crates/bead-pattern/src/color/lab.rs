//! CIE L*a*b* conversion referenced to the D50 illuminant
//!
//! The transform chain is fixed so that palette and pixel coordinates are
//! reproducible across runs and implementations:
//!
//! ```text
//! 8-bit sRGB
//!     |  clamp and scale by 1/255
//!     v
//! sRGB 0.0..=1.0
//!     |  IEC 61966-2-1 decode
//!     v
//! linear RGB
//!     |  sRGB primaries (D65 white)
//!     v
//! XYZ (D65)
//!     |  Bradford chromatic adaptation D65 -> D50
//!     v
//! XYZ (D50)
//!     |  CIE 1976 L*a*b* with D50 reference white
//!     v
//! L*a*b*
//! ```
//!
//! The RGB -> XYZ and adaptation matrices are folded into a single matrix at
//! construction time.

use super::rgb::Rgb;

/// Row-major 3x3 matrix.
pub type Matrix3 = [[f64; 3]; 3];

/// CIE XYZ tristimulus values of a reference white (Y normalised to 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE standard illuminant D65 (2° observer), the sRGB white.
pub const D65: WhitePoint = WhitePoint {
    x: 0.95047,
    y: 1.0,
    z: 1.08883,
};

/// CIE standard illuminant D50 (2° observer), the L*a*b* reference white.
pub const D50: WhitePoint = WhitePoint {
    x: 0.96422,
    y: 1.0,
    z: 0.82521,
};

/// Linear sRGB to XYZ with the D65 white of the sRGB primaries.
const SRGB_TO_XYZ_D65: Matrix3 = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// Bradford cone response matrix.
const BRADFORD: Matrix3 = [
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
];

const BRADFORD_INV: Matrix3 = [
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
];

/// CIE constants for the L*a*b* companding function (exact rationals).
const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE L*a*b* space (D50 reference white).
///
/// # Components
///
/// - `l`: Lightness, 0.0 (black) to 100.0 (reference white)
/// - `a`: Green (negative) to red (positive)
/// - `b`: Blue (negative) to yellow (positive)
///
/// Only used for distance comparisons; never serialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Bit pattern of the three components.
    ///
    /// Two coordinates are the same key exactly when their bit patterns
    /// match, which is what palette de-duplication needs (f64 is not `Eq`).
    #[inline]
    pub fn to_bits(self) -> [u64; 3] {
        [self.l.to_bits(), self.a.to_bits(), self.b.to_bits()]
    }
}

#[inline]
fn apply(m: &Matrix3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Bradford chromatic adaptation matrix mapping XYZ under `source` white to
/// XYZ under `target` white.
pub fn bradford_adaptation(source: WhitePoint, target: WhitePoint) -> Matrix3 {
    let src = apply(&BRADFORD, [source.x, source.y, source.z]);
    let dst = apply(&BRADFORD, [target.x, target.y, target.z]);
    let scale = [
        [dst[0] / src[0], 0.0, 0.0],
        [0.0, dst[1] / src[1], 0.0],
        [0.0, 0.0, dst[2] / src[2]],
    ];
    multiply(&BRADFORD_INV, &multiply(&scale, &BRADFORD))
}

/// IEC 61966-2-1 sRGB decode.
#[inline]
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

/// Converts 8-bit sRGB colors to D50 L*a*b*.
///
/// Stateless apart from the precomputed matrix, so a single converter can be
/// shared by reference across worker threads.
#[derive(Debug, Clone)]
pub struct LabConverter {
    rgb_to_xyz: Matrix3,
    white: WhitePoint,
}

impl LabConverter {
    /// sRGB primaries, Bradford adaptation, D50 reference white.
    pub fn new() -> Self {
        let adapt = bradford_adaptation(D65, D50);
        Self {
            rgb_to_xyz: multiply(&adapt, &SRGB_TO_XYZ_D65),
            white: D50,
        }
    }

    /// The combined linear RGB -> XYZ(D50) matrix.
    pub fn rgb_to_xyz_matrix(&self) -> &Matrix3 {
        &self.rgb_to_xyz
    }

    /// XYZ tristimulus values (D50 adapted) of an 8-bit sRGB color.
    pub fn to_xyz(&self, rgb: Rgb) -> [f64; 3] {
        let linear = rgb
            .to_bytes()
            .map(|c| srgb_to_linear((f64::from(c) / 255.0).clamp(0.0, 1.0)));
        apply(&self.rgb_to_xyz, linear)
    }

    /// L*a*b* coordinate of an 8-bit sRGB color.
    pub fn to_lab(&self, rgb: Rgb) -> Lab {
        let [x, y, z] = self.to_xyz(rgb);
        let fx = lab_f(x / self.white.x);
        let fy = lab_f(y / self.white.y);
        let fz = lab_f(z / self.white.z);
        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl Default for LabConverter {
    fn default() -> Self {
        Self::new()
    }
}
