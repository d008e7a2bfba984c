//! Color types and the perceptual conversion pipeline.
//!
//! - [`Rgb`]: 8-bit sRGB, used for source pixels, palette swatches and output
//! - [`Lab`]: CIE L*a*b* referenced to D50, used only for distance comparison
//!
//! # Example
//!
//! ```
//! use bead_pattern::color::{ciede2000, LabConverter, Rgb};
//!
//! let converter = LabConverter::new();
//! let red = converter.to_lab(Rgb::new(255, 0, 0));
//! let orange = converter.to_lab(Rgb::new(255, 128, 0));
//!
//! assert_eq!(ciede2000(red, red), 0.0);
//! assert!(ciede2000(red, orange) > 0.0);
//! ```

mod ciede2000;
mod lab;
mod rgb;

pub use ciede2000::ciede2000;
pub use lab::{bradford_adaptation, Lab, LabConverter, Matrix3, WhitePoint, D50, D65};
pub use rgb::Rgb;
