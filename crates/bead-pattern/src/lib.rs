//! bead-pattern: perceptual color matching of images against bead palettes
//!
//! This library converts every pixel of an image to the nearest color of a
//! physical bead palette (Hama, Perler and similar fuse beads), renders the
//! result as a plain or bead-styled raster and counts how many beads of each
//! color the pattern needs.
//!
//! # Quick Start
//!
//! ```
//! use bead_pattern::{BeadPipeline, PaletteFilter, PaletteIndex, Rgb};
//!
//! let index = PaletteIndex::from_json(
//!     r#"{"red":{"R":255,"G":0,"B":0}, "blue":{"R":0,"G":0,"B":255}}"#,
//!     PaletteFilter::new(),
//! ).unwrap();
//!
//! let pixels = [Rgb::new(255, 0, 0), Rgb::new(10, 10, 240)];
//! let pattern = BeadPipeline::new(&index)
//!     .bead_style(true)
//!     .run(&pixels, 1, 2)
//!     .unwrap();
//!
//! assert_eq!(pattern.raster().width(), 8);
//! assert_eq!(pattern.raster().height(), 16);
//! assert_eq!(pattern.usage().total(), 2);
//! ```
//!
//! # Color Science
//!
//! Matching happens in CIE L*a*b* referenced to the D50 white point, the
//! illuminant under which printed and physical swatches are usually
//! measured. The sRGB input is linearized, converted to XYZ with the sRGB
//! primaries (D65) and chromatically adapted to D50 with the Bradford
//! transform before the Lab mapping.
//!
//! Distances use CIEDE2000 with unit weighting factors. Plain Euclidean
//! distance in Lab overrates hue differences in saturated blues and
//! underrates lightness differences near neutral greys, both of which are
//! common in bead palettes.
//!
//! # Concurrency
//!
//! [`BeadPipeline::run`] spreads image rows over a pool of worker threads.
//! Workers share one [`ColorMatcher`], whose cache makes repeated colors
//! cheap, and one [`UsageAccumulator`]. The result is independent of the
//! worker count.

pub mod color;
pub mod error;
pub mod matcher;
pub mod palette;
pub mod pipeline;
pub mod usage;


pub use color::{ciede2000, Lab, LabConverter, Rgb};
pub use error::PatternError;
pub use matcher::ColorMatcher;
pub use palette::{PaletteEntry, PaletteError, PaletteFilter, PaletteIndex};
pub use pipeline::{BeadPattern, BeadPipeline, BeadRaster, PipelineOptions};
pub use usage::{UsageAccumulator, UsageCounts};
