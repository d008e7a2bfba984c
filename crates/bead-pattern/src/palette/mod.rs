//! Bead palettes: loading, category filtering and the perceptual index.
//!
//! A palette file is a JSON object mapping bead names to their color and
//! category flags. [`PaletteIndex`] keeps the entries selected by a
//! [`PaletteFilter`] together with their precomputed L*a*b* coordinates.

mod entry;
mod error;
mod index;

pub use entry::{parse_palette, read_palette, BeadConfig, PaletteEntry, PaletteFilter};
pub use error::PaletteError;
pub use index::{IndexedBead, PaletteIndex};
