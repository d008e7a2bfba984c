//! Palette loading with an embedded fallback
//!
//! - If no palette path is configured: use the built-in Hama midi palette
//!   (no filesystem access)
//! - If a path is configured (flag or `BEADMACHINE_PALETTE`): read that file

use std::path::{Path, PathBuf};

use bead_pattern::palette::{PaletteError, PaletteFilter, PaletteIndex};

/// Built-in Hama midi palette.
pub const EMBEDDED_PALETTE: &str = include_str!("../palettes/hama.json");

/// Name of the embedded palette in log lines and error messages.
pub const EMBEDDED_PALETTE_NAME: &str = "<embedded hama.json>";

/// Where the bead palette comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSource {
    Embedded,
    File(PathBuf),
}

impl PaletteSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Embedded, Self::File)
    }

    /// Human-readable origin for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => EMBEDDED_PALETTE_NAME.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Load and index the palette, keeping entries retained by `filter`.
    pub fn load(&self, filter: PaletteFilter) -> Result<PaletteIndex, PaletteError> {
        match self {
            Self::Embedded => {
                tracing::debug!("Loading palette from embedded assets");
                PaletteIndex::from_json(EMBEDDED_PALETTE, filter)
            }
            Self::File(path) => load_file(path, filter),
        }
    }
}

fn load_file(path: &Path, filter: PaletteFilter) -> Result<PaletteIndex, PaletteError> {
    tracing::debug!(path = %path.display(), "Loading palette from filesystem");
    PaletteIndex::load(path, filter)
}
