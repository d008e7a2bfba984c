//! Error types for palette operations

use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading and validating a bead palette.
///
/// [`Read`](PaletteError::Read) and [`Parse`](PaletteError::Parse) mean the
/// palette configuration itself is unusable. [`Empty`](PaletteError::Empty)
/// means the configuration was fine but the active filters left nothing to
/// match against. All of them are fatal before any pixel is processed.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The palette file could not be read
    #[error("failed to read palette file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The palette data is not a valid bead map
    #[error("failed to parse palette {origin}: {source}")]
    Parse {
        /// File path, or a description of the in-memory source
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// No palette entries are left after filtering
    #[error("palette has no usable colors for the selected bead types")]
    Empty,
}

impl PaletteError {
    /// True for unreadable or malformed palette configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, PaletteError::Read { .. } | PaletteError::Parse { .. })
    }
}
