//! Palette entries as stored in palette files, and category filtering.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::error::PaletteError;
use crate::color::Rgb;

/// One bead color as written in a palette file.
///
/// ```json
/// { "R": 255, "G": 0, "B": 0, "GreyShade": false, "Translucent": false, "Flourescent": false }
/// ```
///
/// Flags are optional and default to `false`. Field names are accepted in
/// both the capitalised and camel-case spellings found in existing palette
/// files; `Flourescent` keeps the historical misspelling as its canonical
/// name and also accepts `Fluorescent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BeadConfig {
    #[serde(rename = "R", alias = "r")]
    pub r: u8,
    #[serde(rename = "G", alias = "g")]
    pub g: u8,
    #[serde(rename = "B", alias = "b")]
    pub b: u8,
    #[serde(rename = "GreyShade", alias = "greyShade", default)]
    pub grey_shade: bool,
    #[serde(rename = "Translucent", alias = "translucent", default)]
    pub translucent: bool,
    #[serde(
        rename = "Flourescent",
        alias = "flourescent",
        alias = "Fluorescent",
        alias = "fluorescent",
        default
    )]
    pub fluorescent: bool,
}

/// A named bead color with its category flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: String,
    pub rgb: Rgb,
    pub grey_shade: bool,
    pub translucent: bool,
    pub fluorescent: bool,
}

impl PaletteEntry {
    /// A plain opaque bead with no category flags.
    pub fn new(name: impl Into<String>, rgb: Rgb) -> Self {
        Self {
            name: name.into(),
            rgb,
            grey_shade: false,
            translucent: false,
            fluorescent: false,
        }
    }

    pub fn grey_shade(mut self, flag: bool) -> Self {
        self.grey_shade = flag;
        self
    }

    pub fn translucent(mut self, flag: bool) -> Self {
        self.translucent = flag;
        self
    }

    pub fn fluorescent(mut self, flag: bool) -> Self {
        self.fluorescent = flag;
        self
    }

    fn from_config(name: String, config: BeadConfig) -> Self {
        Self {
            name,
            rgb: Rgb::new(config.r, config.g, config.b),
            grey_shade: config.grey_shade,
            translucent: config.translucent,
            fluorescent: config.fluorescent,
        }
    }
}

/// Which bead categories take part in matching.
///
/// The greyscale switch works the other way round from the other two:
/// it does not add grey beads, it restricts the palette to them. Once the
/// image itself is desaturated, colored beads have nothing to match.
///
/// | Setting       | Effect when `true`                  | Effect when `false`          |
/// |---------------|-------------------------------------|------------------------------|
/// | `greyscale`   | only `GreyShade` entries are kept   | grey entries kept like others|
/// | `translucent` | translucent entries are kept        | translucent entries dropped  |
/// | `fluorescent` | fluorescent entries are kept        | fluorescent entries dropped  |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteFilter {
    pub greyscale: bool,
    pub translucent: bool,
    pub fluorescent: bool,
}

impl PaletteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greyscale(mut self, enabled: bool) -> Self {
        self.greyscale = enabled;
        self
    }

    pub fn translucent(mut self, enabled: bool) -> Self {
        self.translucent = enabled;
        self
    }

    pub fn fluorescent(mut self, enabled: bool) -> Self {
        self.fluorescent = enabled;
        self
    }

    /// Whether `entry` takes part in matching under this filter.
    pub fn retains(&self, entry: &PaletteEntry) -> bool {
        (!self.greyscale || entry.grey_shade)
            && (self.translucent || !entry.translucent)
            && (self.fluorescent || !entry.fluorescent)
    }
}

/// Parse palette JSON. Entries come back sorted by bead name.
///
/// `origin` names the source in error messages.
pub fn parse_palette(json: &str, origin: &str) -> Result<Vec<PaletteEntry>, PaletteError> {
    let config: BTreeMap<String, BeadConfig> =
        serde_json::from_str(json).map_err(|source| PaletteError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    Ok(config
        .into_iter()
        .map(|(name, bead)| PaletteEntry::from_config(name, bead))
        .collect())
}

/// Read and parse a palette file.
pub fn read_palette(path: impl AsRef<Path>) -> Result<Vec<PaletteEntry>, PaletteError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| PaletteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_palette(&json, &path.display().to_string())
}
