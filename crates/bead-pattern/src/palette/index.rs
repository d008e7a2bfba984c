//! The filtered, perceptually indexed palette used for matching.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::entry::{parse_palette, read_palette, PaletteEntry, PaletteFilter};
use super::error::PaletteError;
use crate::color::{Lab, LabConverter, Rgb};

/// A palette entry that survived filtering, with its L*a*b* coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedBead {
    name: Arc<str>,
    rgb: Rgb,
    lab: Lab,
}

impl IndexedBead {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, for tables that hold one name per pixel.
    #[inline]
    pub fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    #[inline]
    pub fn lab(&self) -> Lab {
        self.lab
    }
}

/// Lookup table from perceptual coordinate to bead.
///
/// Built once, single-threaded, before any matching starts and read-only
/// afterwards. Entries are kept in ascending name order; the matcher scans
/// them in that order, so ties in distance resolve to the alphabetically
/// first bead on every run.
///
/// Each L*a*b* coordinate maps to exactly one bead. If two entries convert
/// to the same coordinate (identical RGB values), the later one in name
/// order replaces the earlier one.
///
/// # Example
///
/// ```
/// use bead_pattern::palette::{PaletteFilter, PaletteIndex};
///
/// let index = PaletteIndex::from_json(
///     r#"{"red":{"R":255,"G":0,"B":0}, "blue":{"R":0,"G":0,"B":255}}"#,
///     PaletteFilter::new(),
/// ).unwrap();
///
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.get("red").unwrap().rgb().r, 255);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteIndex {
    beads: Vec<IndexedBead>,
    by_name: HashMap<Arc<str>, usize>,
    converter: LabConverter,
}

impl PaletteIndex {
    /// Build an index from palette entries, keeping those retained by
    /// `filter`.
    ///
    /// Never fails; an empty result is reported by the matcher, which is
    /// the component that cannot work without entries.
    pub fn build(
        entries: impl IntoIterator<Item = PaletteEntry>,
        filter: PaletteFilter,
    ) -> Self {
        let converter = LabConverter::new();

        let mut entries: Vec<PaletteEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let total = entries.len();

        let mut beads: Vec<IndexedBead> = Vec::with_capacity(total);
        let mut by_lab: HashMap<[u64; 3], usize> = HashMap::new();

        for entry in entries {
            if !filter.retains(&entry) {
                tracing::trace!(bead = %entry.name, "Bead filtered out");
                continue;
            }

            let lab = converter.to_lab(entry.rgb);
            tracing::debug!(
                bead = %entry.name,
                rgb = %entry.rgb,
                l = lab.l,
                a = lab.a,
                b = lab.b,
                "Bead loaded"
            );

            let bead = IndexedBead {
                name: Arc::from(entry.name),
                rgb: entry.rgb,
                lab,
            };

            match by_lab.get(&lab.to_bits()) {
                Some(&slot) => {
                    tracing::warn!(
                        replaced = %beads[slot].name,
                        bead = %bead.name,
                        "Beads share the same color, keeping the later one"
                    );
                    beads[slot] = bead;
                }
                None => {
                    by_lab.insert(lab.to_bits(), beads.len());
                    beads.push(bead);
                }
            }
        }

        // Replacements can leave a later name in an earlier slot
        beads.sort_by(|a, b| a.name.cmp(&b.name));

        let by_name = beads
            .iter()
            .enumerate()
            .map(|(i, bead)| (bead.name.clone(), i))
            .collect();

        tracing::info!(
            total,
            retained = beads.len(),
            greyscale = filter.greyscale,
            translucent = filter.translucent,
            fluorescent = filter.fluorescent,
            "Palette indexed"
        );

        Self {
            beads,
            by_name,
            converter,
        }
    }

    /// Parse palette JSON and build the index.
    pub fn from_json(json: &str, filter: PaletteFilter) -> Result<Self, PaletteError> {
        Ok(Self::build(parse_palette(json, "<inline>")?, filter))
    }

    /// Read a palette file and build the index.
    pub fn load(path: impl AsRef<Path>, filter: PaletteFilter) -> Result<Self, PaletteError> {
        Ok(Self::build(read_palette(path)?, filter))
    }

    /// Number of retained beads.
    #[inline]
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Retained beads in matching order (ascending name).
    #[inline]
    pub fn beads(&self) -> &[IndexedBead] {
        &self.beads
    }

    /// Bead at a position in matching order.
    #[inline]
    pub fn bead(&self, idx: usize) -> &IndexedBead {
        &self.beads[idx]
    }

    /// Look up a retained bead by name.
    pub fn get(&self, name: &str) -> Option<&IndexedBead> {
        self.by_name.get(name).map(|&i| &self.beads[i])
    }

    /// The converter used for palette coordinates; pixels must use the same.
    #[inline]
    pub fn converter(&self) -> &LabConverter {
        &self.converter
    }
}
