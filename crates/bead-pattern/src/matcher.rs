//! Nearest-bead lookup with memoization.
//!
//! [`ColorMatcher`] resolves a pixel color to the palette entry with the
//! smallest CIEDE2000 distance. Two caches keyed by pixel color sit in front
//! of the scan:
//!
//! - pixel -> matched bead (hit returns immediately)
//! - pixel -> L*a*b* coordinate (skips the conversion)
//!
//! Both live under one reader-writer lock. Once the cache is warm almost
//! every lookup is a read, so workers rarely contend.
//!
//! Two workers can miss on the same color at the same time and both compute
//! the match. Both arrive at the same bead and store the same value, so the
//! duplicate work is harmless and no per-key locking is done.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::color::{ciede2000, Lab, Rgb};
use crate::palette::{IndexedBead, PaletteError, PaletteIndex};

/// Append-only memo tables for one run.
#[derive(Debug, Default)]
struct MatchCache {
    matches: HashMap<Rgb, usize>,
    labs: HashMap<Rgb, Lab>,
}

/// Thread-safe nearest-bead matcher over a [`PaletteIndex`].
///
/// The matcher owns its caches; they live exactly as long as the matcher
/// and are never shared between runs.
///
/// # Example
///
/// ```
/// use bead_pattern::color::Rgb;
/// use bead_pattern::matcher::ColorMatcher;
/// use bead_pattern::palette::{PaletteFilter, PaletteIndex};
///
/// let index = PaletteIndex::from_json(
///     r#"{"red":{"R":255,"G":0,"B":0}, "blue":{"R":0,"G":0,"B":255}}"#,
///     PaletteFilter::new(),
/// ).unwrap();
/// let matcher = ColorMatcher::new(&index).unwrap();
///
/// assert_eq!(matcher.match_color(Rgb::new(10, 10, 240)).name(), "blue");
/// ```
#[derive(Debug)]
pub struct ColorMatcher<'p> {
    index: &'p PaletteIndex,
    cache: RwLock<MatchCache>,
}

impl<'p> ColorMatcher<'p> {
    /// Create a matcher with empty caches.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Empty`] if the index has no entries. Checked once
    /// here so that [`match_color`](Self::match_color) is infallible.
    pub fn new(index: &'p PaletteIndex) -> Result<Self, PaletteError> {
        if index.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self {
            index,
            cache: RwLock::new(MatchCache::default()),
        })
    }

    /// The index this matcher scans.
    pub fn index(&self) -> &'p PaletteIndex {
        self.index
    }

    // A worker that panicked mid-insert leaves at most a missing entry;
    // the maps stay valid, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, MatchCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MatchCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The closest bead to `pixel`.
    ///
    /// Calling this twice with the same color returns the same bead, no
    /// matter what other colors are matched concurrently in between.
    pub fn match_color(&self, pixel: Rgb) -> &'p IndexedBead {
        let (hit, lab) = {
            let cache = self.read();
            (cache.matches.get(&pixel).copied(), cache.labs.get(&pixel).copied())
        };
        if let Some(idx) = hit {
            return self.index.bead(idx);
        }

        let lab = match lab {
            Some(lab) => lab,
            None => {
                let lab = self.index.converter().to_lab(pixel);
                self.write().labs.insert(pixel, lab);
                lab
            }
        };

        let (idx, distance) = self.nearest(lab);
        let bead = self.index.bead(idx);
        tracing::trace!(%pixel, bead = bead.name(), distance, "Best color match");

        self.write().matches.insert(pixel, idx);
        bead
    }

    /// Linear scan for the entry closest to `lab`.
    ///
    /// Returns the position in the index and the CIEDE2000 distance. An entry
    /// replaces the current best only when strictly closer, so ties go to the
    /// earlier entry in index order.
    pub fn nearest(&self, lab: Lab) -> (usize, f64) {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, bead) in self.index.beads().iter().enumerate() {
            let dist = ciede2000(bead.lab(), lab);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Number of distinct pixel colors matched so far.
    pub fn cached_matches(&self) -> usize {
        self.read().matches.len()
    }

    /// Number of distinct pixel colors converted to L*a*b* so far.
    pub fn cached_coordinates(&self) -> usize {
        self.read().labs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteEntry, PaletteFilter};

    fn rgb_index() -> PaletteIndex {
        PaletteIndex::build(
            vec![
                PaletteEntry::new("black", Rgb::new(0, 0, 0)),
                PaletteEntry::new("white", Rgb::new(255, 255, 255)),
                PaletteEntry::new("red", Rgb::new(255, 0, 0)),
                PaletteEntry::new("green", Rgb::new(0, 255, 0)),
                PaletteEntry::new("blue", Rgb::new(0, 0, 255)),
                PaletteEntry::new("yellow", Rgb::new(255, 255, 0)),
            ],
            PaletteFilter::new(),
        )
    }

    #[test]
    fn test_empty_index_rejected() {
        let index = PaletteIndex::build(Vec::new(), PaletteFilter::new());
        assert!(matches!(ColorMatcher::new(&index), Err(PaletteError::Empty)));
    }

    #[test]
    fn test_exact_palette_colors_match_themselves() {
        let index = rgb_index();
        let matcher = ColorMatcher::new(&index).unwrap();
        for bead in index.beads() {
            let matched = matcher.match_color(bead.rgb());
            assert_eq!(matched.name(), bead.name());
            let (_, distance) = matcher.nearest(bead.lab());
            assert_eq!(distance, 0.0);
        }
    }

    #[test]
    fn test_near_colors() {
        let index = rgb_index();
        let matcher = ColorMatcher::new(&index).unwrap();
        assert_eq!(matcher.match_color(Rgb::new(20, 20, 20)).name(), "black");
        assert_eq!(matcher.match_color(Rgb::new(240, 245, 250)).name(), "white");
        assert_eq!(matcher.match_color(Rgb::new(230, 30, 20)).name(), "red");
        assert_eq!(matcher.match_color(Rgb::new(30, 220, 40)).name(), "green");
        assert_eq!(matcher.match_color(Rgb::new(250, 240, 30)).name(), "yellow");
    }

    #[test]
    fn test_single_entry_always_matches() {
        let index = PaletteIndex::build(
            vec![PaletteEntry::new("only", Rgb::new(128, 0, 128))],
            PaletteFilter::new(),
        );
        let matcher = ColorMatcher::new(&index).unwrap();
        for pixel in [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), Rgb::new(0, 255, 0)] {
            assert_eq!(matcher.match_color(pixel).name(), "only");
        }
    }

    #[test]
    fn test_nearest_returns_first_minimum_in_index_order() {
        let index = rgb_index();
        let matcher = ColorMatcher::new(&index).unwrap();

        for lab in [
            Lab::new(50.0, 0.0, 0.0),
            Lab::new(70.0, -40.0, 60.0),
            Lab::new(20.0, 30.0, -60.0),
        ] {
            let (idx, distance) = matcher.nearest(lab);
            let distances: Vec<f64> = index
                .beads()
                .iter()
                .map(|b| ciede2000(b.lab(), lab))
                .collect();
            let best = distances.iter().copied().fold(f64::INFINITY, f64::min);
            let first = distances.iter().position(|&d| d == best).unwrap();

            assert_eq!(idx, first);
            assert_eq!(distance, best);
            assert!(distance >= 0.0);
        }
    }

    #[test]
    fn test_caches_fill_once_per_color() {
        let index = rgb_index();
        let matcher = ColorMatcher::new(&index).unwrap();
        assert_eq!(matcher.cached_matches(), 0);

        let first = matcher.match_color(Rgb::new(10, 10, 240)).name().to_string();
        let second = matcher.match_color(Rgb::new(10, 10, 240)).name().to_string();
        assert_eq!(first, second);
        assert_eq!(matcher.cached_matches(), 1);
        assert_eq!(matcher.cached_coordinates(), 1);

        matcher.match_color(Rgb::new(11, 10, 240));
        assert_eq!(matcher.cached_matches(), 2);
    }

    #[test]
    fn test_concurrent_matching_is_consistent() {
        let index = rgb_index();
        let matcher = ColorMatcher::new(&index).unwrap();
        let colors: Vec<Rgb> = (0..=255u8)
            .step_by(5)
            .map(|v| Rgb::new(v, 255 - v, v / 2))
            .collect();

        let expected: Vec<String> = {
            let fresh = ColorMatcher::new(&index).unwrap();
            colors
                .iter()
                .map(|&c| fresh.match_color(c).name().to_string())
                .collect()
        };

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for (color, name) in colors.iter().zip(&expected) {
                        assert_eq!(matcher.match_color(*color).name(), name);
                    }
                });
            }
        });

        assert_eq!(matcher.cached_matches(), colors.len());
    }
}
