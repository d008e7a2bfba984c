//! Test fixtures: palettes and input images in a temporary directory.

use std::path::{Path, PathBuf};

use beadmachine::assets::PaletteSource;
use beadmachine::models::ProcessOptions;
use image::{Rgb, RgbImage};
use tempfile::TempDir;

/// Two saturated beads.
pub const RED_BLUE_PALETTE: &str =
    r#"{"red":{"R":255,"G":0,"B":0}, "blue":{"R":0,"G":0,"B":255}}"#;

/// Grey, colored, translucent and fluorescent beads in the two JSON
/// spellings found in real palette files.
pub const MIXED_PALETTE: &str = r#"{
    "01 White":     {"R": 255, "G": 255, "B": 255, "GreyShade": true},
    "18 Black":     {"R": 0,   "G": 0,   "B": 0,   "greyShade": true},
    "17 Grey":      {"R": 128, "G": 128, "B": 128, "GreyShade": true},
    "05 Red":       {"R": 200, "G": 20,  "B": 30},
    "10 Green":     {"R": 20,  "G": 160, "B": 60},
    "15 Glass Blue":{"R": 30,  "G": 60,  "B": 220, "Translucent": true},
    "34 Neon":      {"R": 240, "G": 250, "B": 40,  "fluorescent": true}
}"#;

/// A temporary directory holding inputs and outputs of one test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a palette file and return its path.
    pub fn palette(&self, json: &str) -> PathBuf {
        let path = self.path("palette.json");
        std::fs::write(&path, json).expect("Failed to write palette");
        path
    }

    /// Write a PNG with the given row-major pixels.
    pub fn image(&self, name: &str, width: u32, height: u32, pixels: &[[u8; 3]]) -> PathBuf {
        assert_eq!(pixels.len(), (width * height) as usize);
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb(pixels[(x + y * width) as usize])
        });
        let path = self.path(name);
        image.save(&path).expect("Failed to write image");
        path
    }

    /// Options reading `input` and writing `out.png`, with `palette` loaded
    /// from a file in this workspace.
    pub fn options(&self, input: &Path, palette: &str) -> ProcessOptions {
        let mut options = ProcessOptions::new(input, self.path("out.png"));
        options.palette = PaletteSource::File(self.palette(palette));
        options
    }
}
