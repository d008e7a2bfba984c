use std::num::NonZeroUsize;
use std::path::PathBuf;

use bead_pattern::palette::PaletteFilter;
use bead_pattern::pipeline::PipelineOptions;

use super::board::DEFAULT_BOARD_DIMENSION;
use crate::assets::PaletteSource;
use crate::error::AppError;

/// Target size of the bead pattern.
///
/// Board counts override pixel sizes. A dimension left at `None` follows
/// the aspect ratio of the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub boards_width: Option<u32>,
    pub boards_height: Option<u32>,
}

impl ResizeOptions {
    /// Final size for a `src_width` x `src_height` image, or `None` when no
    /// resize was requested.
    ///
    /// # Errors
    ///
    /// [`AppError::BoardsTooLarge`] if a board count times `board_dimension`
    /// does not fit in a pixel dimension.
    pub fn target_size(
        &self,
        src_width: u32,
        src_height: u32,
        board_dimension: u32,
    ) -> Result<Option<(u32, u32)>, AppError> {
        let width = board_pixels(self.boards_width, board_dimension)?
            .or(self.width)
            .filter(|&w| w > 0);
        let height = board_pixels(self.boards_height, board_dimension)?
            .or(self.height)
            .filter(|&h| h > 0);

        Ok(match (width, height) {
            (None, None) => None,
            (Some(w), Some(h)) => Some((w, h)),
            (Some(w), None) => Some((w, scale_dimension(src_height, w, src_width))),
            (None, Some(h)) => Some((scale_dimension(src_width, h, src_height), h)),
        })
    }
}

fn board_pixels(boards: Option<u32>, board_dimension: u32) -> Result<Option<u32>, AppError> {
    boards
        .map(|boards| {
            boards
                .checked_mul(board_dimension)
                .ok_or(AppError::BoardsTooLarge {
                    boards,
                    board_dimension,
                })
        })
        .transpose()
}

/// `value * numerator / denominator`, rounded, at least 1.
fn scale_dimension(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 1;
    }
    let scaled = f64::from(value) * f64::from(numerator) / f64::from(denominator);
    (scaled.round() as u32).max(1)
}

/// Image adjustments applied before matching. Zero disables a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterOptions {
    pub greyscale: bool,
    /// Gaussian blur sigma
    pub blur: f32,
    /// Unsharp mask sigma
    pub sharpen: f32,
    pub gamma: f32,
    /// Percentage, -100..=100
    pub contrast: f32,
    /// Percentage, -100..=100
    pub brightness: f32,
}

impl FilterOptions {
    pub fn is_identity(&self) -> bool {
        !self.greyscale
            && self.blur == 0.0
            && self.sharpen == 0.0
            && self.gamma == 0.0
            && self.contrast == 0.0
            && self.brightness == 0.0
    }
}

/// Everything one conversion run needs.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub html: Option<PathBuf>,
    /// JSON usage report
    pub report: Option<PathBuf>,
    pub palette: PaletteSource,
    pub resize: ResizeOptions,
    pub filters: FilterOptions,
    pub board_dimension: u32,
    pub bead_style: bool,
    pub translucent: bool,
    pub fluorescent: bool,
    pub no_color_matching: bool,
    pub workers: Option<NonZeroUsize>,
}

impl ProcessOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            html: None,
            report: None,
            palette: PaletteSource::Embedded,
            resize: ResizeOptions::default(),
            filters: FilterOptions::default(),
            board_dimension: DEFAULT_BOARD_DIMENSION,
            bead_style: false,
            translucent: false,
            fluorescent: false,
            no_color_matching: false,
            workers: None,
        }
    }

    /// Which palette entries take part in matching.
    ///
    /// Greyscale image mode also restricts matching to grey beads.
    pub fn palette_filter(&self) -> PaletteFilter {
        PaletteFilter::new()
            .greyscale(self.filters.greyscale)
            .translucent(self.translucent)
            .fluorescent(self.fluorescent)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        let options = PipelineOptions::new()
            .bead_style(self.bead_style)
            .collect_names(self.html.is_some());
        match self.workers {
            Some(workers) => options.workers(workers),
            None => options,
        }
    }
}
