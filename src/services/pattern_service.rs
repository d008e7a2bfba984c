use std::time::Instant;

use bead_pattern::{BeadPipeline, PaletteError, UsageCounts};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{BoardStats, ProcessOptions};
use crate::rendering::{apply_filters, resize, to_rgb_pixels, write_instructions, write_png};

/// Summary of one conversion run, also written as the JSON usage report
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    /// Pattern width in beads
    pub width: u32,
    /// Pattern height in beads
    pub height: u32,
    /// Written PNG size in pixels
    pub output_width: u32,
    pub output_height: u32,
    pub boards: BoardStats,
    /// Bead usage; `None` when color matching was skipped
    pub usage: Option<UsageCounts>,
}

/// Orchestrates decode → filters → resize → match → PNG/HTML
pub struct PatternService {
    options: ProcessOptions,
}

impl PatternService {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Run the whole conversion and write the requested output files.
    pub fn run(&self) -> Result<PatternReport, AppError> {
        let options = &self.options;

        // Palette problems are reported before touching the image
        let index = if options.no_color_matching {
            None
        } else {
            let index = options.palette.load(options.palette_filter())?;
            if index.is_empty() {
                return Err(PaletteError::Empty.into());
            }
            tracing::info!(
                palette = %options.palette.describe(),
                beads = index.len(),
                "Palette loaded"
            );
            Some(index)
        };

        let image = image::open(&options.input).map_err(|source| AppError::ImageRead {
            path: options.input.clone(),
            source,
        })?;
        tracing::info!(
            path = %options.input.display(),
            width = image.width(),
            height = image.height(),
            "Input image loaded"
        );

        let mut prepared = apply_filters(image, &options.filters);
        if let Some((width, height)) =
            options
                .resize
                .target_size(prepared.width(), prepared.height(), options.board_dimension)?
        {
            prepared = resize(&prepared, width, height);
            tracing::info!(width, height, "Image resized");
        }

        let (width, height) = prepared.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::UnsupportedDimensions { width, height });
        }

        let boards = BoardStats::new(width, height, options.board_dimension);
        tracing::info!(
            boards_wide = boards.boards_wide,
            boards_high = boards.boards_high,
            width_cm = boards.width_cm,
            height_cm = boards.height_cm,
            "Bead boards needed"
        );

        let Some(index) = index else {
            write_png(&options.output, width, height, prepared.as_raw())?;
            tracing::info!(path = %options.output.display(), "Image written without color matching");
            let report = PatternReport {
                width,
                height,
                output_width: width,
                output_height: height,
                boards,
                usage: None,
            };
            self.write_report(&report)?;
            return Ok(report);
        };

        let pixels = to_rgb_pixels(&prepared);
        let started = Instant::now();
        let pattern = BeadPipeline::with_options(&index, options.pipeline_options())
            .run(&pixels, width, height)?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image processed"
        );

        let raster = pattern.raster();
        let (output_width, output_height) = (raster.width(), raster.height());
        tracing::info!(width = output_width, height = output_height, "Output image size");
        write_png(&options.output, output_width, output_height, raster.as_raw())?;

        if let Some(html) = &options.html {
            write_instructions(html, &pattern, &index, options.board_dimension)?;
        }

        let usage = pattern.usage().clone();
        log_usage(&usage);

        let report = PatternReport {
            width,
            height,
            output_width,
            output_height,
            boards,
            usage: Some(usage),
        };
        self.write_report(&report)?;
        Ok(report)
    }

    fn write_report(&self, report: &PatternReport) -> Result<(), AppError> {
        let Some(path) = &self.options.report else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json).map_err(|source| AppError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Usage report written");
        Ok(())
    }
}

fn log_usage(usage: &UsageCounts) {
    tracing::info!(colors = usage.len(), beads = usage.total(), "Bead colors used");
    for (bead, count) in usage.iter() {
        tracing::info!(bead, count, "Beads used");
    }
}
