//! Concurrent matching of a whole image.
//!
//! [`BeadPipeline`] matches every pixel of an input image against a
//! [`PaletteIndex`] on a fixed pool of worker threads and assembles a
//! [`BeadPattern`]: the output raster, the bead usage counts and optionally
//! the bead name of every input pixel.
//!
//! # Scheduling
//!
//! ```text
//!  caller thread                      worker threads (N)
//!  ─────────────                      ──────────────────
//!  split raster into row bands
//!  send RowJob ──► bounded queue ──►  recv RowJob
//!  (blocks when 2N jobs queued)       match each pixel (shared cache)
//!                                     paint own band, fill own name slots
//!                                     merge row tally into usage
//!  close queue
//!  join all workers   ◄────────────── queue drained, exit
//! ```
//!
//! A job owns a disjoint slice of the output raster and of the name table,
//! so painting needs no lock. Only the match cache and the usage counter
//! are shared. The run returns after every worker has been joined, so the
//! raster, names and usage are complete when the caller sees them.
//!
//! A panicking worker raises an abort flag on its way out. The caller stops
//! queueing rows and the remaining workers stop taking them, so the run
//! fails without matching the rest of the image.

mod options;
mod raster;

pub use options::PipelineOptions;
pub use raster::{is_fill_texel, BeadRaster, BEAD_FILL, BEAD_SIZE};

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::bounded;

use crate::color::Rgb;
use crate::error::PatternError;
use crate::matcher::ColorMatcher;
use crate::palette::PaletteIndex;
use crate::usage::{UsageAccumulator, UsageCounts};

/// Queue slots per worker.
const QUEUE_DEPTH_PER_WORKER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Dispatching,
    AwaitingCompletion,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Dispatching => "dispatching",
            Phase::AwaitingCompletion => "awaiting-completion",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// One input row and the output it owns.
struct RowJob<'a> {
    y: u32,
    band: &'a mut [u8],
    names: Option<&'a mut [Option<Arc<str>>]>,
}

/// Read-only state every worker needs.
struct RowWorker<'a, 'p> {
    pixels: &'a [Rgb],
    width: u32,
    band_width: u32,
    bead_style: bool,
    matcher: &'a ColorMatcher<'p>,
    usage: &'a UsageAccumulator,
}

impl RowWorker<'_, '_> {
    fn process(&self, job: RowJob<'_>) {
        let RowJob {
            y,
            band,
            mut names,
        } = job;
        let start = y as usize * self.width as usize;
        let row = &self.pixels[start..start + self.width as usize];

        let mut tally: HashMap<&str, u64> = HashMap::new();
        for (x, &pixel) in row.iter().enumerate() {
            let bead = self.matcher.match_color(pixel);
            *tally.entry(bead.name()).or_default() += 1;
            if let Some(slots) = names.as_deref_mut() {
                slots[x] = Some(bead.shared_name().clone());
            }
            raster::paint(&mut *band, self.band_width, x as u32, bead.rgb(), self.bead_style);
        }

        self.usage.record_tally(tally);
    }
}

/// The finished result of a run.
#[derive(Debug, Clone)]
pub struct BeadPattern {
    width: u32,
    height: u32,
    raster: BeadRaster,
    usage: UsageCounts,
    names: Option<Vec<Arc<str>>>,
}

impl BeadPattern {
    /// Input width in beads.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Input height in beads.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn raster(&self) -> &BeadRaster {
        &self.raster
    }

    pub fn into_raster(self) -> BeadRaster {
        self.raster
    }

    #[inline]
    pub fn usage(&self) -> &UsageCounts {
        &self.usage
    }

    /// Bead name per input pixel at index `x + y * width`, if collected.
    pub fn names(&self) -> Option<&[Arc<str>]> {
        self.names.as_deref()
    }

    /// Bead name of the input pixel at (`x`, `y`), if names were collected.
    pub fn name_at(&self, x: u32, y: u32) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.names()
            .map(|names| &*names[x as usize + y as usize * self.width as usize])
    }
}

/// Matches every pixel of an image against a palette.
///
/// The pipeline borrows the palette index and can be reused for several
/// images; each [`run`](Self::run) gets fresh caches and counters.
///
/// # Example
///
/// ```
/// use bead_pattern::color::Rgb;
/// use bead_pattern::palette::{PaletteFilter, PaletteIndex};
/// use bead_pattern::pipeline::BeadPipeline;
///
/// let index = PaletteIndex::from_json(
///     r#"{"red":{"R":255,"G":0,"B":0}, "blue":{"R":0,"G":0,"B":255}}"#,
///     PaletteFilter::new(),
/// ).unwrap();
///
/// let pixels = [Rgb::new(255, 0, 0), Rgb::new(10, 10, 240)];
/// let pattern = BeadPipeline::new(&index).run(&pixels, 1, 2).unwrap();
///
/// assert_eq!(pattern.usage().get("red"), 1);
/// assert_eq!(pattern.usage().get("blue"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BeadPipeline<'p> {
    index: &'p PaletteIndex,
    options: PipelineOptions,
}

impl<'p> BeadPipeline<'p> {
    pub fn new(index: &'p PaletteIndex) -> Self {
        Self::with_options(index, PipelineOptions::default())
    }

    pub fn with_options(index: &'p PaletteIndex, options: PipelineOptions) -> Self {
        Self { index, options }
    }

    #[inline]
    pub fn bead_style(mut self, enabled: bool) -> Self {
        self.options = self.options.bead_style(enabled);
        self
    }

    #[inline]
    pub fn collect_names(mut self, enabled: bool) -> Self {
        self.options = self.options.collect_names(enabled);
        self
    }

    #[inline]
    pub fn workers(mut self, workers: NonZeroUsize) -> Self {
        self.options = self.options.workers(workers);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Match all `width * height` pixels (row-major) and build the pattern.
    ///
    /// # Errors
    ///
    /// - [`PatternError::Palette`] with [`PaletteError::Empty`] if the index
    ///   has no entries; nothing is dispatched in that case
    /// - [`PatternError::DimensionMismatch`] if `pixels` has the wrong length
    /// - [`PatternError::TooLarge`] if the output raster would not fit in
    ///   memory addressing or `u32` dimensions
    /// - [`PatternError::WorkerPanicked`] if a worker thread died
    ///
    /// [`PaletteError::Empty`]: crate::palette::PaletteError::Empty
    pub fn run(&self, pixels: &[Rgb], width: u32, height: u32) -> Result<BeadPattern, PatternError> {
        let scale = self.options.scale();
        let too_large = PatternError::TooLarge { width, height, scale };
        let (raster_width, raster_height) = width
            .checked_mul(scale)
            .zip(height.checked_mul(scale))
            .filter(|&(w, h)| BeadRaster::fits(w, h))
            .ok_or(too_large)?;

        let pixel_count = width as usize * height as usize;
        if pixels.len() != pixel_count {
            return Err(PatternError::DimensionMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }

        let matcher = ColorMatcher::new(self.index)?;
        let usage = UsageAccumulator::new();

        let mut raster = BeadRaster::new(raster_width, raster_height);
        let mut names: Option<Vec<Option<Arc<str>>>> = self
            .options
            .collect_names
            .then(|| vec![None; pixel_count]);

        let started = Instant::now();
        let workers = self.options.worker_count().min(height.max(1) as usize);

        if pixel_count > 0 {
            let mut name_rows = names
                .as_mut()
                .map(|table| table.chunks_mut(width as usize));
            let jobs = raster
                .bands_mut(scale)
                .zip(0..height)
                .map(move |(band, y)| RowJob {
                    y,
                    band,
                    names: name_rows.as_mut().and_then(Iterator::next),
                });

            let worker = RowWorker {
                pixels,
                width,
                band_width: raster_width,
                bead_style: self.options.bead_style,
                matcher: &matcher,
                usage: &usage,
            };

            let failed = dispatch(jobs, workers, |job| worker.process(job));
            if failed > 0 {
                tracing::error!(failed, "Pixel workers panicked, discarding output");
                return Err(PatternError::WorkerPanicked { failed });
            }
        }
        tracing::debug!(phase = %Phase::Done, "Pattern run finished");

        let usage = usage.snapshot();
        debug_assert_eq!(usage.total(), pixel_count as u64);

        let names = names.map(|table| table.into_iter().flatten().collect::<Vec<_>>());
        debug_assert!(names.as_ref().map_or(true, |n| n.len() == pixel_count));

        tracing::info!(
            width,
            height,
            workers,
            distinct_colors = matcher.cached_matches(),
            beads_used = usage.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image matched to palette"
        );

        Ok(BeadPattern {
            width,
            height,
            raster,
            usage,
            names,
        })
    }
}

/// Raises the abort flag if the owning worker unwinds.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.store(true, Ordering::Release);
        }
    }
}

/// Feed `jobs` to `workers` threads through a bounded queue and wait for
/// all of them. Returns how many workers panicked.
///
/// After the first panic no further jobs are queued or started.
fn dispatch<T, F>(jobs: impl Iterator<Item = T>, workers: usize, process: F) -> usize
where
    T: Send,
    F: Fn(T) + Sync,
{
    let (tx, rx) = bounded::<T>(workers * QUEUE_DEPTH_PER_WORKER);
    let aborted = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let rx = rx.clone();
                let (aborted, process) = (&aborted, &process);
                scope.spawn(move || {
                    let _guard = AbortOnPanic(aborted);
                    for job in rx {
                        if aborted.load(Ordering::Acquire) {
                            break;
                        }
                        process(job);
                    }
                })
            })
            .collect();
        drop(rx);

        tracing::debug!(phase = %Phase::Dispatching, workers, "Dispatching rows");
        for job in jobs {
            if aborted.load(Ordering::Acquire) {
                tracing::debug!("Worker failed, no further rows queued");
                break;
            }
            // Every receiver gone means every worker stopped
            if tx.send(job).is_err() {
                break;
            }
        }
        drop(tx);

        tracing::debug!(phase = %Phase::AwaitingCompletion, "Waiting for workers");
        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(Result::is_err)
            .count()
    })
}
