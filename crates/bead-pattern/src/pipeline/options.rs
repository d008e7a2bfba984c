//! Configuration for a pattern run.

use std::num::NonZeroUsize;

/// Options for [`BeadPipeline`](super::BeadPipeline).
///
/// # Example
///
/// ```
/// use bead_pattern::pipeline::PipelineOptions;
///
/// let options = PipelineOptions::new().bead_style(true).collect_names(true);
/// assert!(options.bead_style);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    /// Expand every input pixel into an 8x8 bead block.
    pub bead_style: bool,
    /// Keep the matched bead name of every input pixel.
    pub collect_names: bool,
    /// Worker thread count; `None` uses the available parallelism.
    pub workers: Option<NonZeroUsize>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bead_style(mut self, enabled: bool) -> Self {
        self.bead_style = enabled;
        self
    }

    #[inline]
    pub fn collect_names(mut self, enabled: bool) -> Self {
        self.collect_names = enabled;
        self
    }

    #[inline]
    pub fn workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }

    /// Output pixels per input pixel along each axis.
    #[inline]
    pub fn scale(&self) -> u32 {
        if self.bead_style {
            super::BEAD_SIZE
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::new();
        assert!(!options.bead_style);
        assert!(!options.collect_names);
        assert!(options.worker_count() >= 1);
        assert_eq!(options.scale(), 1);
    }

    #[test]
    fn test_explicit_workers() {
        let options = PipelineOptions::new().workers(NonZeroUsize::new(3).unwrap());
        assert_eq!(options.worker_count(), 3);
    }

    #[test]
    fn test_bead_style_scale() {
        assert_eq!(PipelineOptions::new().bead_style(true).scale(), 8);
    }
}
