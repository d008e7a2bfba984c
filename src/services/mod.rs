pub mod pattern_service;

pub use pattern_service::{PatternReport, PatternService};
