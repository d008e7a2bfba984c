//! Beadmachine - turn images into craft bead patterns
//!
//! Decoding, filtering and output around the `bead-pattern` matcher.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
