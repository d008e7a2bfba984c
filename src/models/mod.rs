pub mod board;
pub mod options;

pub use board::{boards_needed, BoardStats, BEAD_PITCH_CM, DEFAULT_BOARD_DIMENSION};
pub use options::{FilterOptions, ProcessOptions, ResizeOptions};
