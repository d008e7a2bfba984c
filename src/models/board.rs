//! Physical bead board arithmetic.

use serde::Serialize;

/// Default number of beads along one edge of a board.
pub const DEFAULT_BOARD_DIMENSION: u32 = 29;

/// Physical size of one fused bead in centimeters.
pub const BEAD_PITCH_CM: f64 = 0.5;

/// Boards needed to cover `beads` beads, rounded to the nearest board
/// (half a board rounds up).
pub fn boards_needed(beads: u32, board_dimension: u32) -> u32 {
    if board_dimension == 0 {
        return 0;
    }
    let (beads, board) = (u64::from(beads), u64::from(board_dimension));
    ((2 * beads + board) / (2 * board)) as u32
}

/// Board count and physical size of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardStats {
    pub boards_wide: u32,
    pub boards_high: u32,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl BoardStats {
    pub fn new(width: u32, height: u32, board_dimension: u32) -> Self {
        Self {
            boards_wide: boards_needed(width, board_dimension),
            boards_high: boards_needed(height, board_dimension),
            width_cm: f64::from(width) * BEAD_PITCH_CM,
            height_cm: f64::from(height) * BEAD_PITCH_CM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boards_needed_rounds_half_up() {
        assert_eq!(boards_needed(0, 29), 0);
        assert_eq!(boards_needed(14, 29), 0);
        assert_eq!(boards_needed(15, 29), 1);
        assert_eq!(boards_needed(29, 29), 1);
        assert_eq!(boards_needed(43, 29), 1);
        assert_eq!(boards_needed(44, 29), 2);
        assert_eq!(boards_needed(10, 20), 1);
        assert_eq!(boards_needed(9, 20), 0);
    }

    #[test]
    fn test_zero_board_dimension() {
        assert_eq!(boards_needed(100, 0), 0);
    }

    #[test]
    fn test_board_stats() {
        let stats = BoardStats::new(58, 29, DEFAULT_BOARD_DIMENSION);
        assert_eq!(stats.boards_wide, 2);
        assert_eq!(stats.boards_high, 1);
        assert_eq!(stats.width_cm, 29.0);
        assert_eq!(stats.height_cm, 14.5);
    }
}
