use thiserror::Error;

use crate::board::Move;

/// Errors raised by board construction and move application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("illegal move {mv}: blank at row {row}, column {col} would leave the grid")]
    IllegalMove { mv: Move, row: usize, col: usize },

    #[error("board must have {expected} cells, got {got}")]
    WrongCellCount { expected: usize, got: usize },

    #[error("board must have {expected} rows, got {got}")]
    WrongRowCount { expected: usize, got: usize },

    #[error("row {row} must have {expected} columns, got {got}")]
    WrongRowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("tile {tile} is out of range 0..=8")]
    TileOutOfRange { tile: u8 },

    #[error("tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },

    #[error("invalid tile '{token}'")]
    InvalidToken { token: String },
}
