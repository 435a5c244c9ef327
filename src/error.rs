use thiserror::Error;

use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading boards or piece kinds from text.
///
/// Normal play never fails: rejected moves and rotations are reported as
/// `false`, and a blocked spawn ends the game through [`crate::GameState`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown piece kind '{0}'")]
    UnknownPieceKind(char),

    #[error("board has {0} rows, at most {max} allowed", max = BOARD_HEIGHT)]
    TooManyRows(usize),

    #[error("row {row} has {width} cells, expected {expected}", expected = BOARD_WIDTH)]
    RowWidth { row: usize, width: usize },

    #[error("unknown cell '{ch}' at row {row}, column {column}")]
    UnknownCell { ch: char, row: usize, column: usize },
}
