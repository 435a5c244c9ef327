//! The grid of locked cells.
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing
//! downwards; row 0 is the top visible row. Rows are fixed-size arrays, so a
//! row always has exactly [`BOARD_WIDTH`] cells and the grid never resizes.

use std::fmt;
use std::str::FromStr;

use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::{Error, Result};
use crate::piece::ActivePiece;
use crate::shapes::{PieceKind, Shape};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

pub type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.rows.get(y)?.get(x).copied()
    }

    /// Writes a cell. Returns false if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Whether `shape` placed with its top-left corner at `(origin_x,
    /// origin_y)` leaves the grid sideways or through the floor, or overlaps a
    /// filled cell. Cells above row 0 only take part in the sideways check.
    pub fn collides(&self, shape: Shape, origin_x: i16, origin_y: i16) -> bool {
        shape.cells().any(|(dx, dy)| {
            let (x, y) = (origin_x + dx, origin_y + dy);
            if x < 0 || x >= BOARD_WIDTH as i16 || y >= BOARD_HEIGHT as i16 {
                return true;
            }
            y >= 0 && self.rows[y as usize][x as usize].is_filled()
        })
    }

    /// Locks `piece` into the grid. Cells above the visible area are dropped.
    pub fn merge(&mut self, piece: &ActivePiece) {
        let cell = Cell::Filled(piece.kind());
        for block in piece.blocks() {
            if block.y >= 0 {
                self.set(block.x, block.y, cell);
            }
        }
    }

    /// Removes every full row, inserting an empty row at the top for each,
    /// and returns how many were removed.
    ///
    /// Rows are scanned bottom-up; after a removal the same index is examined
    /// again, since the row above has just moved into it.
    pub fn sweep_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT;

        while y > 0 {
            if self.is_row_full(y - 1) {
                self.rows[..y].rotate_right(1);
                self.rows[0] = EMPTY_ROW;
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows
            .get(y)
            .map_or(0, |row| row.iter().filter(|cell| cell.is_filled()).count())
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Text form: one line per row, `.` for an empty cell and the kind letter for
/// a filled one. Fewer than [`BOARD_HEIGHT`] lines fill the bottom of the
/// board; blank lines are ignored.
impl FromStr for Board {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > BOARD_HEIGHT {
            return Err(Error::TooManyRows(lines.len()));
        }

        let mut board = Board::new();
        let top = BOARD_HEIGHT - lines.len();
        for (offset, line) in lines.iter().enumerate() {
            let y = top + offset;
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(Error::RowWidth { row: y, width });
            }
            for (x, ch) in line.chars().enumerate() {
                board.rows[y][x] = match ch {
                    '.' => Cell::Empty,
                    _ => Cell::Filled(PieceKind::try_from(ch).map_err(|_| {
                        Error::UnknownCell {
                            ch,
                            row: y,
                            column: x,
                        }
                    })?),
                };
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, ".")?,
                    Cell::Filled(kind) => write!(f, "{kind}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::shape;

    #[test]
    fn get_and_set_respect_bounds() {
        let mut board = Board::new();
        assert!(board.set(0, 0, Cell::Filled(PieceKind::I)));
        assert!(board.set(9, 19, Cell::Filled(PieceKind::T)));
        assert!(!board.set(10, 0, Cell::Filled(PieceKind::T)));
        assert!(!board.set(0, -1, Cell::Filled(PieceKind::T)));

        assert_eq!(board.get(0, 0), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(9, 19), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, 20), None);
    }

    #[test]
    fn collides_checks_every_bound() {
        let board = Board::new();
        let o = shape(PieceKind::O, 0);

        assert!(!board.collides(o, 0, 0));
        assert!(!board.collides(o, 8, 18));
        assert!(board.collides(o, -1, 0));
        assert!(board.collides(o, 9, 0));
        assert!(board.collides(o, 0, 19));
    }

    #[test]
    fn cells_above_board_skip_occupancy_but_not_walls() {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i16 {
            board.set(x, 0, Cell::Filled(PieceKind::Z));
        }
        let o = shape(PieceKind::O, 0);

        assert!(!board.collides(o, 4, -2));
        assert!(board.collides(o, 4, -1));
        assert!(board.collides(o, -1, -2));
        assert!(board.collides(o, 9, -2));
    }

    #[test]
    fn empty_matrix_cells_never_collide() {
        // I in rotation 0 only occupies its second row.
        let board: Board = "ZZZZZZZZZZ".parse().unwrap();
        let i = shape(PieceKind::I, 0);

        assert!(!board.collides(i, 0, 17));
        assert!(board.collides(i, 0, 18));
    }

    #[test]
    fn merge_drops_cells_above_the_board() {
        let mut board = Board::new();
        let piece = ActivePiece::at(PieceKind::I, 1, 0, -2);

        board.merge(&piece);

        // Column 2, rows -2..=1: only rows 0 and 1 are written.
        assert_eq!(board.total_filled_cells(), 2);
        assert_eq!(board.get(2, 0), Some(Cell::Filled(PieceKind::I)));
        assert_eq!(board.get(2, 1), Some(Cell::Filled(PieceKind::I)));
    }

    #[test]
    fn sweep_handles_adjacent_full_rows() {
        let mut board: Board = "
            T.........
            IIIIIIIIII
            IIIIIIIIII
            IIIIIIIIII
        "
        .parse()
        .unwrap();

        assert_eq!(board.sweep_lines(), 3);
        assert_eq!(board.get(0, 19), Some(Cell::Filled(PieceKind::T)));
        assert_eq!(board.total_filled_cells(), 1);
    }

    #[test]
    fn parse_and_display_agree() {
        let text = "\
            ..........\n\
            .OO...T...\n\
            LOO..TTT.J\n";
        let board: Board = text.parse().unwrap();
        let shown = board.to_string();
        let bottom: Vec<&str> = shown.lines().skip(BOARD_HEIGHT - 3).collect();

        assert_eq!(bottom, ["..........", ".OO...T...", "LOO..TTT.J"]);
        assert_eq!(shown.lines().count(), BOARD_HEIGHT);
    }

    #[test]
    fn parse_rejects_malformed_boards() {
        assert_eq!(
            "....".parse::<Board>(),
            Err(Error::RowWidth { row: 19, width: 4 })
        );
        assert_eq!(
            "....x.....".parse::<Board>(),
            Err(Error::UnknownCell {
                ch: 'x',
                row: 19,
                column: 4
            })
        );
        let tall = "..........\n".repeat(BOARD_HEIGHT + 1);
        assert_eq!(
            tall.parse::<Board>(),
            Err(Error::TooManyRows(BOARD_HEIGHT + 1))
        );
    }
}
