//! Piece kinds and their four rotation states.
//!
//! Every rotation state is a square 0/1 occupancy matrix stored as static
//! data. Rotating a piece looks the next state up here instead of computing
//! it, so shapes stay bit-exact however many times a piece turns.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Rows of a square occupancy matrix, top row first.
pub type Matrix = &'static [&'static [u8]];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    fn rotations(self) -> &'static [Matrix; 4] {
        match self {
            PieceKind::I => &I_ROTATIONS,
            PieceKind::O => &O_ROTATIONS,
            PieceKind::T => &T_ROTATIONS,
            PieceKind::S => &S_ROTATIONS,
            PieceKind::Z => &Z_ROTATIONS,
            PieceKind::J => &J_ROTATIONS,
            PieceKind::L => &L_ROTATIONS,
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = Error;

    fn try_from(ch: char) -> Result<Self> {
        match ch.to_ascii_uppercase() {
            'I' => Ok(PieceKind::I),
            'O' => Ok(PieceKind::O),
            'T' => Ok(PieceKind::T),
            'S' => Ok(PieceKind::S),
            'Z' => Ok(PieceKind::Z),
            'J' => Ok(PieceKind::J),
            'L' => Ok(PieceKind::L),
            _ => Err(Error::UnknownPieceKind(ch)),
        }
    }
}

impl FromStr for PieceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => PieceKind::try_from(ch),
            (Some(ch), Some(_)) => Err(Error::UnknownPieceKind(ch)),
            (None, _) => Err(Error::UnknownPieceKind(' ')),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One rotation state of a piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Shape(Matrix);

impl Shape {
    /// Side length of the square matrix (2 for O, 3 for T/S/Z/J/L, 4 for I).
    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn rows(&self) -> Matrix {
        self.0
    }

    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.0
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&cell| cell != 0)
    }

    /// Offsets `(x, y)` of the occupied cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> {
        let rows = self.0;
        rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell != 0)
                .map(move |(x, _)| (x as i16, y as i16))
        })
    }

    /// Number of fully empty rows above the first occupied one.
    pub fn top_padding(&self) -> usize {
        self.0
            .iter()
            .take_while(|row| row.iter().all(|&cell| cell == 0))
            .count()
    }
}

/// Catalog lookup. `rotation` is taken modulo 4.
pub fn shape(kind: PieceKind, rotation: u8) -> Shape {
    Shape(kind.rotations()[usize::from(rotation % 4)])
}

const I_ROTATIONS: [Matrix; 4] = [
    &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
    &[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]],
    &[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]],
    &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
];

const O_ROTATIONS: [Matrix; 4] = [
    &[&[1, 1], &[1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[1, 1], &[1, 1]],
    &[&[1, 1], &[1, 1]],
];

const T_ROTATIONS: [Matrix; 4] = [
    &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 1], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
    &[&[0, 1, 0], &[1, 1, 0], &[0, 1, 0]],
];

const S_ROTATIONS: [Matrix; 4] = [
    &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 1], &[0, 0, 1]],
    &[&[0, 0, 0], &[0, 1, 1], &[1, 1, 0]],
    &[&[1, 0, 0], &[1, 1, 0], &[0, 1, 0]],
];

const Z_ROTATIONS: [Matrix; 4] = [
    &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
    &[&[0, 0, 1], &[0, 1, 1], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 0], &[0, 1, 1]],
    &[&[0, 1, 0], &[1, 1, 0], &[1, 0, 0]],
];

const J_ROTATIONS: [Matrix; 4] = [
    &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 1], &[0, 0, 1]],
    &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
];

const L_ROTATIONS: [Matrix; 4] = [
    &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
    &[&[0, 0, 0], &[1, 1, 1], &[1, 0, 0]],
    &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 0]],
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Clockwise quarter turn of a square matrix.
    fn turn_clockwise(rows: Matrix) -> Vec<Vec<u8>> {
        let n = rows.len();
        let mut out = vec![vec![0; n]; n];
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                out[x][n - 1 - y] = cell;
            }
        }
        out
    }

    #[test]
    fn every_state_is_square_with_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                let s = shape(kind, rotation);
                assert!((2..=4).contains(&s.size()), "{kind} r{rotation}");
                assert!(s.rows().iter().all(|row| row.len() == s.size()));
                assert_eq!(s.cells().count(), 4, "{kind} r{rotation}");
            }
        }
    }

    #[test]
    fn next_state_is_clockwise_turn_of_previous() {
        for kind in PieceKind::ALL {
            for rotation in 0..4u8 {
                let expected = turn_clockwise(shape(kind, rotation).rows());
                let actual: Vec<Vec<u8>> = shape(kind, rotation + 1)
                    .rows()
                    .iter()
                    .map(|row| row.to_vec())
                    .collect();
                assert_eq!(actual, expected, "{kind} r{rotation} -> r{}", rotation + 1);
            }
        }
    }

    #[test]
    fn o_states_are_identical() {
        let first = shape(PieceKind::O, 0);
        for rotation in 1..4 {
            assert_eq!(shape(PieceKind::O, rotation), first);
        }
    }

    #[test]
    fn top_padding_counts_leading_empty_rows() {
        assert_eq!(shape(PieceKind::I, 0).top_padding(), 1);
        assert_eq!(shape(PieceKind::I, 2).top_padding(), 2);
        assert_eq!(shape(PieceKind::T, 0).top_padding(), 0);
        assert_eq!(shape(PieceKind::T, 2).top_padding(), 1);
        assert_eq!(shape(PieceKind::O, 0).top_padding(), 0);
    }

    #[test]
    fn rotation_index_wraps() {
        assert_eq!(shape(PieceKind::T, 5), shape(PieceKind::T, 1));
    }

    #[test]
    fn kind_parses_from_text() {
        assert_eq!("t".parse::<PieceKind>(), Ok(PieceKind::T));
        assert_eq!(" L ".parse::<PieceKind>(), Ok(PieceKind::L));
        assert_eq!("X".parse::<PieceKind>(), Err(Error::UnknownPieceKind('X')));
        assert!("IO".parse::<PieceKind>().is_err());
    }
}
