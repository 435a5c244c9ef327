//! The falling piece: spawning, moving and kicked rotation.

use crate::board::Board;
use crate::config::BOARD_WIDTH;
use crate::shapes::{shape, PieceKind, Shape};

/// Horizontal offsets tried, in order, when a rotation does not fit in place.
pub const KICK_OFFSETS: [i16; 5] = [0, -1, 1, -2, 2];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    fn apply(self, rotation: u8) -> u8 {
        match self {
            RotationDirection::Clockwise => (rotation + 1) % 4,
            RotationDirection::CounterClockwise => (rotation + 3) % 4,
        }
    }
}

/// The falling piece.
///
/// Its matrix is always the catalog entry for `(kind, rotation)`; only the
/// rotation and the origin of the matrix's top-left corner change while it
/// falls. `y` is negative while the piece pokes out above the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    kind: PieceKind,
    rotation: u8,
    position: Position,
}

impl ActivePiece {
    /// Places `kind` in rotation 0, centred horizontally, with its first
    /// occupied row on board row 0.
    pub fn spawn(kind: PieceKind) -> Self {
        let matrix = shape(kind, 0);
        let x = (BOARD_WIDTH - matrix.size()) / 2;
        Self {
            kind,
            rotation: 0,
            position: Position {
                x: x as i16,
                y: -(matrix.top_padding() as i16),
            },
        }
    }

    pub fn at(kind: PieceKind, rotation: u8, x: i16, y: i16) -> Self {
        Self {
            kind,
            rotation: rotation % 4,
            position: Position { x, y },
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn shape(&self) -> Shape {
        shape(self.kind, self.rotation)
    }

    /// Board coordinates of the occupied cells.
    pub fn blocks(&self) -> impl Iterator<Item = Position> {
        let origin = self.position;
        self.shape().cells().map(move |(dx, dy)| Position {
            x: origin.x + dx,
            y: origin.y + dy,
        })
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(self.shape(), self.position.x, self.position.y)
    }

    /// Shifts the piece by `(dx, dy)` if the destination is free.
    pub fn try_move(&mut self, board: &Board, dx: i16, dy: i16) -> bool {
        let (x, y) = (self.position.x + dx, self.position.y + dy);
        if board.collides(self.shape(), x, y) {
            return false;
        }
        self.position = Position { x, y };
        true
    }

    /// Turns the piece, trying each of [`KICK_OFFSETS`] at the current row.
    ///
    /// Returns the offset that was applied, or `None` if every candidate
    /// collides, in which case the piece is left untouched.
    pub fn try_rotate(&mut self, board: &Board, direction: RotationDirection) -> Option<i16> {
        let rotation = direction.apply(self.rotation);
        let rotated = shape(self.kind, rotation);

        let kick = KICK_OFFSETS
            .into_iter()
            .find(|&dx| !board.collides(rotated, self.position.x + dx, self.position.y))?;

        self.rotation = rotation;
        self.position.x += kick;
        Some(kick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_centres_and_hides_padding_rows() {
        let o = ActivePiece::spawn(PieceKind::O);
        assert_eq!(o.position(), Position { x: 4, y: 0 });

        let t = ActivePiece::spawn(PieceKind::T);
        assert_eq!(t.position(), Position { x: 3, y: 0 });

        let i = ActivePiece::spawn(PieceKind::I);
        assert_eq!(i.position(), Position { x: 3, y: -1 });
        assert!(i.blocks().all(|block| block.y == 0));
    }

    #[test]
    fn counter_clockwise_is_three_clockwise_turns() {
        let board = Board::new();
        let mut ccw = ActivePiece::at(PieceKind::L, 0, 4, 5);
        let mut cw = ccw;

        ccw.try_rotate(&board, RotationDirection::CounterClockwise);
        for _ in 0..3 {
            cw.try_rotate(&board, RotationDirection::Clockwise);
        }

        assert_eq!(ccw, cw);
        assert_eq!(ccw.rotation(), 3);
    }

    #[test]
    fn blocked_move_leaves_piece_in_place() {
        let board = Board::new();
        let mut piece = ActivePiece::at(PieceKind::O, 0, 0, 18);
        let before = piece;

        assert!(!piece.try_move(&board, 0, 1));
        assert!(!piece.try_move(&board, -1, 0));
        assert_eq!(piece, before);
    }
}
