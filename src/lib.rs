//! Falling-block puzzle engine.
//!
//! The engine owns the grid, the active piece, the 7-bag randomizer and the
//! score/level/drop-speed counters. Rendering and input live outside of it and
//! talk to [`game::Game`] through its query and command methods.

pub mod bag;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod piece;
pub mod scoring;
pub mod shapes;

pub use bag::{Bag, PieceSource, SequenceSource};
pub use board::{Board, Cell};
pub use error::{Error, Result};
pub use game::{Game, GameEvent, GameState};
pub use piece::{ActivePiece, Position, RotationDirection};
pub use shapes::{PieceKind, Shape};
