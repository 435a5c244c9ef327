//! Piece sources: the 7-bag randomizer and a scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shapes::PieceKind;

/// Supplies piece kinds to a [`crate::Game`].
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;

    /// Forget any buffered kinds. Called when a new game starts.
    fn reset(&mut self) {}
}

/// 7-bag randomizer.
///
/// Holds between 0 and 7 distinct kinds. When a draw finds the bag empty, a
/// fresh permutation of all seven kinds is made and drawn from the end, so
/// every aligned run of 7 draws yields each kind exactly once.
#[derive(Debug, Clone)]
pub struct Bag<R = StdRng> {
    bag: Vec<PieceKind>,
    rng: R,
}

impl Bag<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible bag, used for `--seed` and in tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Bag<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Bag<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            bag: Vec::with_capacity(PieceKind::ALL.len()),
            rng,
        }
    }

    /// Kinds still in the current bag; the last one is drawn next.
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag
    }
}

impl<R: Rng> PieceSource for Bag<R> {
    fn next_kind(&mut self) -> PieceKind {
        if let Some(kind) = self.bag.pop() {
            return kind;
        }

        let mut fresh = PieceKind::ALL;
        shuffle(&mut self.rng, &mut fresh);
        tracing::debug!(bag = ?fresh, "refilled piece bag");

        let [rest @ .., last] = fresh;
        self.bag.extend_from_slice(&rest);
        last
    }

    fn reset(&mut self) {
        self.bag.clear();
    }
}

/// Fisher-Yates: for i from the last index down to 1, swap i with a uniform
/// index in 0..=i.
fn shuffle<R: Rng, T>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Replays a fixed list of kinds, wrapping around at the end.
pub struct SequenceSource {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequenceSource {
    /// # Panics
    ///
    /// If `pieces` is empty.
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        assert!(!pieces.is_empty(), "sequence source needs at least one piece");
        Self { pieces, index: 0 }
    }
}

impl PieceSource for SequenceSource {
    fn next_kind(&mut self) -> PieceKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}
