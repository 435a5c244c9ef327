//! The game session: piece lifecycle, scoring and the gravity clock.

use crate::bag::{Bag, PieceSource};
use crate::board::{Board, Cell, Row};
use crate::config::BOARD_HEIGHT;
use crate::piece::{ActivePiece, RotationDirection};
use crate::scoring::{drop_interval_ms, level_for_lines, line_clear_points};
use crate::shapes::PieceKind;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Resumed,
    NewGame,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

/// One game session: spawn, fall, lock, clear, score, respawn.
///
/// The session is the only owner of the board and the active piece. Callers
/// read them through the query methods and drive play with the command
/// methods and [`Game::advance`].
pub struct Game {
    board: Board,
    current: ActivePiece,
    next: PieceKind,
    score: u32,
    lines_cleared: u32,
    level: u32,
    drop_interval_ms: u64,
    drop_timer_ms: u64,
    state: GameState,
    source: Box<dyn PieceSource>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Starts a game fed by an entropy-seeded 7-bag.
    pub fn new() -> Self {
        Self::with_source(Box::new(Bag::new()))
    }

    /// Starts a game with a reproducible 7-bag.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(Box::new(Bag::seeded(seed)))
    }

    pub fn with_source(source: Box<dyn PieceSource>) -> Self {
        Self::with_board(Board::new(), source)
    }

    /// Starts a game on a pre-filled board. The first piece is spawned
    /// against `board`, so a board filled up to the spawn rows starts out
    /// in [`GameState::GameOver`].
    pub fn with_board(board: Board, source: Box<dyn PieceSource>) -> Self {
        let mut game = Self {
            board: Board::new(),
            current: ActivePiece::spawn(PieceKind::O),
            next: PieceKind::O,
            score: 0,
            lines_cleared: 0,
            level: 1,
            drop_interval_ms: drop_interval_ms(1),
            drop_timer_ms: 0,
            state: GameState::Playing,
            source,
            events: Vec::new(),
        };
        game.start(board);
        game
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &ActivePiece {
        &self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    /// Time accumulated towards the next gravity step.
    pub fn pending_drop_ms(&self) -> u64 {
        self.drop_timer_ms
    }

    /// The board with the active piece drawn over it. Cells of the piece that
    /// are above the visible area are left out.
    pub fn visible_cells(&self) -> [Row; BOARD_HEIGHT] {
        let mut cells = *self.board.rows();
        let cell = Cell::Filled(self.current.kind());
        for block in self.current.blocks() {
            if let (Ok(x), Ok(y)) = (usize::try_from(block.x), usize::try_from(block.y)) {
                if let Some(slot) = cells.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *slot = cell;
                }
            }
        }
        cells
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Throws the current game away and starts over on an empty board.
    /// Accepted in every state.
    pub fn new_game(&mut self) {
        self.start(Board::new());
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
                tracing::debug!(pending_ms = self.drop_timer_ms, "paused");
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.events.push(GameEvent::Resumed);
                tracing::debug!(pending_ms = self.drop_timer_ms, "resumed");
            }
            GameState::GameOver => {}
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    /// One gravity step right now, independent of the drop timer. Returns
    /// true if the piece moved down, false if it locked (or play is halted).
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.gravity_step()
    }

    /// Rotates clockwise.
    pub fn rotate(&mut self) -> bool {
        self.rotate_towards(RotationDirection::Clockwise)
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.rotate_towards(RotationDirection::CounterClockwise)
    }

    /// Feeds `elapsed_ms` of real time to the gravity clock and runs one
    /// gravity step per full drop interval accumulated. Leftover time carries
    /// over to the next call. Returns the number of steps taken.
    ///
    /// The clock only runs while playing; a paused game keeps its partial
    /// interval and continues from it on resume.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        if self.state != GameState::Playing {
            return 0;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        let mut steps = 0;
        while self.state == GameState::Playing && self.drop_timer_ms >= self.drop_interval_ms {
            self.drop_timer_ms -= self.drop_interval_ms;
            self.gravity_step();
            steps += 1;
        }
        steps
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn start(&mut self, board: Board) {
        self.board = board;
        self.score = 0;
        self.lines_cleared = 0;
        self.level = 1;
        self.drop_interval_ms = drop_interval_ms(self.level);
        self.drop_timer_ms = 0;
        self.state = GameState::Playing;
        self.events.clear();

        self.source.reset();
        self.next = self.source.next_kind();
        self.events.push(GameEvent::NewGame);
        tracing::info!("new game");

        self.spawn_next();
    }

    fn shift(&mut self, dx: i16) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let moved = self.current.try_move(&self.board, dx, 0);
        if moved {
            self.events.push(GameEvent::PieceMoved);
            tracing::trace!(x = self.current.position().x, "shifted");
        }
        moved
    }

    fn rotate_towards(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        match self.current.try_rotate(&self.board, direction) {
            Some(kick) => {
                self.events.push(GameEvent::PieceRotated);
                tracing::trace!(
                    ?direction,
                    rotation = self.current.rotation(),
                    kick,
                    "rotated"
                );
                true
            }
            None => false,
        }
    }

    /// Moves the piece down a row, or locks it and moves on to the next one.
    fn gravity_step(&mut self) -> bool {
        if self.current.try_move(&self.board, 0, 1) {
            self.events.push(GameEvent::PieceMoved);
            return true;
        }
        self.lock_and_spawn();
        false
    }

    fn lock_and_spawn(&mut self) {
        self.board.merge(&self.current);
        self.events.push(GameEvent::PieceLocked);
        tracing::debug!(
            kind = %self.current.kind(),
            x = self.current.position().x,
            y = self.current.position().y,
            "piece locked"
        );

        let cleared = self.board.sweep_lines();
        if cleared > 0 {
            self.apply_clear(cleared);
        }
        self.spawn_next();
    }

    fn apply_clear(&mut self, cleared: u32) {
        self.score = self
            .score
            .saturating_add(line_clear_points(cleared, self.level));
        self.lines_cleared += cleared;
        self.events.push(GameEvent::LinesCleared(cleared));
        tracing::debug!(cleared, score = self.score, "lines cleared");

        let level = level_for_lines(self.lines_cleared);
        if level > self.level {
            self.level = level;
            self.drop_interval_ms = drop_interval_ms(level);
            self.events.push(GameEvent::LevelUp(level));
            tracing::info!(level, interval_ms = self.drop_interval_ms, "level up");
        }
    }

    /// Promotes the held kind to the active piece and draws a new one.
    fn spawn_next(&mut self) {
        let kind = std::mem::replace(&mut self.next, self.source.next_kind());
        self.current = ActivePiece::spawn(kind);

        if self.current.collides(&self.board) {
            self.state = GameState::GameOver;
            self.drop_timer_ms = 0;
            self.events.push(GameEvent::GameOver);
            tracing::info!(
                score = self.score,
                lines = self.lines_cleared,
                level = self.level,
                "game over"
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::bag::SequenceSource;
    use crate::config::BOARD_WIDTH;

    /// Game whose pieces repeat `kinds` in order.
    pub fn scripted_game(kinds: &[PieceKind]) -> Game {
        Game::with_source(Box::new(SequenceSource::new(kinds.to_vec())))
    }

    pub fn scripted_game_on(board: Board, kinds: &[PieceKind]) -> Game {
        Game::with_board(board, Box::new(SequenceSource::new(kinds.to_vec())))
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..BOARD_WIDTH {
            board.set(x as i16, y as i16, Cell::Filled(PieceKind::T));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..BOARD_WIDTH {
            if x != gap_x {
                board.set(x as i16, y as i16, Cell::Filled(PieceKind::T));
            }
        }
    }

    /// Soft-drops until the current piece locks.
    pub fn drop_until_locked(game: &mut Game) {
        while game.soft_drop() {}
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn single_clear_at_level_one_scores_100() {
        let mut game = scripted_game(&[PieceKind::O]);
        game.apply_clear(1);
        assert_eq!(game.score(), 100);
        assert_eq!(game.lines_cleared(), 1);
    }

    #[test]
    fn tetris_at_level_three_scores_2400() {
        let mut game = scripted_game(&[PieceKind::O]);
        game.level = 3;
        game.lines_cleared = 20;
        game.apply_clear(4);
        assert_eq!(game.score(), 2400);
        assert_eq!(game.level(), 3);
    }

    #[test]
    fn ten_lines_reach_level_two() {
        let mut game = scripted_game(&[PieceKind::O]);
        for _ in 0..9 {
            game.apply_clear(1);
        }
        assert_eq!(game.level(), 1);
        assert_eq!(game.drop_interval_ms(), 800);

        game.apply_clear(1);
        assert_eq!(game.level(), 2);
        assert_eq!(game.drop_interval_ms(), 740);
        assert!(game.take_events().contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn interval_floors_at_120_lines() {
        let mut game = scripted_game(&[PieceKind::O]);
        for _ in 0..30 {
            game.apply_clear(4);
        }
        assert_eq!(game.lines_cleared(), 120);
        assert_eq!(game.level(), 13);
        assert_eq!(game.drop_interval_ms(), 120);
    }

    #[test]
    fn level_up_applies_to_later_clears() {
        let mut game = scripted_game(&[PieceKind::O]);
        game.apply_clear(4);
        game.apply_clear(4);
        // The clear that crosses ten lines still scores at level 1.
        game.apply_clear(2);
        assert_eq!(game.score(), 800 + 800 + 300);
        assert_eq!(game.level(), 2);

        game.apply_clear(1);
        assert_eq!(game.score(), 1900 + 100 * 2);
    }

    #[test]
    fn advance_uses_current_level_interval() {
        let mut game = scripted_game(&[PieceKind::I]);
        game.level = 2;
        game.drop_interval_ms = 740;
        assert_eq!(game.advance(740 * 3), 3);
        assert_eq!(game.pending_drop_ms(), 0);
    }

    #[test]
    fn level_up_inside_advance_speeds_up_remaining_steps() {
        let mut board = Board::new();
        fill_row_with_gap(&mut board, BOARD_HEIGHT - 1, 9);
        let mut game = scripted_game_on(board, &[PieceKind::I]);
        game.lines_cleared = 9;
        // Vertical I in column 9, one row above the gap.
        game.current = ActivePiece::at(PieceKind::I, 1, 7, 15);
        game.take_events();

        // 800 to fall, 800 to lock and clear, then two 740 steps and 100 left.
        assert_eq!(game.advance(800 + 800 + 740 * 2 + 100), 4);
        assert_eq!(game.pending_drop_ms(), 100);
        assert_eq!(game.lines_cleared(), 10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 100);
        assert_eq!(game.drop_interval_ms(), 740);
        assert!(game.take_events().contains(&GameEvent::LevelUp(2)));
        assert_eq!(game.current_piece().position().y, 1);
    }
}
