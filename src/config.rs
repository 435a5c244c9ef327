// ============================================================================
// Board
// ============================================================================

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// ============================================================================
// Timing (in milliseconds)
// ============================================================================

pub const BASE_DROP_MS: u64 = 800;
pub const MIN_DROP_MS: u64 = 120;
pub const DROP_DECREASE_PER_LEVEL_MS: u64 = 60;
pub const LINES_PER_LEVEL: u32 = 10;

// ============================================================================
// Scoring
// ============================================================================

pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;
