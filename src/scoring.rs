//! Score, level and gravity speed, derived from cleared-row counts.

use crate::config::{
    BASE_DROP_MS, DROP_DECREASE_PER_LEVEL_MS, LINES_PER_LEVEL, MIN_DROP_MS, SCORE_DOUBLE,
    SCORE_SINGLE, SCORE_TETRIS, SCORE_TRIPLE,
};

/// Points for clearing `cleared` rows at once, scaled by `level` (at least 1).
/// Counts outside 1..=4 score nothing.
pub fn line_clear_points(cleared: u32, level: u32) -> u32 {
    let base = match cleared {
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        4 => SCORE_TETRIS,
        _ => 0,
    };
    base.saturating_mul(level.max(1))
}

/// Level reached after `lines` cleared rows; starts at 1.
pub fn level_for_lines(lines: u32) -> u32 {
    1 + lines / LINES_PER_LEVEL
}

/// Gravity interval for `level`: 800ms at level 1, 60ms faster per level,
/// never below 120ms.
pub fn drop_interval_ms(level: u32) -> u64 {
    let speed_up = u64::from(level.saturating_sub(1)) * DROP_DECREASE_PER_LEVEL_MS;
    BASE_DROP_MS.saturating_sub(speed_up).max(MIN_DROP_MS)
}
