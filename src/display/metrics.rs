// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layout metrics derived from terminal geometry.
//!
//! Measuring is pure so it can be tested without a terminal; the renderer
//! caches the height and only re-measures when it changes or the dirty bit
//! is set, which keeps per-frame syscalls off the hot path.

pub const SEPARATOR_LENGTH: usize = 60;
pub const MAX_PREVIEW_LENGTH: usize = 80;
pub const MIN_LINES_PER_RESULT: usize = 3;
pub const MIN_VISIBLE_RESULTS: usize = 2;

const HEADER_LINES: usize = 3;
const FOOTER_LINES: usize = 3;

/// Cacheable facts about how much fits on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub terminal_height: usize,
    pub header_lines: usize,
    pub footer_lines: usize,
    pub available_lines: usize,
    pub lines_per_result: usize,
    pub max_visible_results: usize,
    pub dirty: bool,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            terminal_height: 0,
            header_lines: 0,
            footer_lines: 0,
            available_lines: 0,
            lines_per_result: MIN_LINES_PER_RESULT,
            max_visible_results: 0,
            dirty: true,
        }
    }
}

/// Recomputes layout facts for `current_height`, reusing `old` when it is
/// clean and the height is unchanged.
pub fn measure(current_height: usize, old: &DisplayMetrics) -> DisplayMetrics {
    if !old.dirty && old.terminal_height == current_height && current_height > 0 {
        return old.clone();
    }

    let min_space = MIN_VISIBLE_RESULTS * MIN_LINES_PER_RESULT;
    let mut metrics = DisplayMetrics {
        terminal_height: current_height,
        header_lines: HEADER_LINES,
        footer_lines: FOOTER_LINES,
        lines_per_result: MIN_LINES_PER_RESULT,
        available_lines: min_space,
        max_visible_results: MIN_VISIBLE_RESULTS,
        dirty: false,
    };

    // Tiny terminals keep the fallback minimums set above.
    if current_height > HEADER_LINES + FOOTER_LINES + min_space {
        let used = HEADER_LINES + FOOTER_LINES;
        metrics.available_lines = current_height - used;
        metrics.max_visible_results =
            (metrics.available_lines / metrics.lines_per_result).max(MIN_VISIBLE_RESULTS);
    }

    metrics
}
