// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering: layout metrics derived from terminal geometry, and
//! the frame renderer that turns a search snapshot plus scroll/selection
//! state into ANSI output.

pub mod metrics;
pub mod render;

pub use metrics::DisplayMetrics;
pub use render::DisplayEngine;

/// Scroll/selection bookkeeping. Written only by the dispatch thread.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub scroll_offset: usize,
    /// -1 when nothing is highlighted.
    pub selected_index: i32,
    pub metrics: DisplayMetrics,
    pub last_terminal_height: usize,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            selected_index: -1,
            metrics: DisplayMetrics::default(),
            last_terminal_height: 0,
        }
    }
}
