// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame rendering.
//!
//! A frame is header (query line, completion hint, separator), up to
//! `max_visible_results` result rows starting at the scroll offset, and a
//! footer with the visible range and key bindings. Frames use `\r\n` line
//! endings because raw mode disables output post-processing.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::Colorize;

use super::metrics::{self, DisplayMetrics, SEPARATOR_LENGTH};
use super::DisplayState;
use crate::errors::exit;
use crate::search::{SearchCore, SearchResult};

/// How long a measured terminal height stays trusted.
const HEIGHT_CACHE: Duration = Duration::from_millis(500);

pub struct DisplayEngine {
    core: Arc<SearchCore>,
    preview_length: usize,
    cached_height: usize,
    last_height_check: Option<Instant>,
}

impl DisplayEngine {
    pub fn new(core: Arc<SearchCore>, preview_length: usize) -> Self {
        Self {
            core,
            preview_length,
            cached_height: 0,
            last_height_check: None,
        }
    }

    fn terminal_height_cached(&mut self) -> usize {
        let now = Instant::now();
        let stale = self
            .last_height_check
            .map_or(true, |checked| now.duration_since(checked) > HEIGHT_CACHE);
        if self.cached_height == 0 || stale {
            self.cached_height = crossterm::terminal::size()
                .map(|(_cols, rows)| rows as usize)
                .unwrap_or(0);
            self.last_height_check = Some(now);
        }
        self.cached_height
    }

    /// Renders the current snapshot and updates the cached metrics in
    /// `state`. Render failures are absorbed; a dropped frame is repainted
    /// on the next command anyway.
    pub fn render(&mut self, state: &mut DisplayState) {
        let current_height = self.terminal_height_cached();
        if state.last_terminal_height != current_height {
            state.last_terminal_height = current_height;
            state.metrics.dirty = true;
        }
        let metrics = metrics::measure(current_height, &state.metrics);

        let frame = self.render_frame(state, &metrics);
        state.metrics = metrics;

        let mut out = io::stdout();
        let _ = out.write_all(frame.as_bytes());
        let _ = out.flush();
    }

    /// Builds one complete frame. Pure given a snapshot and metrics, so
    /// tests can exercise layout without a terminal.
    pub fn render_frame(&self, state: &DisplayState, metrics: &DisplayMetrics) -> String {
        let mut buf = String::new();
        buf.push_str("\x1b[2J\x1b[H"); // clear screen and home

        let query = self.core.query();
        let results = self.core.results();
        let completions = self.core.completions();

        self.render_header(&mut buf, &query, &completions);

        if results.is_empty() {
            if !query.is_empty() {
                buf.push_str("No matches found.\r\n");
            }
            return buf;
        }

        let display_count = metrics
            .max_visible_results
            .min(results.len().saturating_sub(state.scroll_offset));

        for i in 0..display_count {
            let idx = state.scroll_offset + i;
            let Some(result) = results.get(idx) else {
                break;
            };
            let selected = idx as i32 == state.selected_index;
            self.render_result(&mut buf, result, idx, selected);
        }

        self.render_footer(&mut buf, state.scroll_offset, display_count, results.len());
        buf
    }

    fn render_header(&self, buf: &mut String, query: &str, completions: &[String]) {
        buf.push_str(&format!(
            "{}{}{}\r\n",
            "Search: ".bold().cyan(),
            query,
            "_".cyan()
        ));

        if !completions.is_empty() && !query.is_empty() {
            if let Some(hint) = self.core.completion() {
                // Show only the trailing word being completed, not the
                // already-typed leading portion.
                let preview = match query.rfind([' ', '\t']) {
                    None => hint,
                    Some(idx) if idx + 1 < hint.len() => hint[idx + 1..].to_string(),
                    Some(_) => String::new(),
                };

                if !preview.is_empty() {
                    buf.push_str(&format!("{}{}", "Tab: ".dimmed(), preview.green()));
                    if completions.len() > 1 {
                        buf.push_str(&format!(
                            " {}{}{}",
                            "(".bright_black(),
                            format!("{} completions", completions.len()).yellow(),
                            ")".bright_black()
                        ));
                    }
                    buf.push_str("\r\n");
                }
            }
        }

        buf.push_str(&format!(
            "{}\r\n",
            "=".repeat(SEPARATOR_LENGTH).bright_black()
        ));
    }

    fn render_result(
        &self,
        buf: &mut String,
        result: &SearchResult,
        display_index: usize,
        selected: bool,
    ) {
        // A stale selection can point past a freshly-published smaller
        // snapshot; skip rather than report.
        let Some(entry) = self.core.entry(result.index) else {
            return;
        };

        let score_part = format!("(score: {})", result.score);
        if selected {
            let line = format!("> [{}] {} {}", display_index + 1, entry.key, score_part);
            buf.push_str(&format!("{}\r\n", line.white().on_blue().bold()));
        } else {
            buf.push_str(&format!(
                "  {}{}{} {} {}\r\n",
                "[".bold(),
                (display_index + 1).to_string().bold(),
                "]".bold(),
                entry.key,
                score_part.dimmed()
            ));
        }

        let preview = if entry.content.len() > self.preview_length {
            let mut cut = self.preview_length.saturating_sub(3);
            while !entry.content.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &entry.content[..cut])
        } else {
            entry.content.clone()
        };
        buf.push_str(&format!("    {preview}\r\n\r\n"));
    }

    fn render_footer(
        &self,
        buf: &mut String,
        scroll_offset: usize,
        display_count: usize,
        total_results: usize,
    ) {
        buf.push_str("\r\n");
        buf.push_str(&format!(
            "{}\r\n",
            format!(
                "Showing {}-{} of {} results",
                scroll_offset + 1,
                scroll_offset + display_count,
                total_results
            )
            .bold()
            .cyan()
        ));
        buf.push_str(&format!(
            "{}\r\n",
            "Up/Down: Select | PgUp/PgDn: Scroll | Enter: Confirm | Tab: Complete | Esc: Cancel"
                .dimmed()
        ));
    }

    /// Confirms the result row at `index`: prints the picked entry and
    /// returns its entry index capped to the exit-code range. `None` when
    /// the index is out of range of the current snapshot.
    pub fn select(&self, index: i32) -> Option<i32> {
        if index < 0 {
            return None;
        }
        let results = self.core.results();
        let result = results.get(index as usize)?;
        let entry = self.core.entry(result.index)?;

        print!("\r\n\r\nSelected: {}\r\n{}\r\n", entry.key, entry.content);
        let _ = io::stdout().flush();

        Some((result.index as i32).min(exit::MAX_ENTRY_CODE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Entry;
    use crate::search::DEFAULT_MAX_RESULTS;

    fn engine() -> DisplayEngine {
        // Frame assertions match on plain text.
        colored::control::set_override(false);
        let core = Arc::new(SearchCore::new(
            vec![
                Entry::new("DOOM", "Doom 1993 id Software"),
                Entry::new("DOOM2", "Doom II 1994 id Software"),
            ],
            DEFAULT_MAX_RESULTS,
        ));
        core.run_search_pass();
        DisplayEngine::new(core, metrics::MAX_PREVIEW_LENGTH)
    }

    fn fixed_metrics() -> DisplayMetrics {
        metrics::measure(30, &DisplayMetrics::default())
    }

    #[test]
    fn frame_lists_visible_results_with_one_based_indexes() {
        let engine = engine();
        let state = DisplayState::default();
        let frame = engine.render_frame(&state, &fixed_metrics());

        assert!(frame.contains("DOOM"));
        assert!(frame.contains("DOOM2"));
        assert!(frame.contains("[1]"));
        assert!(frame.contains("[2]"));
        assert!(frame.contains("Showing 1-2 of 2 results"));
    }

    #[test]
    fn selected_row_carries_the_marker() {
        let engine = engine();
        let state = DisplayState {
            selected_index: 0,
            ..DisplayState::default()
        };
        let frame = engine.render_frame(&state, &fixed_metrics());
        assert!(frame.contains("> [1]"));
    }

    #[test]
    fn no_match_message_only_with_a_nonempty_query() {
        colored::control::set_override(false);
        let core = Arc::new(SearchCore::new(
            vec![Entry::new("DOOM", "Doom 1993")],
            DEFAULT_MAX_RESULTS,
        ));
        core.update_query("xyz");
        core.run_search_pass();
        let engine = DisplayEngine::new(core, metrics::MAX_PREVIEW_LENGTH);

        let frame = engine.render_frame(&DisplayState::default(), &fixed_metrics());
        assert!(frame.contains("No matches found."));
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        colored::control::set_override(false);
        let long = "x".repeat(200);
        let core = Arc::new(SearchCore::new(
            vec![Entry::new("LONG", format!("LONG {long}"))],
            DEFAULT_MAX_RESULTS,
        ));
        core.run_search_pass();
        let engine = DisplayEngine::new(core, 40);

        let frame = engine.render_frame(&DisplayState::default(), &fixed_metrics());
        assert!(frame.contains("..."));
        assert!(!frame.contains(&long));
    }

    #[test]
    fn scroll_offset_windows_the_results() {
        colored::control::set_override(false);
        let entries = (0..20)
            .map(|i| Entry::new(format!("KEY{i:02}"), format!("Game {i:02}")))
            .collect();
        let core = Arc::new(SearchCore::new(entries, DEFAULT_MAX_RESULTS));
        core.run_search_pass();
        let engine = DisplayEngine::new(core, metrics::MAX_PREVIEW_LENGTH);

        let state = DisplayState {
            scroll_offset: 10,
            ..DisplayState::default()
        };
        let m = fixed_metrics(); // 8 visible rows at height 30
        let frame = engine.render_frame(&state, &m);
        assert!(frame.contains("[11]"));
        assert!(frame.contains("Showing 11-18 of 20 results"));
        assert!(!frame.contains("[1] "));
    }

    #[test]
    fn select_returns_capped_entry_index() {
        let engine = engine();
        // Row 0 of the empty-query result set, ordered by content tie-break.
        let code = engine.select(0).unwrap();
        assert!(code >= 0 && code <= exit::MAX_ENTRY_CODE);
        assert!(engine.select(-1).is_none());
        assert!(engine.select(99).is_none());
    }

    #[test]
    fn completion_hint_appears_in_header() {
        colored::control::set_override(false);
        let core = Arc::new(SearchCore::new(
            vec![
                Entry::new("DOOM", "Doom 1993"),
                Entry::new("DOOM2", "Doom II 1994"),
            ],
            DEFAULT_MAX_RESULTS,
        ));
        core.update_query("doo");
        core.run_search_pass();
        let engine = DisplayEngine::new(core, metrics::MAX_PREVIEW_LENGTH);

        let frame = engine.render_frame(&DisplayState::default(), &fixed_metrics());
        assert!(frame.contains("Tab:"));
        assert!(frame.contains("DOOM"));
    }
}
