// SPDX-License-Identifier: MIT OR Apache-2.0

//! The concurrent search core.
//!
//! Owns the entry store, the current query, and the two published outputs
//! (ranked results and completion candidates). A background worker wakes on
//! a short tick; when the query has changed since the last pass it re-scores
//! every entry against the query captured at the start of the pass and
//! atomically exchanges both outputs. Edits arriving mid-pass re-arm the
//! dirty flag, so fast typing coalesces into one pass per tick instead of
//! one per keystroke.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arc_swap::ArcSwap;
use tracing::debug;

use super::{completion, score};
use crate::catalog::{tokenize, Entry};
use crate::command::{Command, CommandSender};

/// Scorer wake interval.
pub const SEARCH_TICK: Duration = Duration::from_millis(30);

/// Ranked results kept per pass; bounds list growth on queries that match
/// nearly everything (an empty query over a huge catalog, say).
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

/// One ranked hit; regenerated wholesale on every pass, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub index: usize,
    pub score: i32,
}

pub struct SearchCore {
    entries: Vec<Entry>,
    results: ArcSwap<Vec<SearchResult>>,
    completions: ArcSwap<Vec<String>>,
    query: ArcSwap<String>,
    search_needed: AtomicBool,
    max_results: usize,
}

impl SearchCore {
    pub fn new(entries: Vec<Entry>, max_results: usize) -> Self {
        Self {
            entries,
            results: ArcSwap::from_pointee(Vec::new()),
            completions: ArcSwap::from_pointee(Vec::new()),
            query: ArcSwap::from_pointee(String::new()),
            search_needed: AtomicBool::new(false),
            max_results,
        }
    }

    /// Stores the query and arms the dirty flag. Last writer wins; the next
    /// pass picks up whatever is current when it starts.
    pub fn update_query(&self, query: &str) {
        self.query.store(Arc::new(query.to_string()));
        self.search_needed.store(true, Ordering::Release);
    }

    pub fn query(&self) -> Arc<String> {
        self.query.load_full()
    }

    /// Snapshot of the current ranked results. The returned handle stays
    /// valid even if the worker publishes a replacement mid-read.
    pub fn results(&self) -> Arc<Vec<SearchResult>> {
        self.results.load_full()
    }

    pub fn completions(&self) -> Arc<Vec<String>> {
        self.completions.load_full()
    }

    /// The single actionable completion for the current query, if any.
    pub fn completion(&self) -> Option<String> {
        let completions = self.completions.load_full();
        let query = self.query.load_full();
        completion::best_completion(&query, &completions)
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// One full scoring pass against the query captured at entry: score,
    /// filter zeroes, sort by (score desc, content asc), truncate to the
    /// cap, then publish results and completions by exchange.
    pub fn run_search_pass(&self) {
        let query = self.query.load_full();
        let tokens = tokenize(&query);

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let s = score::score_tokens(entry, &tokens);
                (s > score::weight::NONE).then_some(SearchResult { index, score: s })
            })
            .collect();

        // Lexicographic content tie-break keeps paging reproducible across
        // re-renders of an unchanged result set.
        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| self.entries[a.index].content.cmp(&self.entries[b.index].content))
        });
        results.truncate(self.max_results);

        let completions = completion::find_completions(&self.entries, &query);

        self.results.store(Arc::new(results));
        self.completions.store(Arc::new(completions));
    }

    /// Spawns the scorer loop. Stops when `running` clears; a pass already
    /// underway always completes and publishes.
    pub fn spawn_worker(
        self: &Arc<Self>,
        running: Arc<AtomicBool>,
        bus: CommandSender,
    ) -> JoinHandle<()> {
        let core = Arc::clone(self);
        thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                if !core.search_needed.swap(false, Ordering::AcqRel) {
                    thread::sleep(SEARCH_TICK);
                    continue;
                }

                core.run_search_pass();
                debug!(
                    results = core.results.load().len(),
                    completions = core.completions.load().len(),
                    "search pass published"
                );
                bus.send(Command::Refresh);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;

    fn doom_core() -> SearchCore {
        SearchCore::new(
            vec![
                Entry::new("DOOM", "Doom 1993 id Software"),
                Entry::new("DOOM2", "Doom II 1994 id Software"),
                Entry::new("KEEN", "Commander Keen 1990 id Software"),
            ],
            DEFAULT_MAX_RESULTS,
        )
    }

    #[test]
    fn empty_query_lists_every_entry_at_default_score() {
        let core = doom_core();
        core.run_search_pass();
        let results = core.results();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score == score::weight::DEFAULT));
    }

    #[test]
    fn zero_scoring_entries_never_appear() {
        let core = doom_core();
        core.update_query("xyz");
        core.run_search_pass();
        assert!(core.results().is_empty());
        assert!(core.completions().is_empty());
    }

    #[test]
    fn results_sorted_by_score_then_content() {
        let core = doom_core();
        core.update_query("doom id");
        core.run_search_pass();

        let results = core.results();
        assert_eq!(results.len(), 2);
        // Both earn the sequential-content bonus; "Doom 1993..." sorts
        // before "Doom II..." on the lexicographic content tie-break.
        assert_eq!(core.entry(results[0].index).unwrap().key, "DOOM");
        assert_eq!(core.entry(results[1].index).unwrap().key, "DOOM2");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn same_query_twice_is_bit_identical() {
        let core = doom_core();
        core.update_query("id");
        core.run_search_pass();
        let first = core.results();
        core.run_search_pass();
        let second = core.results();
        assert_eq!(*first, *second);
    }

    #[test]
    fn result_cap_is_enforced() {
        let entries = (0..50)
            .map(|i| Entry::new(format!("KEY{i}"), format!("Game number {i}")))
            .collect();
        let core = SearchCore::new(entries, 10);
        core.update_query("game");
        core.run_search_pass();
        assert_eq!(core.results().len(), 10);
    }

    #[test]
    fn old_snapshot_survives_a_republish() {
        let core = doom_core();
        core.update_query("doom");
        core.run_search_pass();
        let old = core.results();

        core.update_query("xyz");
        core.run_search_pass();
        // Reader holding the old handle still sees the old, intact list.
        assert_eq!(old.len(), 2);
        assert!(core.results().is_empty());
    }

    #[test]
    fn completion_law() {
        let core = doom_core();
        core.update_query("doo");
        core.run_search_pass();
        let hint = core.completion().expect("completion for 'doo'");
        assert!(hint.to_lowercase().starts_with("doo"));
        assert!(hint.len() > "doo".len());
    }

    #[test]
    fn worker_publishes_and_requests_refresh() {
        let core = Arc::new(doom_core());
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = command::channel();

        let worker = core.spawn_worker(running.clone(), tx);
        core.update_query("doom");

        let refresh = rx.recv_timeout(Duration::from_secs(5));
        assert_eq!(refresh, Some(Command::Refresh));
        assert_eq!(core.results().len(), 2);

        running.store(false, Ordering::Release);
        worker.join().unwrap();
    }

    #[test]
    fn edits_during_a_pass_are_not_lost() {
        let core = Arc::new(doom_core());
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = command::channel();

        let worker = core.spawn_worker(running.clone(), tx);
        core.update_query("doom");
        core.update_query("keen");

        // Drain refreshes until the final query's results are visible.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut saw_keen = false;
        while std::time::Instant::now() < deadline {
            if rx.recv_timeout(Duration::from_millis(100)).is_some()
                && core
                    .results()
                    .first()
                    .and_then(|r| core.entry(r.index))
                    .is_some_and(|e| e.key == "KEEN")
            {
                saw_keen = true;
                break;
            }
        }
        assert!(saw_keen);

        running.store(false, Ordering::Release);
        worker.join().unwrap();
    }
}
