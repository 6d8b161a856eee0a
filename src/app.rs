// SPDX-License-Identifier: MIT OR Apache-2.0

//! The orchestrator: wires input, scorer and display together, owns the
//! authoritative display state, and decides the process exit code.
//!
//! Three units of execution: the main thread polls the keyboard, the scorer
//! thread re-ranks entries, and the dispatch thread drains the command queue
//! as the only writer of display state and the only caller of render/select.
//! Everything communicates through the command queue and the search core's
//! atomically-exchanged snapshots.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::catalog::Entry;
use crate::command::{self, Command, CommandReceiver};
use crate::display::{DisplayEngine, DisplayState};
use crate::errors::exit;
use crate::input::{InputDriver, Key, RawModeGuard, StdinSource};
use crate::search::SearchCore;

/// Keyboard poll interval; also paces the dispatch loop's idle wakeups.
const IO_TICK: Duration = Duration::from_millis(50);

pub struct App {
    core: Arc<SearchCore>,
    preview_length: usize,
    initial_query: String,
}

impl App {
    pub fn new(
        entries: Vec<Entry>,
        max_results: usize,
        preview_length: usize,
        initial_query: String,
    ) -> Self {
        Self {
            core: Arc::new(SearchCore::new(entries, max_results)),
            preview_length,
            initial_query,
        }
    }

    /// Runs the interactive session and returns the process exit code.
    pub fn run(&self) -> Result<i32> {
        let raw = RawModeGuard::new().context("failed to enter raw terminal mode")?;
        print!("\x1b[2J\x1b[H");

        self.core.update_query(&self.initial_query);

        let running = Arc::new(AtomicBool::new(true));
        let exit_code = Arc::new(AtomicI32::new(exit::SUCCESS));
        let (tx, rx) = command::channel();

        let scorer = self.core.spawn_worker(Arc::clone(&running), tx.clone());
        let dispatcher = Dispatcher {
            core: Arc::clone(&self.core),
            display: DisplayEngine::new(Arc::clone(&self.core), self.preview_length),
            state: DisplayState::default(),
            running: Arc::clone(&running),
            exit_code: Arc::clone(&exit_code),
        }
        .spawn(rx);

        // Input loop on the main thread; the driver never blocks past one tick.
        let source = StdinSource::new().context("failed to read standard input")?;
        let mut driver = InputDriver::new(source);
        let mut query = self.initial_query.clone();
        while running.load(Ordering::Acquire) {
            if let Some(cmd) = map_key(driver.read_key(IO_TICK), &mut query, &self.core) {
                tx.send(cmd);
            }
        }

        drop(tx);
        scorer
            .join()
            .map_err(|_| anyhow!("search worker panicked"))?;
        dispatcher
            .join()
            .map_err(|_| anyhow!("dispatch thread panicked"))?;
        drop(raw);

        let code = exit_code.load(Ordering::Acquire);
        println!(
            "\nSearch {}.",
            if code == exit::SUCCESS { "terminated" } else { "completed" }
        );
        Ok(code)
    }
}

/// Translates one decoded keypress into a command. The input loop owns the
/// authoritative query string; edits are mirrored to the core via the queue.
fn map_key(key: Option<Key>, query: &mut String, core: &SearchCore) -> Option<Command> {
    match key? {
        Key::Char(c) => {
            query.push(c);
            Some(Command::UpdateQuery(query.clone()))
        }
        Key::Backspace => query.pop().map(|_| Command::UpdateQuery(query.clone())),
        Key::Tab => core.completion().map(|completed| {
            *query = completed.clone();
            Command::UpdateQuery(completed)
        }),
        Key::Enter => Some(Command::Select(-1)),
        Key::Up => Some(Command::Move(-1)),
        Key::Down => Some(Command::Move(1)),
        Key::PageUp => Some(Command::Page { up: true }),
        Key::PageDown => Some(Command::Page { up: false }),
        Key::Escape | Key::CtrlC => Some(Command::Exit(exit::SUCCESS)),
    }
}

/// Single consumer of the command queue; sole writer of `DisplayState`.
struct Dispatcher {
    core: Arc<SearchCore>,
    display: DisplayEngine,
    state: DisplayState,
    running: Arc<AtomicBool>,
    exit_code: Arc<AtomicI32>,
}

impl Dispatcher {
    fn spawn(mut self, rx: CommandReceiver) -> JoinHandle<()> {
        thread::spawn(move || {
            while self.running.load(Ordering::Acquire) {
                let Some(command) = rx.recv_timeout(IO_TICK) else {
                    continue;
                };
                self.dispatch(command);
            }
        })
    }

    fn dispatch(&mut self, command: Command) {
        debug!(?command, "dispatch");
        match command {
            Command::Refresh => {
                self.state.scroll_offset = 0;
                self.state.selected_index = -1;
                self.state.metrics.dirty = true;
                self.display.render(&mut self.state);
            }
            Command::UpdateQuery(query) => self.core.update_query(&query),
            Command::Move(delta) => {
                if apply_move(&mut self.state, delta, self.core.results().len()) {
                    self.display.render(&mut self.state);
                }
            }
            Command::Page { up } => {
                if apply_page(&mut self.state, up, self.core.results().len()) {
                    self.display.render(&mut self.state);
                }
            }
            Command::Select(index) => self.handle_select(index),
            Command::Exit(code) => self.stop(code),
        }
    }

    fn handle_select(&mut self, index: i32) {
        let result_count = self.core.results().len();
        match resolve_select(index, self.state.selected_index, result_count) {
            SelectAction::Confirm(target) => {
                match self.display.select(target) {
                    Some(code) => self.stop(code),
                    // Stale selection against a fresh, smaller snapshot.
                    None => warn!(target, result_count, "selection out of range, ignored"),
                }
            }
            SelectAction::HighlightFirst => {
                self.state.selected_index = 0;
                self.display.render(&mut self.state);
            }
            SelectAction::Ignore => {}
        }
    }

    fn stop(&mut self, code: i32) {
        self.exit_code.store(code, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }
}

/// What a confirm keypress should do given the current highlight state.
#[derive(Debug, PartialEq, Eq)]
enum SelectAction {
    Confirm(i32),
    HighlightFirst,
    Ignore,
}

fn resolve_select(requested: i32, selected: i32, result_count: usize) -> SelectAction {
    if requested >= 0 {
        return SelectAction::Confirm(requested);
    }
    if selected >= 0 {
        SelectAction::Confirm(selected)
    } else if result_count == 1 {
        // A single hit confirms without an explicit highlight.
        SelectAction::Confirm(0)
    } else if result_count > 1 {
        // First confirm highlights, second confirms.
        SelectAction::HighlightFirst
    } else {
        SelectAction::Ignore
    }
}

/// Clamped selection move plus the minimum scroll adjustment that keeps the
/// selection visible. Returns false when there is nothing to move over.
fn apply_move(state: &mut DisplayState, delta: i32, result_count: usize) -> bool {
    if result_count == 0 {
        return false;
    }

    state.selected_index = if state.selected_index < 0 {
        0
    } else {
        (state.selected_index + delta).clamp(0, result_count as i32 - 1)
    };
    restore_visibility(state);
    true
}

/// Page jump of `max_visible - 1` rows (one-row overlap), clamped, with the
/// same visibility-restoring scroll adjustment.
fn apply_page(state: &mut DisplayState, up: bool, result_count: usize) -> bool {
    if result_count == 0 || state.metrics.max_visible_results == 0 {
        return false;
    }

    let page = state.metrics.max_visible_results.saturating_sub(1).max(1) as i32;
    let target = if up {
        state.selected_index - page
    } else {
        state.selected_index + page
    };
    state.selected_index = target.clamp(0, result_count as i32 - 1);
    restore_visibility(state);
    true
}

fn restore_visibility(state: &mut DisplayState) {
    let max_visible = state.metrics.max_visible_results;
    if max_visible == 0 {
        return;
    }

    let selected = state.selected_index.max(0) as usize;
    if selected < state.scroll_offset {
        state.scroll_offset = selected;
    } else if selected >= state.scroll_offset + max_visible {
        state.scroll_offset = selected - max_visible + 1;
    }
}
