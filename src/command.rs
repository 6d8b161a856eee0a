// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display-affecting commands and the queue that carries them.
//!
//! The input loop and the scorer both produce commands; a single consumer
//! (the dispatch thread) drains them and is the only writer of display
//! state. Shutdown is cooperative: producers check the shared running flag,
//! and the consumer wakes on timeout or sender disconnect.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Closed set of commands, exhaustively matched by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A new snapshot was published; reset scroll/selection and redraw.
    Refresh,
    /// The query line changed; mirror it into the search core.
    UpdateQuery(String),
    /// Move the selection by a signed delta.
    Move(i32),
    /// Scroll by one window of results, keeping one row of overlap.
    Page { up: bool },
    /// Confirm a result row; -1 means "whatever is highlighted".
    Select(i32),
    /// Stop all loops and exit with the given code.
    Exit(i32),
}

/// Producer handle; cloneable across threads. Sends are fire-and-forget:
/// a disconnected consumer only happens during shutdown.
#[derive(Clone)]
pub struct CommandSender(Sender<Command>);

impl CommandSender {
    pub fn send(&self, command: Command) {
        let _ = self.0.send(command);
    }
}

/// Single-consumer end with a blocking, timeout-bounded pop.
pub struct CommandReceiver(Receiver<Command>);

impl CommandReceiver {
    /// Returns `None` on timeout or when every producer is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Command> {
        match self.0.recv_timeout(timeout) {
            Ok(command) => Some(command),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

pub fn channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender(tx), CommandReceiver(rx))
}
