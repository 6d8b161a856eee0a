// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw keystroke decoding.
//!
//! A byte-at-a-time decoder over a `ByteSource`, structured as a small state
//! machine (Normal -> EscapePending -> BracketPending -> ParamPending) with a
//! bounded per-byte wait. The bounded wait is what distinguishes a lone
//! Escape keypress from the start of an arrow/page sequence. Incomplete or
//! unrecognized sequences are discarded with a best-effort drain, never
//! surfaced as text.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::terminal;

/// Bounded wait for the next byte of an escape sequence.
const ESCAPE_TIMEOUT: Duration = Duration::from_millis(10);

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Tab,
    Enter,
    Up,
    Down,
    PageUp,
    PageDown,
    Escape,
    CtrlC,
}

/// Byte-at-a-time input with a bounded wait, so the decoder can be driven
/// by a scripted stream in tests.
pub trait ByteSource {
    /// Next byte, or `None` when nothing arrives within `timeout`.
    fn next_byte(&mut self, timeout: Duration) -> Option<u8>;
    /// Best-effort discard of anything still buffered.
    fn drain(&mut self);
}

/// Stdin-backed source. A pump thread blocks in `read` and feeds bytes
/// through a channel so the decoder can wait with a timeout; the pump cannot
/// be woken portably and is left to die with the process.
pub struct StdinSource {
    rx: Receiver<u8>,
}

impl StdinSource {
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-pump".into())
            .spawn(move || {
                let mut stdin = io::stdin();
                let mut buf = [0u8; 1];
                loop {
                    match stdin.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {
                            if tx.send(buf[0]).is_err() {
                                break;
                            }
                        }
                    }
                }
            })?;
        Ok(Self { rx })
    }
}

impl ByteSource for StdinSource {
    fn next_byte(&mut self, timeout: Duration) -> Option<u8> {
        self.rx.recv_timeout(timeout).ok()
    }

    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Decoder states; see the module docs for the transitions.
#[derive(Debug, Clone, Copy)]
enum DecodeState {
    Normal,
    EscapePending,
    BracketPending,
    ParamPending(u8),
}

pub struct InputDriver<S: ByteSource> {
    source: S,
}

impl<S: ByteSource> InputDriver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Waits up to `timeout` for a first byte, then decodes one keypress.
    /// `None` means no input pending, an ignored byte, or a discarded
    /// sequence; the caller just polls again.
    pub fn read_key(&mut self, timeout: Duration) -> Option<Key> {
        let mut state = DecodeState::Normal;
        let mut wait = timeout;

        loop {
            let byte = self.source.next_byte(wait);
            match state {
                DecodeState::Normal => match byte? {
                    0x03 => return Some(Key::CtrlC),
                    b'\t' => return Some(Key::Tab),
                    0x7f | 0x08 => return Some(Key::Backspace),
                    b'\r' | b'\n' => return Some(Key::Enter),
                    0x1b => {
                        state = DecodeState::EscapePending;
                        wait = ESCAPE_TIMEOUT;
                    }
                    b @ 32..=126 => return Some(Key::Char(b as char)),
                    _ => return None,
                },
                DecodeState::EscapePending => match byte {
                    // Nothing followed within the bounded wait: a real
                    // Escape keypress, not a sequence.
                    None => return Some(Key::Escape),
                    Some(b'[') => state = DecodeState::BracketPending,
                    Some(_) => {
                        self.source.drain();
                        return None;
                    }
                },
                DecodeState::BracketPending => match byte {
                    Some(b'A') => {
                        self.source.drain();
                        return Some(Key::Up);
                    }
                    Some(b'B') => {
                        self.source.drain();
                        return Some(Key::Down);
                    }
                    Some(param @ (b'5' | b'6')) => state = DecodeState::ParamPending(param),
                    _ => {
                        self.source.drain();
                        return None;
                    }
                },
                DecodeState::ParamPending(param) => match byte {
                    Some(b'~') => {
                        self.source.drain();
                        return Some(if param == b'5' {
                            Key::PageUp
                        } else {
                            Key::PageDown
                        });
                    }
                    _ => {
                        self.source.drain();
                        return None;
                    }
                },
            }
        }
    }
}

/// Puts the terminal in raw mode for the guard's lifetime; restored on every
/// exit path, normal or not.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted source: bytes are served instantly, exhaustion acts as a
    /// timeout, and drained bytes are counted.
    struct ScriptSource {
        bytes: VecDeque<u8>,
        drained: usize,
    }

    impl ScriptSource {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.iter().copied().collect(),
                drained: 0,
            }
        }
    }

    impl ByteSource for ScriptSource {
        fn next_byte(&mut self, _timeout: Duration) -> Option<u8> {
            self.bytes.pop_front()
        }

        fn drain(&mut self) {
            self.drained += self.bytes.len();
            self.bytes.clear();
        }
    }

    fn decode(bytes: &[u8]) -> Option<Key> {
        InputDriver::new(ScriptSource::new(bytes)).read_key(Duration::from_millis(1))
    }

    #[test]
    fn printable_ascii_decodes_to_char() {
        assert_eq!(decode(b"a"), Some(Key::Char('a')));
        assert_eq!(decode(b" "), Some(Key::Char(' ')));
        assert_eq!(decode(b"~"), Some(Key::Char('~')));
    }

    #[test]
    fn single_byte_controls() {
        assert_eq!(decode(&[0x03]), Some(Key::CtrlC));
        assert_eq!(decode(&[0x09]), Some(Key::Tab));
        assert_eq!(decode(&[0x7f]), Some(Key::Backspace));
        assert_eq!(decode(&[0x08]), Some(Key::Backspace));
        assert_eq!(decode(b"\r"), Some(Key::Enter));
        assert_eq!(decode(b"\n"), Some(Key::Enter));
    }

    #[test]
    fn lone_escape_times_out_to_escape_key() {
        assert_eq!(decode(&[0x1b]), Some(Key::Escape));
    }

    #[test]
    fn arrow_sequences() {
        assert_eq!(decode(b"\x1b[A"), Some(Key::Up));
        assert_eq!(decode(b"\x1b[B"), Some(Key::Down));
    }

    #[test]
    fn page_sequences_need_the_tilde() {
        assert_eq!(decode(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode(b"\x1b[6~"), Some(Key::PageDown));
        assert_eq!(decode(b"\x1b[5x"), None);
        assert_eq!(decode(b"\x1b[5"), None);
    }

    #[test]
    fn unrecognized_sequences_are_discarded_not_typed() {
        assert_eq!(decode(b"\x1b[Z"), None);
        assert_eq!(decode(b"\x1bOZ"), None);
    }

    #[test]
    fn trailing_bytes_of_bad_sequences_are_drained() {
        let mut driver = InputDriver::new(ScriptSource::new(b"\x1b[Zjunk"));
        assert_eq!(driver.read_key(Duration::from_millis(1)), None);
        assert_eq!(driver.source.drained, 4);
    }

    #[test]
    fn non_printable_bytes_are_ignored() {
        assert_eq!(decode(&[0x01]), None);
        assert_eq!(decode(&[0xff]), None);
    }

    #[test]
    fn empty_source_means_no_key() {
        assert_eq!(decode(&[]), None);
    }
}
