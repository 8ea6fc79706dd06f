//! Character sources feeding the read loop.

use std::collections::VecDeque;
use std::io::{self, Read};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;
use tracing::debug;

use super::chars::{self, END_OF_INPUT};
use crate::error::{ReadError, Result};

/// Something that yields one character per blocking read.
///
/// Once input is exhausted every further read returns
/// [`END_OF_INPUT`](super::chars::END_OF_INPUT).
pub trait CharSource {
    fn read_char(&mut self) -> Result<char>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_char(&mut self) -> Result<char> {
        (**self).read_char()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read_char(&mut self) -> Result<char> {
        (**self).read_char()
    }
}

/// Replays a fixed keystroke script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pending: VecDeque<char>,
}

impl ScriptedSource {
    pub fn new(script: &str) -> Self {
        Self {
            pending: script.chars().collect(),
        }
    }

    /// Keystrokes that have not been read yet.
    pub fn remaining(&self) -> String {
        self.pending.iter().collect()
    }
}

impl CharSource for ScriptedSource {
    fn read_char(&mut self) -> Result<char> {
        Ok(self.pending.pop_front().unwrap_or(END_OF_INPUT))
    }
}

/// Reads UTF-8 text from any byte stream, one byte per read call.
///
/// Malformed sequences decode to U+FFFD.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    exhausted: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            exhausted: false,
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadError::Io(e).into()),
            }
        }
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn read_char(&mut self) -> Result<char> {
        if self.exhausted {
            return Ok(END_OF_INPUT);
        }
        let Some(first) = self.read_byte()? else {
            self.exhausted = true;
            return Ok(END_OF_INPUT);
        };

        let width = utf8_width(first);
        match width {
            0 => return Ok(char::REPLACEMENT_CHARACTER),
            1 => return Ok(char::from(first)),
            _ => {}
        }

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes[1..width].iter_mut() {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => {
                    self.exhausted = true;
                    return Ok(char::REPLACEMENT_CHARACTER);
                }
            }
        }

        Ok(std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

/// Length of the UTF-8 sequence introduced by `first`, 0 if it cannot start one.
fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

/// The interactive terminal in raw mode.
///
/// Raw mode is switched on by [`TerminalSource::new`] and off again when the
/// source is dropped. Keys without a character meaning (arrows, function
/// keys, ...) are skipped.
#[derive(Debug)]
pub struct TerminalSource {
    _private: (),
}

impl TerminalSource {
    pub fn new() -> Result<Self> {
        if !io::stdin().is_tty() {
            return Err(ReadError::NotATerminal.into());
        }
        terminal::enable_raw_mode().map_err(ReadError::Io)?;
        debug!("raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSource {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            debug!(error = %e, "failed to leave raw mode");
        }
    }
}

impl CharSource for TerminalSource {
    fn read_char(&mut self) -> Result<char> {
        loop {
            match event::read().map_err(ReadError::Io)? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(c) = key_to_char(key) {
                        return Ok(c);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Translate a key press into the character a raw terminal would send.
fn key_to_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            match c.to_ascii_lowercase() {
                'c' => Some(chars::CTRL_C),
                'd' => Some(chars::CTRL_D),
                'z' => Some(chars::CTRL_Z),
                'h' => Some(chars::BACKSPACE),
                'j' | 'm' => Some(chars::NEWLINE),
                'i' => Some(chars::TAB),
                _ => None,
            }
        }
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some(chars::NEWLINE),
        KeyCode::Tab => Some(chars::TAB),
        KeyCode::Backspace => Some(chars::BACKSPACE),
        _ => None,
    }
}
