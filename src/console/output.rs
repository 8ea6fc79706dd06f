use std::io::{self, Write};

use super::chars::BACKSPACE;

/// Terminal output restricted to what every text terminal understands.
///
/// The only primitives are "print a character" and "move one column left"
/// (a bare backspace). Blanking is built from those two: print a space, then
/// move back over it. No escape sequences are ever written.
#[derive(Debug)]
pub struct TerminalOutput<W: Write> {
    inner: W,
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn emit(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.inner.write_all(c.encode_utf8(&mut buf).as_bytes())
    }

    pub fn emit_str(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())
    }

    /// Move the cursor `columns` to the left without touching the screen.
    pub fn rewind(&mut self, columns: usize) -> io::Result<()> {
        for _ in 0..columns {
            self.emit(BACKSPACE)?;
        }
        Ok(())
    }

    /// Blank the `columns` cells right of the cursor and return to where the
    /// cursor started.
    pub fn erase(&mut self, columns: usize) -> io::Result<()> {
        for _ in 0..columns {
            self.emit(' ')?;
        }
        self.rewind(columns)
    }

    /// Delete the character left of the cursor: backspace, space, backspace.
    pub fn erase_column(&mut self) -> io::Result<()> {
        self.emit(BACKSPACE)?;
        self.emit(' ')?;
        self.emit(BACKSPACE)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
