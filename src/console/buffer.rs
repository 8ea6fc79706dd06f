use std::fmt;

/// Text of the line currently being typed.
///
/// The buffer is owned by the [`ConsoleReader`](super::ConsoleReader). Handlers
/// only get the narrow operations below; appending typed characters and
/// deleting on backspace stay with the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Keep the first `keep` bytes and put `text` after them.
    ///
    /// `keep` is clamped to the buffer length and moved back to the nearest
    /// character boundary.
    pub fn splice_tail(&mut self, keep: usize, text: &str) {
        let mut keep = keep.min(self.text.len());
        while !self.text.is_char_boundary(keep) {
            keep -= 1;
        }
        self.text.truncate(keep);
        self.text.push_str(text);
    }

    /// Replace the whole line.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub(crate) fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub(crate) fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for LineBuffer {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
