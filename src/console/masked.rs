//! Line reading without completion: password-style masking and editing a
//! pre-filled line.

use std::io::Write;

use tokio_util::sync::CancellationToken;

use super::chars;
use super::output::TerminalOutput;
use super::reader::{ConsoleReader, InputEvent, InputHandler};
use super::source::CharSource;
use crate::error::Result;

/// How typed characters appear on screen.
#[derive(Debug, Clone, Copy)]
enum Echo<'a> {
    /// Every character shows up as the placeholder, which may be empty.
    Placeholder(&'a str),
    /// Characters are shown as typed.
    Verbatim,
}

impl Echo<'_> {
    fn columns(&self) -> usize {
        match self {
            Echo::Placeholder(placeholder) => placeholder.chars().count(),
            Echo::Verbatim => 1,
        }
    }

    fn write<W: Write>(&self, out: &mut TerminalOutput<W>, c: char) -> Result<()> {
        match self {
            Echo::Placeholder(placeholder) => out.emit_str(placeholder)?,
            Echo::Verbatim => out.emit(c)?,
        }
        Ok(())
    }
}

struct MaskedLine<'a, W: Write> {
    out: TerminalOutput<W>,
    echo: Echo<'a>,
    initial: &'a str,
    result: Option<String>,
}

impl<W: Write> MaskedLine<'_, W> {
    fn commit(&mut self, event: &mut InputEvent<'_>) -> Result<()> {
        let line = event.buffer().as_str();
        let line = line.strip_suffix(chars::NEWLINE).unwrap_or(line);
        self.result = Some(line.to_string());
        self.out.emit(chars::NEWLINE)?;
        event.cancel_loop();
        Ok(())
    }
}

impl<W: Write> InputHandler for MaskedLine<'_, W> {
    fn on_input(&mut self, mut event: InputEvent<'_>) -> Result<()> {
        match event.added_char() {
            chars::NEWLINE | chars::END_OF_INPUT => self.commit(&mut event)?,
            c if chars::is_cancel(c) => {
                event.buffer_mut().pop();
                // Only deletions so far: nothing worth keeping.
                if self.initial.starts_with(event.buffer().as_str()) {
                    event.cancel_loop();
                } else {
                    self.commit(&mut event)?;
                }
            }
            chars::BACKSPACE => {
                for _ in 0..self.echo.columns() {
                    self.out.erase_column()?;
                }
            }
            chars::TAB => {}
            c if chars::is_printable(c) => self.echo.write(&mut self.out, c)?,
            _ => {
                event.buffer_mut().pop();
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

fn read_masked<S, W>(source: S, out: W, initial: &str, echo: Echo<'_>) -> Result<Option<String>>
where
    S: CharSource,
    W: Write,
{
    let mut handler = MaskedLine {
        out: TerminalOutput::new(out),
        echo,
        initial,
        result: None,
    };
    for c in initial.chars() {
        handler.echo.write(&mut handler.out, c)?;
    }
    handler.out.flush()?;

    let mut reader = ConsoleReader::with_initial(source, initial);
    reader.run(&mut handler, &CancellationToken::new())?;
    Ok(handler.result)
}

/// Read one line, echoing `placeholder` for every typed character.
///
/// Returns `None` when the line is cancelled before anything was typed.
pub fn read_hidden<S: CharSource, W: Write>(
    source: S,
    out: W,
    placeholder: &str,
) -> Result<Option<String>> {
    read_masked(source, out, "", Echo::Placeholder(placeholder))
}

/// Read one line that starts out as `initial`, which the user may edit.
///
/// Returns `None` when the line is cancelled without anything new typed.
/// A cancel after new input commits the line as it stands.
pub fn read_with_initial_buffer<S: CharSource, W: Write>(
    source: S,
    out: W,
    initial: &str,
) -> Result<Option<String>> {
    read_masked(source, out, initial, Echo::Verbatim)
}
