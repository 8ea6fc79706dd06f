//! The blocking read-dispatch loop.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::buffer::LineBuffer;
use super::chars;
use super::source::CharSource;
use crate::error::{ReadError, Result};

/// One character arrival, as seen by an [`InputHandler`].
///
/// By the time a handler sees the event the reader has already applied the
/// character to the buffer: printable and control characters are appended,
/// a backspace has removed the last character, while a tab or the
/// end-of-input sentinel leave the buffer untouched.
#[derive(Debug)]
pub struct InputEvent<'a> {
    added: char,
    buffer: &'a mut LineBuffer,
    cancelled: &'a mut bool,
}

impl<'a> InputEvent<'a> {
    pub fn added_char(&self) -> char {
        self.added
    }

    pub fn buffer(&self) -> &LineBuffer {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut LineBuffer {
        self.buffer
    }

    /// End the loop once this event has been handled.
    pub fn cancel_loop(&mut self) {
        *self.cancelled = true;
    }
}

/// Consumer of character events.
pub trait InputHandler {
    fn on_input(&mut self, event: InputEvent<'_>) -> Result<()>;
}

impl<F> InputHandler for F
where
    F: FnMut(InputEvent<'_>) -> Result<()>,
{
    fn on_input(&mut self, event: InputEvent<'_>) -> Result<()> {
        self(event)
    }
}

/// Owns a character source and the line buffer it fills.
#[derive(Debug)]
pub struct ConsoleReader<S> {
    source: S,
    buffer: LineBuffer,
    after_carriage_return: bool,
}

impl<S: CharSource> ConsoleReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: LineBuffer::new(),
            after_carriage_return: false,
        }
    }

    /// Start with `initial` already in the buffer.
    pub fn with_initial(source: S, initial: &str) -> Self {
        let mut reader = Self::new(source);
        reader.buffer.replace(initial);
        reader
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Read and dispatch characters until the handler cancels the loop, the
    /// source runs dry or `token` is cancelled.
    ///
    /// The token is checked after every completed read, so a cancellation
    /// requested during a blocking read takes effect once that read returns.
    /// The character read at that point is discarded.
    pub fn run<H>(&mut self, handler: &mut H, token: &CancellationToken) -> Result<()>
    where
        H: InputHandler + ?Sized,
    {
        debug!("console loop started");
        loop {
            let raw = self.source.read_char()?;
            if token.is_cancelled() {
                debug!("console loop stopped by cancellation request");
                return Ok(());
            }

            let Some(added) = self.normalize(raw) else {
                continue;
            };

            match added {
                chars::BACKSPACE => {
                    if self.buffer.pop().is_none() {
                        trace!("backspace on empty line ignored");
                        continue;
                    }
                }
                chars::TAB | chars::END_OF_INPUT => {}
                c => self.buffer.push(c),
            }

            trace!(char = ?added, "dispatching input");
            let mut cancelled = false;
            handler.on_input(InputEvent {
                added,
                buffer: &mut self.buffer,
                cancelled: &mut cancelled,
            })?;

            if cancelled || added == chars::END_OF_INPUT {
                debug!(end_of_input = !cancelled, "console loop finished");
                return Ok(());
            }
        }
    }

    /// Fold terminal-specific spellings onto the characters handlers expect.
    fn normalize(&mut self, raw: char) -> Option<char> {
        let after_cr = std::mem::replace(&mut self.after_carriage_return, false);
        match raw {
            chars::CARRIAGE_RETURN => {
                self.after_carriage_return = true;
                Some(chars::NEWLINE)
            }
            chars::NEWLINE if after_cr => None,
            chars::DELETE => Some(chars::BACKSPACE),
            c => Some(c),
        }
    }
}

/// Handle to a read loop running on a blocking worker thread.
#[derive(Debug)]
pub struct LoopHandle {
    token: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl LoopHandle {
    pub(crate) fn new(token: CancellationToken, task: JoinHandle<Result<()>>) -> Self {
        Self { token, task }
    }

    /// Ask the loop to stop. Takes effect after the read in progress.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// A token other threads can use to stop the loop.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end and return its outcome.
    pub async fn join(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(ReadError::Worker(e.to_string()).into()),
        }
    }
}
