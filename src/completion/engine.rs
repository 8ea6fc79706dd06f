//! Completion engine - the ghost-text state machine
//!
//! This module ties the console read loop to the candidate lookup. Each
//! keystroke is echoed, the trailing word is looked up, and the suggested
//! remainder is painted right of the cursor as "ghost" text that TAB accepts.
//! The terminal is only ever driven with printable characters, backspace and
//! blanks, so the engine keeps track of how many ghost columns are on screen
//! at any time and cleans up after itself.

use std::io::Write;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::provider::CandidateProvider;
use super::trie::PrefixTrie;
use crate::console::chars;
use crate::console::{
    CharSource, ConsoleReader, InputEvent, InputHandler, LineBuffer, LoopHandle, TerminalOutput,
};
use crate::error::Result;

/// Outcome of one completion session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The committed line, without the terminating newline
    Line(String),
    /// The user pressed a cancel key (Ctrl-C, Ctrl-D or Ctrl-Z)
    Cancelled,
}

impl Completion {
    /// The committed line, if any
    pub fn line(&self) -> Option<&str> {
        match self {
            Completion::Line(line) => Some(line),
            Completion::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Completion::Cancelled)
    }
}

/// The suggestion currently shown on screen
#[derive(Debug, Clone)]
struct Suggestion {
    /// Full suggested word
    text: String,
    /// Characters of `text` the user has typed so far
    matched: usize,
    /// A backspace blanked the first ghost column
    damaged: bool,
}

impl Suggestion {
    /// Untyped remainder of the suggestion
    fn ghost(&self) -> String {
        self.text.chars().skip(self.matched).collect()
    }

    /// Columns the ghost occupies right of the cursor
    fn ghost_width(&self) -> usize {
        self.text.chars().count().saturating_sub(self.matched)
    }
}

/// Candidates resolved for one context key
#[derive(Debug)]
struct ResolvedContext {
    key: String,
    trie: PrefixTrie,
}

/// What a keystroke did to the session
enum Step {
    Continue,
    Commit(String),
    Cancel,
}

/// Ghost-text completer for a raw terminal
///
/// The engine owns the terminal output and the current suggestion; the line
/// buffer belongs to the console reader feeding it.
pub struct AutoCompleter<W: Write> {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn CandidateProvider>,
    out: TerminalOutput<W>,
    suggestion: Option<Suggestion>,
    /// Last resolved context, reused until the context or the line changes
    cache: Option<ResolvedContext>,
}

impl<W: Write> AutoCompleter<W> {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    /// * `out` - Terminal the echo and ghost text are written to
    pub fn new(provider: Arc<dyn CandidateProvider>, out: W) -> Self {
        Self {
            provider,
            out: TerminalOutput::new(out),
            suggestion: None,
            cache: None,
        }
    }

    /// Read one line from `source` with completion
    ///
    /// Runs on the calling thread until a newline, the end of input or a
    /// cancel key.
    ///
    /// # Returns
    /// * `Completion::Line` - The committed line
    /// * `Completion::Cancelled` - The user cancelled
    pub fn complete<S: CharSource>(&mut self, source: S) -> Result<Completion> {
        self.reset();
        let mut session = Session {
            engine: self,
            on_result: None,
            outcome: None,
        };
        ConsoleReader::new(source).run(&mut session, &CancellationToken::new())?;
        Ok(session.outcome.unwrap_or(Completion::Cancelled))
    }

    /// Read lines from `source` until told to stop, on the calling thread
    ///
    /// Every committed line goes to `on_result`; returning `false` ends the
    /// loop. A cancel key ends the loop after `on_result` has seen
    /// [`Completion::Cancelled`]. The end of input commits the pending line
    /// and ends the loop as well. `token` is checked after every read.
    pub fn run_blocking<S, F>(
        &mut self,
        source: S,
        mut on_result: F,
        token: &CancellationToken,
    ) -> Result<()>
    where
        S: CharSource,
        F: FnMut(Completion) -> bool,
    {
        self.reset();
        let mut session = Session {
            engine: self,
            on_result: Some(&mut on_result),
            outcome: None,
        };
        ConsoleReader::new(source).run(&mut session, token)
    }

    /// Forget the suggestion and the cached candidates before a new line
    fn reset(&mut self) {
        self.suggestion = None;
        self.cache = None;
    }

    pub fn output(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_output(self) -> W {
        self.out.into_inner()
    }

    /// Apply one keystroke to the screen and the suggestion state
    fn step(&mut self, event: &mut InputEvent<'_>) -> Result<Step> {
        let added = event.added_char();
        let step = match added {
            c if chars::is_cancel(c) => {
                self.dismiss()?;
                Step::Cancel
            }
            chars::NEWLINE | chars::END_OF_INPUT => {
                self.dismiss()?;
                let line = event.buffer().as_str();
                let line = line.strip_suffix(chars::NEWLINE).unwrap_or(line);
                Step::Commit(line.to_string())
            }
            chars::TAB => {
                if let Some(suggestion) = self.suggestion.take() {
                    self.out.emit_str(&suggestion.ghost())?;
                    let buffer = event.buffer_mut();
                    let word_start = trailing_word_start(buffer.as_str());
                    buffer.splice_tail(word_start, &suggestion.text);
                    self.refresh(event.buffer())?;
                }
                Step::Continue
            }
            chars::BACKSPACE => {
                self.out.erase_column()?;
                if let Some(suggestion) = self.suggestion.as_mut() {
                    suggestion.matched = suggestion.matched.saturating_sub(1);
                    suggestion.damaged = true;
                }
                self.refresh(event.buffer())?;
                Step::Continue
            }
            c => {
                self.out.emit(c)?;
                if let Some(suggestion) = self.suggestion.as_mut() {
                    suggestion.matched += 1;
                }
                self.refresh(event.buffer())?;
                Step::Continue
            }
        };
        self.out.flush()?;
        Ok(step)
    }

    /// Erase whatever ghost is on screen and forget the suggestion
    fn dismiss(&mut self) -> Result<()> {
        if let Some(suggestion) = self.suggestion.take() {
            self.out.erase(suggestion.ghost_width())?;
        }
        Ok(())
    }

    /// Recompute the suggestion for the trailing word and repaint the ghost
    fn refresh(&mut self, buffer: &LineBuffer) -> Result<()> {
        let text = buffer.as_str();
        let (context, word) = text.split_at(trailing_word_start(text));

        if word.is_empty() {
            return self.dismiss();
        }

        let Some(text) = self.lookup(context.trim_end(), word) else {
            return self.dismiss();
        };

        let typed = word.chars().count();
        if let Some(current) = self.suggestion.as_mut() {
            if current.text == text && !current.damaged {
                current.matched = typed;
                return Ok(());
            }
        }

        let old_width = self
            .suggestion
            .as_ref()
            .map_or(0, Suggestion::ghost_width);
        let next = Suggestion {
            text,
            matched: typed,
            damaged: false,
        };
        let ghost = next.ghost();
        let width = next.ghost_width();
        trace!(suggestion = %next.text, ghost = %ghost, "showing suggestion");

        self.out.emit_str(&ghost)?;
        if old_width > width {
            self.out.erase(old_width - width)?;
        }
        self.out.rewind(width)?;
        self.suggestion = Some(next);
        Ok(())
    }

    /// Longest unambiguous extension of `word` among the candidates for `context`
    fn lookup(&mut self, context: &str, word: &str) -> Option<String> {
        let resolved = match self.cache.take() {
            Some(cached) if cached.key == context => cached,
            _ => {
                debug!(context, "resolving completion candidates");
                ResolvedContext {
                    key: context.to_string(),
                    trie: self.provider.resolve(context),
                }
            }
        };
        let extension = resolved.trie.longest_unambiguous_extension(word);
        self.cache = Some(resolved);
        extension
    }
}

impl<W> AutoCompleter<W>
where
    W: Write + Send + 'static,
{
    /// Read lines from `source` on a blocking worker thread
    ///
    /// Behaves like [`run_blocking`](Self::run_blocking). The returned handle
    /// stops the loop and reports how it ended. Must be called from within a
    /// tokio runtime.
    pub fn run<S, F>(self, source: S, on_result: F) -> LoopHandle
    where
        S: CharSource + Send + 'static,
        F: FnMut(Completion) -> bool + Send + 'static,
    {
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let task = tokio::task::spawn_blocking(move || {
            let mut engine = self;
            engine.run_blocking(source, on_result, &worker_token)
        });
        LoopHandle::new(token, task)
    }
}

/// Byte offset where the word under the cursor begins
fn trailing_word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// One pass of the read loop, single-shot or continuous
struct Session<'a, W: Write> {
    engine: &'a mut AutoCompleter<W>,
    /// `None` in single-shot mode
    on_result: Option<&'a mut dyn FnMut(Completion) -> bool>,
    outcome: Option<Completion>,
}

impl<W: Write> InputHandler for Session<'_, W> {
    fn on_input(&mut self, mut event: InputEvent<'_>) -> Result<()> {
        match self.engine.step(&mut event)? {
            Step::Continue => {}
            Step::Cancel => {
                debug!("completion cancelled");
                if let Some(on_result) = self.on_result.as_deref_mut() {
                    on_result(Completion::Cancelled);
                }
                self.outcome = Some(Completion::Cancelled);
                event.cancel_loop();
            }
            Step::Commit(line) => {
                debug!(line = %line, "line committed");
                let at_end = event.added_char() == chars::END_OF_INPUT;
                match self.on_result.as_deref_mut() {
                    None => {
                        self.outcome = Some(Completion::Line(line));
                        event.cancel_loop();
                    }
                    Some(on_result) => {
                        if on_result(Completion::Line(line)) && !at_end {
                            event.buffer_mut().clear();
                            self.engine.reset();
                        } else {
                            event.cancel_loop();
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
