//! Raw character input for ghostline.
//!
//! A [`ConsoleReader`] pulls one character at a time from a [`CharSource`],
//! keeps the [`LineBuffer`] up to date and hands every arrival to an
//! [`InputHandler`]. Terminal echo is off in raw mode, so handlers are the
//! only thing writing to the screen, through [`TerminalOutput`].
//!
//! # Examples
//!
//! ```no_run
//! use ghostline::console::{self, TerminalSource};
//!
//! let source = TerminalSource::new()?;
//! let password = console::read_hidden(source, std::io::stdout(), "*")?;
//! # Ok::<(), ghostline::error::GhostlineError>(())
//! ```

pub mod chars;

mod buffer;
mod masked;
mod output;
mod reader;
mod source;

pub use buffer::LineBuffer;
pub use masked::{read_hidden, read_with_initial_buffer};
pub use output::TerminalOutput;
pub use reader::{ConsoleReader, InputEvent, InputHandler, LoopHandle};
pub use source::{CharSource, ReaderSource, ScriptedSource, TerminalSource};
