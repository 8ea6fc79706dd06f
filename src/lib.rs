//! Ghostline Library
//!
//! Context-aware tab completion for line input on a raw terminal. While the
//! user types, the unambiguous remainder of the current word is shown as
//! "ghost" text after the cursor; TAB accepts it. Only printable characters,
//! backspaces and blanks are ever written, so any text terminal works.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Prefix trie, context vocabularies and the completion engine
//! - `config`: Configuration management
//! - `console`: Raw character input, line buffer and terminal output
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use ghostline::completion::{AutoCompleter, StaticOptions};
//! use ghostline::console::TerminalSource;
//! use std::sync::Arc;
//!
//! fn main() -> ghostline::Result<()> {
//!     let options = StaticOptions::new(["status", "stash", "commit"]);
//!     let mut completer = AutoCompleter::new(Arc::new(options), std::io::stdout());
//!
//!     let line = completer.complete(TerminalSource::new()?)?;
//!     println!("\r\n{:?}", line);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod console;
pub mod error;

// Re-export commonly used types
pub use completion::{AutoCompleter, CandidateProvider, Completion, ContextTree, PrefixTrie};
pub use config::Config;
pub use error::{GhostlineError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
