//! Ghost-text completion for raw terminals
//!
//! While the user types, the word under the cursor is completed as far as the
//! candidates allow without guessing, and the rest of the suggestion is shown
//! right of the cursor. TAB accepts it, any other key just keeps typing.
//!
//! # Architecture
//!
//! The completion system consists of several components:
//!
//! - **PrefixTrie**: Finds the longest unambiguous extension of a word
//! - **ContextTree**: Picks the vocabulary that applies after the words typed so far
//! - **Provider**: Turns a context into candidates (tree, flat list or closure)
//! - **Engine**: The per-keystroke state machine keeping the screen in sync
//!
//! # Examples
//!
//! ```no_run
//! use ghostline::completion::{AutoCompleter, Completion, ContextTree};
//! use ghostline::console::TerminalSource;
//! use std::sync::Arc;
//!
//! let mut tree = ContextTree::new();
//! tree.child("git").options(["add", "commit", "push"]);
//!
//! let mut completer = AutoCompleter::new(Arc::new(tree), std::io::stdout());
//! match completer.complete(TerminalSource::new()?)? {
//!     Completion::Line(line) => println!("\r\n{line}"),
//!     Completion::Cancelled => println!("\r\ncancelled"),
//! }
//! # Ok::<(), ghostline::error::GhostlineError>(())
//! ```

mod context;
mod engine;
mod provider;
mod trie;

#[cfg(test)]
mod tests;

pub use context::ContextTree;
pub use engine::{AutoCompleter, Completion};
pub use provider::{CandidateProvider, StaticOptions};
pub use trie::PrefixTrie;
