//! Error handling for ghostline.
//!
//! Three things can go wrong while completing a line: the character source
//! fails ([`ReadError`]), the configuration is unusable ([`ConfigError`]), or
//! the terminal refuses output (`GhostlineError::Io`). A user cancelling the
//! line is a regular outcome and never surfaces here.
//!
//! # Example
//!
//! ```rust,no_run
//! use ghostline::error::{GhostlineError, ReadError, Result};
//!
//! fn read_something() -> Result<char> {
//!     Err(ReadError::NotATerminal.into())
//! }
//!
//! match read_something() {
//!     Err(GhostlineError::Read(e)) => eprintln!("input failed: {e}"),
//!     other => println!("{other:?}"),
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, GhostlineError, ReadError, Result};
