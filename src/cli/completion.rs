//! Shell completion generation for ghostline
//!
//! This module generates completion scripts for the `ghostline` binary itself
//! (bash, zsh, fish, PowerShell, elvish).

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::cli::CliArgs;
use crate::error::Result;

/// Write the completion script for `shell` to `out`
///
/// # Arguments
/// * `shell` - Target shell
/// * `out` - Where the script goes, usually stdout
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    out.flush()?;
    Ok(())
}
