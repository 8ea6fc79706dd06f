//! Ghostline - ghost-text tab completion on the command line
//!
//! Reads a line from the terminal while showing the unambiguous completion of
//! the current word, then prints the committed line to stdout. The prompt and
//! the echo go to stderr, so the result can be captured by a shell.
//!
//! # Usage
//!
//! ```bash
//! # Complete against a word list
//! choice=$(ghostline status stash commit push)
//!
//! # Keep reading lines with the configured context tree
//! ghostline --continuous
//!
//! # Read a password
//! secret=$(ghostline --hidden)
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use crossterm::tty::IsTty;
use nu_ansi_term::Color;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use ghostline::cli::{CliInterface, InputMode};
use ghostline::completion::{AutoCompleter, CandidateProvider, Completion, StaticOptions};
use ghostline::config::{Config, InputConfig};
use ghostline::console::{self, CharSource, ReaderSource, TerminalSource};
use ghostline::error::{ConfigError, Result};

/// Exit status for a cancelled line, as if interrupted by SIGINT
const EXIT_CANCELLED: u8 = 130;

/// Application entry point
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or read input in the selected mode
async fn run() -> Result<ExitCode> {
    let cli = CliInterface::new()?;

    initialize_logging(cli.config())?;

    if cli.handle_subcommand().await? {
        return Ok(ExitCode::SUCCESS);
    }

    let mode = cli.input_mode();
    debug!(?mode, "starting");

    match mode {
        InputMode::Complete => run_single(&cli),
        InputMode::Continuous => run_continuous(&cli).await,
        InputMode::Hidden { placeholder } => {
            show_prompt(&cli.config().input, cli.args().quiet)?;
            let line = console::read_hidden(open_source()?, io::stderr(), &placeholder)?;
            finish(line)
        }
        InputMode::Edit { initial } => {
            show_prompt(&cli.config().input, cli.args().quiet)?;
            let line = console::read_with_initial_buffer(open_source()?, io::stderr(), &initial)?;
            finish(line)
        }
    }
}

/// Read one line with completion
fn run_single(cli: &CliInterface) -> Result<ExitCode> {
    show_prompt(&cli.config().input, cli.args().quiet)?;

    let mut completer = AutoCompleter::new(build_provider(cli.config()), io::stderr());
    let outcome = completer.complete(open_source()?)?;

    // raw mode is off again once the source is gone
    eprintln!();
    match outcome {
        Completion::Line(line) => {
            println!("{}", line);
            Ok(ExitCode::SUCCESS)
        }
        Completion::Cancelled => Ok(ExitCode::from(EXIT_CANCELLED)),
    }
}

/// Read lines with completion until cancelled or input ends
async fn run_continuous(cli: &CliInterface) -> Result<ExitCode> {
    let input = cli.config().input.clone();
    let quiet = cli.args().quiet;
    show_prompt(&input, quiet)?;

    let completer = AutoCompleter::new(build_provider(cli.config()), io::stderr());
    let cancelled = Arc::new(Mutex::new(false));
    let seen_cancel = Arc::clone(&cancelled);

    let handle = completer.run(open_source()?, move |completion| match completion {
        Completion::Line(line) => {
            if let Err(e) = emit_line(&line).and_then(|_| show_prompt(&input, quiet)) {
                debug!(error = %e, "failed to write line");
                return false;
            }
            true
        }
        Completion::Cancelled => {
            if let Ok(mut flag) = seen_cancel.lock() {
                *flag = true;
            }
            false
        }
    });

    // SIGINT only arrives when stdin is not a raw terminal
    let token = handle.cancel_token();
    let ctrl_c_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => token.cancel(),
            Err(err) => eprintln!("Failed to listen for Ctrl+C: {}", err),
        }
    });

    let result = handle.join().await;
    ctrl_c_handle.abort();
    result?;

    eprintln!();
    let was_cancelled = cancelled.lock().map(|flag| *flag).unwrap_or(false);
    if was_cancelled {
        Ok(ExitCode::from(EXIT_CANCELLED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Candidate provider from configuration: the context tree if configured,
/// otherwise the flat vocabulary
fn build_provider(config: &Config) -> Arc<dyn CandidateProvider> {
    match config.completion.context_tree() {
        Some(tree) => Arc::new(tree),
        None => Arc::new(StaticOptions::new(&config.completion.vocabulary)),
    }
}

/// The raw terminal when stdin is one, the plain byte stream otherwise
fn open_source() -> Result<Box<dyn CharSource + Send>> {
    if io::stdin().is_tty() {
        Ok(Box::new(TerminalSource::new()?))
    } else {
        debug!("stdin is not a terminal, reading bytes");
        Ok(Box::new(ReaderSource::new(io::stdin())))
    }
}

/// Print the result of a masked or pre-filled read
fn finish(line: Option<String>) -> Result<ExitCode> {
    match line {
        Some(line) => {
            // the reader ended its echo with a bare newline
            eprint!("\r");
            println!("{}", line);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!();
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}

/// Write a committed line while the terminal may still be in raw mode
fn emit_line(line: &str) -> Result<()> {
    let mut err = io::stderr();
    err.write_all(b"\r\n")?;
    err.flush()?;

    let raw = io::stdout().is_tty();
    let mut out = io::stdout().lock();
    if raw {
        write!(out, "{}\r\n", line)?;
    } else {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

/// Print the prompt to stderr
fn show_prompt(input: &InputConfig, quiet: bool) -> Result<()> {
    if quiet {
        return Ok(());
    }
    let mut err = io::stderr();
    if input.color_prompt {
        write!(err, "{}", Color::Green.bold().paint(input.prompt.as_str()))?;
    } else {
        write!(err, "{}", input.prompt)?;
    }
    err.flush()?;
    Ok(())
}

/// Initialize logging system based on configuration
///
/// `RUST_LOG` wins over the configured level. Logs never go to stdout, which
/// carries the result.
///
/// # Arguments
/// * `config` - Effective configuration, CLI overrides applied
fn initialize_logging(config: &Config) -> Result<()> {
    let logging = &config.logging;
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(logging.level.to_tracing_level()).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &logging.file_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConfigError::InvalidValue {
                    field: "logging.file_path".to_string(),
                    value: format!("{}: {}", path.display(), e),
                })?;
            let subscriber = subscriber.with_writer(Mutex::new(file)).with_ansi(false);
            if logging.timestamps {
                subscriber.init();
            } else {
                subscriber.without_time().init();
            }
        }
        None => {
            let subscriber = subscriber.with_writer(io::stderr);
            if logging.timestamps {
                subscriber.init();
            } else {
                subscriber.without_time().init();
            }
        }
    }

    Ok(())
}
