//! Command-line interface for ghostline
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Mode selection (completion, continuous, hidden or pre-filled input)
//! - Subcommands (version, shell completion, config inspection)

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::error::Result;

mod completion;

pub use completion::generate_completion;

/// Ghost-text tab completion for raw terminal input
#[derive(Parser, Debug)]
#[command(
    name = "ghostline",
    version,
    about = "Read a line with ghost-text tab completion",
    long_about = "Reads a line from a raw terminal, showing the unambiguous completion of the
current word as ghost text that TAB accepts. The committed line is printed to stdout."
)]
pub struct CliArgs {
    /// Words to complete, replacing the configured vocabulary
    #[arg(value_name = "WORDS")]
    pub words: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Keep reading lines until cancelled
    #[arg(long)]
    pub continuous: bool,

    /// Read a hidden line, echoing PLACEHOLDER per character
    #[arg(
        long,
        value_name = "PLACEHOLDER",
        num_args = 0..=1,
        conflicts_with_all = ["initial", "continuous"]
    )]
    pub hidden: Option<Option<String>>,

    /// Start from TEXT and let the user edit it
    #[arg(long, value_name = "TEXT", conflicts_with = "continuous")]
    pub initial: Option<String>,

    /// Prompt printed before each line
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (no prompt, errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for ghostline
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// How the line is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// One line with completion
    Complete,
    /// Lines with completion until cancelled
    Continuous,
    /// One masked line, no completion
    Hidden { placeholder: String },
    /// One pre-filled line, no completion
    Edit { initial: String },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    ///
    /// # Returns
    /// * `&Config` - Reference to configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    ///
    /// # Returns
    /// * `&CliArgs` - Reference to arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Decide how the line is read
    ///
    /// `--hidden` and `--initial` select the plain readers; otherwise the
    /// effective `continuous` setting picks between one line and many.
    pub fn input_mode(&self) -> InputMode {
        if let Some(placeholder) = &self.args.hidden {
            return InputMode::Hidden {
                placeholder: placeholder
                    .clone()
                    .unwrap_or_else(|| self.config.input.placeholder.clone()),
            };
        }
        if let Some(initial) = &self.args.initial {
            return InputMode::Edit {
                initial: initial.clone(),
            };
        }
        if self.config.input.continuous {
            InputMode::Continuous
        } else {
            InputMode::Complete
        }
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_completion_args(config, args);
        Self::apply_input_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Positional words replace both the vocabulary and any context tree
    fn apply_completion_args(config: &mut Config, args: &CliArgs) {
        let words: Vec<String> = args
            .words
            .iter()
            .filter(|word| !word.is_empty())
            .cloned()
            .collect();
        if !words.is_empty() {
            config.completion.vocabulary = words;
            config.completion.tree = None;
        }
    }

    /// Apply input-related CLI arguments to configuration
    fn apply_input_args(config: &mut Config, args: &CliArgs) {
        if args.continuous {
            config.input.continuous = true;
        }

        if let Some(prompt) = &args.prompt {
            config.input.prompt = prompt.clone();
        }

        if args.no_color {
            config.input.color_prompt = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub async fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                generate_completion(*shell, &mut io::stdout())?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("ghostline version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(path.as_path())) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();

        match self.config.to_toml() {
            Ok(toml_str) => println!("{}", toml_str),
            Err(e) => {
                eprintln!("Error formatting configuration: {}", e);
                println!("{:#?}", self.config);
            }
        }

        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}
