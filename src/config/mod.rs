//! Configuration management for ghostline
//!
//! This module handles loading, parsing, and validating the TOML configuration file.
//! The file describes what can be completed (a flat vocabulary or a context tree),
//! how the line is read, and where logs go.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values
//!
//! # Example
//!
//! ```toml
//! [completion]
//! vocabulary = ["auto", "autocomplete", "test", "testing"]
//!
//! [completion.tree.children.node.children.i]
//! options = ["express", "react"]
//!
//! [completion.tree.children.notepad]
//!
//! [input]
//! prompt = "$ "
//! continuous = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::completion::ContextTree;
use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion vocabulary
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Line input configuration
    #[serde(default)]
    pub input: InputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What can be completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Flat candidate list, offered for every word
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,

    /// Context tree; takes precedence over `vocabulary` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<ContextNodeConfig>,
}

/// One node of the context tree as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextNodeConfig {
    /// Explicit candidates for the word after this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Offer this node's vocabulary again for unknown tokens
    #[serde(default, skip_serializing_if = "is_false")]
    pub multi: bool,

    /// Words that may follow, each leading to its own node
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, ContextNodeConfig>,
}

/// Line input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Prompt printed before each line
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Keep reading lines until cancelled
    #[serde(default)]
    pub continuous: bool,

    /// Echoed for every character in hidden mode
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Enable colored prompt
    #[serde(default = "default_color_prompt")]
    pub color_prompt: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_vocabulary() -> Vec<String> {
    ["auto", "autocomplete", "test", "testing"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_placeholder() -> String {
    "*".to_string()
}

fn default_color_prompt() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            tree: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            continuous: false,
            placeholder: default_placeholder(),
            color_prompt: default_color_prompt(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// Without an explicit path the default location is used, and a missing
    /// file there simply yields the defaults. An explicit path must exist.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format), or `None` for the default
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            ConfigError::Generic(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Serialize the configuration back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Generic(format!("failed to serialize config: {}", e)).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.ghostline/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ghostline")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        self.completion.validate()
    }
}

impl CompletionConfig {
    fn validate(&self) -> Result<()> {
        if self.vocabulary.iter().any(String::is_empty) {
            return Err(invalid("completion.vocabulary", "empty candidate"));
        }
        if let Some(tree) = &self.tree {
            tree.validate("completion.tree")?;
        }
        Ok(())
    }

    /// Build the context tree, if one is configured
    pub fn context_tree(&self) -> Option<ContextTree> {
        self.tree.as_ref().map(|node| {
            let mut tree = ContextTree::new();
            node.build(&mut tree);
            tree
        })
    }
}

impl ContextNodeConfig {
    fn validate(&self, field: &str) -> Result<()> {
        if self.options.is_some() && !self.children.is_empty() {
            return Err(invalid(field, "both options and children"));
        }
        if let Some(options) = &self.options {
            if options.iter().any(String::is_empty) {
                return Err(invalid(&format!("{field}.options"), "empty candidate"));
            }
        }
        for (word, child) in &self.children {
            if word.is_empty() || word.contains(char::is_whitespace) {
                return Err(invalid(&format!("{field}.children"), word));
            }
            child.validate(&format!("{field}.children.{word}"))?;
        }
        Ok(())
    }

    fn build(&self, node: &mut ContextTree) {
        match &self.options {
            Some(options) => {
                node.options(options.iter().cloned());
            }
            None => {
                for (word, child) in &self.children {
                    child.build(node.child(word.clone()));
                }
            }
        }
        if self.multi {
            node.mark_multi();
        }
    }
}

fn invalid(field: &str, value: &str) -> crate::error::GhostlineError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
