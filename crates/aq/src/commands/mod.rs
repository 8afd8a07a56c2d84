//! Command implementations for the aq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod import;
pub mod list;
pub mod tokens;

use std::path::PathBuf;

use album_filter_rs::filter::{EvalError, ParseError};
use album_filter_rs::{AlbumStore, AlbumStoreError};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter expression could not be compiled.
    #[error("{}", .0.diagnostic())]
    Parse(#[from] ParseError),

    /// Filter could not be evaluated against an album.
    #[error("filter error: {0}")]
    Eval(#[from] EvalError),

    /// Album store error.
    #[error("album store error: {0}")]
    Store(#[from] AlbumStoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Album file given on the command line or via `AQ_ALBUMS`.
    pub albums_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Colors are on unless `--no-color` is given, `NO_COLOR` is set, or the
    /// config turns them off.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let color_enabled = config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none() && color_enabled,
            quiet: cli.quiet,
            verbose: cli.verbose,
            albums_path: cli.albums.clone(),
        }
    }

    /// Opens the album store, resolving its path with priority:
    /// flag/env > config `albums_file` > default data directory.
    pub fn album_store(&self, config: &Config) -> Result<AlbumStore> {
        if let Some(path) = &self.albums_path {
            return Ok(AlbumStore::with_path(path.clone()));
        }
        if let Some(path) = &config.albums_file {
            return Ok(AlbumStore::with_path(path.clone()));
        }
        Ok(AlbumStore::new()?)
    }
}
