//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the aq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// aq - Query photo album records with filter expressions
#[derive(Parser, Debug)]
#[command(name = "aq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Album file to read (default: from config, then the data directory)
    #[arg(long, global = true, env = "AQ_ALBUMS")]
    pub albums: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a filter expression and print its canonical form
    #[command(alias = "c")]
    Check {
        /// Filter expression (e.g., "name = 'trip' and date > '01/01/2022'")
        expression: String,
    },

    /// Print the tokens of a filter expression
    Tokens {
        /// Filter expression
        expression: String,
    },

    /// List albums, optionally filtered
    #[command(alias = "l")]
    List {
        /// Filter expression
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort by field
        #[arg(long, value_enum)]
        sort: Option<SortField>,

        /// Reverse sort order
        #[arg(long)]
        reverse: bool,

        /// Limit results (default: from config, 0 for no limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Skip the first N matching albums
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Fail on the first album the filter cannot be evaluated against
        #[arg(long)]
        strict: bool,
    },

    /// Copy albums from a JSON file into the album file
    Import {
        /// JSON file holding an array of albums
        file: PathBuf,
    },

    /// View and create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Sort fields for list command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Owner,
    Date,
    Location,
}

impl From<SortField> for album_filter_rs::SortField {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Id => album_filter_rs::SortField::Id,
            SortField::Name => album_filter_rs::SortField::Name,
            SortField::Owner => album_filter_rs::SortField::Owner,
            SortField::Date => album_filter_rs::SortField::Date,
            SortField::Location => album_filter_rs::SortField::Location,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
