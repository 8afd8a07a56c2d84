//! Config command implementation.
//!
//! View and create configuration settings.
//! Config file is located at ~/.config/aq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use album_filter_rs::SortField;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "AQ_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# aq - album query configuration

# Config schema version (do not modify)
version = 1

# Album file to query (can also use --albums or the AQ_ALBUMS env var)
# albums_file = "/path/to/albums.json"

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Defaults for `aq list`
[query]
# sort = "name"             # "id", "name", "owner", "date", "location"
# reverse = false
# limit = 0                 # 0 means no limit
# strict = false            # fail instead of skipping albums the filter cannot evaluate
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Album file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums_file: Option<PathBuf>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Query defaults.
    #[serde(default)]
    pub query: QueryConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            albums_file: None,
            output: OutputConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Defaults applied to `aq list` when the matching flag is absent.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/aq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("aq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("aq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config = parse_config(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if !path.exists() {
            println!("(No config file exists. Run 'aq config init' to create one.)");
            return Ok(());
        }

        println!("Settings:");
        if let Some(ref albums_file) = config.albums_file {
            println!("  albums_file: {}", albums_file.display());
        }

        println!("\n[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        println!("\n[query]");
        if let Some(sort) = config.query.sort {
            println!("  sort: {}", sort);
        }
        if let Some(reverse) = config.query.reverse {
            println!("  reverse: {}", reverse);
        }
        if let Some(limit) = config.query.limit {
            println!("  limit: {}", limit);
        }
        if let Some(strict) = config.query.strict {
            println!("  strict: {}", strict);
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command, writing the commented default file.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created config at: {}", path.display());
    }

    Ok(())
}
