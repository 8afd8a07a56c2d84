use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, Config};
use commands::list::ListOptions;
use commands::{CommandContext, CommandError};

/// Environment variable overriding the log filter (e.g. `AQ_LOG=debug`).
const LOG_ENV: &str = "AQ_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                let rendered = serde_json::to_string_pretty(&error_json)
                    .unwrap_or_else(|_| error_json.to_string());
                eprintln!("{rendered}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the stderr log subscriber. `AQ_LOG` wins over the
/// `--verbose`/`--quiet` defaults.
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // Config commands must keep working when the file itself is broken.
    let config = match &cli.command {
        Some(Commands::Config { .. }) | Some(Commands::Completions { .. }) | None => {
            Config::default()
        }
        _ => load_config()?,
    };
    let ctx = CommandContext::from_cli(cli, &config);

    match &cli.command {
        Some(Commands::Check { expression }) => commands::check::execute(&ctx, expression),
        Some(Commands::Tokens { expression }) => commands::tokens::execute(&ctx, expression),
        Some(Commands::List {
            filter,
            sort,
            reverse,
            limit,
            offset,
            strict,
        }) => {
            let opts = ListOptions {
                filter: filter.clone(),
                sort: *sort,
                reverse: *reverse,
                limit: *limit,
                offset: *offset,
                strict: *strict,
            };
            commands::list::execute(&ctx, &opts, &config)
        }
        Some(Commands::Import { file }) => commands::import::execute(&ctx, file, &config),
        Some(Commands::Config { command }) => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Init { force }) => commands::config::execute_init(&ctx, *force),
        },
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("aq - album query");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Parse(_) | CommandError::Eval(_) => "FILTER_ERROR",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Parse(_) | CommandError::Eval(_) => 1,
        CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Store(_) | CommandError::Config(_) => 5,
    }
}
