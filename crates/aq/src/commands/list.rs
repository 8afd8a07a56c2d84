//! List command implementation.
//!
//! Loads albums from the album file and runs a query over them: filter,
//! sort, then paginate.

use album_filter_rs::{AlbumQuery, CompiledFilter, SortOrder};

use super::config::Config;
use super::{CommandContext, Result};
use crate::cli::SortField;
use crate::output::{format_albums_json, format_albums_table};

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Filter expression.
    pub filter: Option<String>,
    /// Sort field.
    pub sort: Option<SortField>,
    /// Reverse sort order.
    pub reverse: bool,
    /// Limit results. `None` falls back to the config, 0 means no limit.
    pub limit: Option<usize>,
    /// Number of matching albums to skip.
    pub offset: usize,
    /// Fail on evaluation errors instead of skipping albums.
    pub strict: bool,
}

/// Executes the list command.
///
/// # Arguments
///
/// * `ctx` - Command context with output settings
/// * `opts` - List command options
/// * `config` - Loaded configuration, supplying defaults for absent flags
///
/// # Errors
///
/// Returns an error if the filter expression is invalid, the album file
/// cannot be read, or (in strict mode) the filter fails on an album.
pub fn execute(ctx: &CommandContext, opts: &ListOptions, config: &Config) -> Result<()> {
    // Compile before touching the album file so syntax errors surface first.
    let filter = opts
        .filter
        .as_deref()
        .map(CompiledFilter::compile)
        .transpose()?;

    let store = ctx.album_store(config)?;
    if ctx.verbose {
        eprintln!("Reading albums from {}", store.path().display());
    }
    let albums = store.load()?;

    let query = build_query(opts, config, filter);
    let page = query.run(&albums)?;

    if page.skipped > 0 && !ctx.quiet && !ctx.json_output {
        eprintln!(
            "Skipped {} album(s) the filter could not be evaluated against",
            page.skipped
        );
    }

    if ctx.json_output {
        println!("{}", format_albums_json(&page)?);
    } else if !ctx.quiet {
        print!("{}", format_albums_table(&page.albums, ctx.use_colors));
    }

    Ok(())
}

/// Builds the query from command-line options, falling back to the config
/// for anything not given on the command line.
fn build_query(opts: &ListOptions, config: &Config, filter: Option<CompiledFilter>) -> AlbumQuery {
    let defaults = &config.query;

    let mut query = AlbumQuery::new()
        .offset(opts.offset)
        .limit(opts.limit.or(defaults.limit).unwrap_or(0))
        .strict(opts.strict || defaults.strict.unwrap_or(false));

    if let Some(filter) = filter {
        query = query.filter(filter);
    }

    let field = opts.sort.map(Into::into).or(defaults.sort);
    if let Some(field) = field {
        let reverse = opts.reverse || defaults.reverse.unwrap_or(false);
        let order = if reverse {
            SortOrder::Reverse
        } else {
            SortOrder::Normal
        };
        query = query.sort(field, order);
    }

    query
}
