//! Import command implementation.
//!
//! Reads albums from a JSON file and writes them to the album file,
//! replacing its contents.

use std::path::Path;

use album_filter_rs::AlbumStore;

use super::config::Config;
use super::{CommandContext, Result};

/// Executes the import command.
///
/// # Errors
///
/// Returns a store error if the source cannot be read or parsed, or if the
/// album file cannot be written.
pub fn execute(ctx: &CommandContext, file: &Path, config: &Config) -> Result<()> {
    let albums = AlbumStore::with_path(file.to_path_buf()).load()?;

    let store = ctx.album_store(config)?;
    store.save(&albums)?;
    tracing::debug!(
        source = %file.display(),
        target = %store.path().display(),
        count = albums.len(),
        "imported albums"
    );

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "count": albums.len(),
            "path": store.path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Imported {} album(s) into {}", albums.len(), store.path().display());
    }

    Ok(())
}
