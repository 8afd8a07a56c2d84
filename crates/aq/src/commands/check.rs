//! Check command implementation.
//!
//! Compiles a filter expression and prints its canonical, fully
//! parenthesized form. Nothing is evaluated.

use album_filter_rs::CompiledFilter;

use super::{CommandContext, Result};
use crate::output::format_check_json;

/// Executes the check command.
///
/// # Errors
///
/// Returns [`super::CommandError::Parse`] if the expression is invalid.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let filter = CompiledFilter::compile(expression)?;

    if ctx.json_output {
        println!("{}", format_check_json(expression, &filter)?);
    } else if !ctx.quiet {
        println!("{filter}");
    }

    Ok(())
}
