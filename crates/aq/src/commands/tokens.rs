//! Tokens command implementation.
//!
//! Prints the lexer's view of an expression, stopping after the end of
//! input or the first illegal token.

use album_filter_rs::filter::Lexer;

use super::{CommandContext, Result};
use crate::output::{format_tokens_json, format_tokens_table};

/// Executes the tokens command.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let tokens = Lexer::new(expression).tokenize();

    if ctx.json_output {
        println!("{}", format_tokens_json(&tokens)?);
    } else if !ctx.quiet {
        print!("{}", format_tokens_table(&tokens, ctx.use_colors));
    }

    Ok(())
}
