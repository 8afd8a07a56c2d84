//! Filter expression output formatting.

use album_filter_rs::filter::{PositionedToken, Token};
use album_filter_rs::CompiledFilter;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub expression: &'a str,
    pub canonical: String,
}

/// JSON output structure for a single token.
#[derive(Serialize)]
pub struct TokenOutput<'a> {
    pub position: usize,
    pub token: &'static str,
    pub literal: &'a str,
}

/// Formats a compiled filter as JSON.
pub fn format_check_json(
    expression: &str,
    filter: &CompiledFilter,
) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        expression,
        canonical: filter.to_string(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a token stream as JSON.
pub fn format_tokens_json(tokens: &[PositionedToken]) -> Result<String, serde_json::Error> {
    let output: Vec<TokenOutput> = tokens
        .iter()
        .map(|t| TokenOutput {
            position: t.position,
            token: t.token.name(),
            literal: &t.literal,
        })
        .collect();

    serde_json::to_string_pretty(&output)
}

/// Formats a token stream as a table. Illegal tokens are highlighted.
pub fn format_tokens_table(tokens: &[PositionedToken], use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<5} {:<10} {}", "Pos", "Token", "Literal");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for token in tokens {
        let name = if use_colors && token.token == Token::Illegal {
            token.token.name().red().to_string()
        } else {
            token.token.name().to_string()
        };

        let line = format!("{:<5} {:<10} {}", token.position, name, token.literal);
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
