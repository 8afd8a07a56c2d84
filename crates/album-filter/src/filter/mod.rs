//! Filter expression language for album records.
//!
//! A filter is a chain of comparisons joined by `and`/`or`, evaluated
//! strictly left to right:
//!
//! ```text
//! name = 'test' and date > '01/01/2022' or tag = 'sea'
//! ```
//!
//! # Supported Syntax
//!
//! ## Comparisons
//! - `=`, `!=`, `<`, `<=`, `>`, `>=` - string (or date) comparison
//! - `like` - regular expression match, e.g. `location like '^Par'`
//! - `in` - list membership, e.g. `owner in ['alice', 'bob']`
//!
//! ## Fields
//! - `name`, `description`, `location`, `owner` - plain strings
//! - `date` - creation day, written `DD/MM/YYYY`
//! - `tag`, `permissions.user`, `permissions.group` - lists, `=`/`!=` only
//!
//! ## Combinators
//! - `and`, `or` - same precedence, left-associative, no grouping
//!
//! Keywords are case-insensitive, field names are not. Strings use single
//! or double quotes and have no escape sequences.
//!
//! # Example
//!
//! ```
//! use album_filter_rs::filter::{compile, evaluate};
//! use album_filter_rs::Album;
//! use chrono::{TimeZone, Utc};
//!
//! // Compile once...
//! let filter = compile("location in ['Paris', 'Lyon'] and date < '01/01/2023'").unwrap();
//!
//! // ...evaluate many times.
//! let mut album = Album::new(1, "Trip", "alice", Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap());
//! album.location = "Paris".to_string();
//! assert!(evaluate(&filter, &album).unwrap());
//!
//! album.location = "Rome".to_string();
//! assert!(!evaluate(&filter, &album).unwrap());
//! ```

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod token;

pub use ast::{BinaryExpr, Expr};
pub use error::{EvalError, FilterError, FilterResult, ParseError};
pub use evaluator::{CompiledFilter, FilterEvaluator};
pub use lexer::{Lexer, PositionedToken};
pub use parser::FilterParser;
pub use token::Token;

use crate::album::AlbumRecord;

/// Compiles a filter expression.
///
/// # Errors
///
/// Returns a [`ParseError`] if `text` is not a valid expression.
pub fn compile(text: &str) -> Result<CompiledFilter, ParseError> {
    CompiledFilter::compile(text)
}

/// Evaluates a compiled filter against one record.
///
/// # Errors
///
/// Returns an [`EvalError`] if the filter cannot be applied to the record.
pub fn evaluate<R: AlbumRecord + ?Sized>(
    filter: &CompiledFilter,
    record: &R,
) -> Result<bool, EvalError> {
    filter.matches(record)
}

/// Compiles `text` and evaluates it against `record` in one step.
///
/// # Errors
///
/// Returns [`FilterError::Parse`] or [`FilterError::Eval`].
pub fn matches<R: AlbumRecord + ?Sized>(text: &str, record: &R) -> FilterResult<bool> {
    Ok(compile(text)?.matches(record)?)
}

#[cfg(test)]
mod tests;
