//! Output formatting utilities for the aq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`albums`] - Album list output (list command)
//! - [`filter`] - Filter expression output (check and tokens commands)
//! - [`helpers`] - Common formatting utilities (truncation, dates, tags)

mod albums;
mod filter;
pub mod helpers;

// Albums
pub use albums::{format_albums_json, format_albums_table};

// Filters
pub use filter::{format_check_json, format_tokens_json, format_tokens_table};
