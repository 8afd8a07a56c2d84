//! Filter expressions for photo album records.
//!
//! This crate compiles small predicate expressions such as
//! `name = 'x' and date > '01/01/2022'` once and evaluates them against any
//! number of in-memory album records. On top of the engine it provides the
//! album model, a query pipeline (filter, sort, paginate) and a JSON file
//! store for album records.
//!
//! See the [`filter`] module for the expression syntax.

pub mod album;
pub mod filter;
pub mod query;
pub mod sort;
pub mod store;

pub use album::{Album, AlbumPermission, AlbumRecord, Field, Permission, Tag};
pub use filter::{CompiledFilter, EvalError, FilterError, FilterEvaluator, ParseError};
pub use query::{AlbumQuery, QueryPage};
pub use sort::{sort_albums, SortField, SortOrder};
pub use store::{AlbumStore, AlbumStoreError};
