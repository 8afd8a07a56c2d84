//! Album queries: filter, sort and paginate a fetched set of albums.

use crate::album::Album;
use crate::filter::{CompiledFilter, EvalError, FilterEvaluator};
use crate::sort::{sort_albums, SortField, SortOrder};

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage<'a> {
    /// Albums on this page.
    pub albums: Vec<&'a Album>,
    /// Number of albums that passed the filter, before pagination.
    pub total: usize,
    /// Number of albums dropped because the filter could not be evaluated
    /// against them. Always 0 in strict mode.
    pub skipped: usize,
}

/// Builder for a query over a set of albums.
///
/// # Example
///
/// ```
/// use album_filter_rs::{Album, AlbumQuery, CompiledFilter, SortField, SortOrder};
/// use chrono::{TimeZone, Utc};
///
/// let created = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
/// let albums = vec![
///     Album::new(1, "b", "alice", created),
///     Album::new(2, "a", "alice", created),
///     Album::new(3, "c", "bob", created),
/// ];
///
/// let page = AlbumQuery::new()
///     .filter(CompiledFilter::compile("owner = 'alice'").unwrap())
///     .sort(SortField::Name, SortOrder::Normal)
///     .limit(1)
///     .run(&albums)
///     .unwrap();
///
/// assert_eq!(page.total, 2);
/// assert_eq!(page.albums[0].id, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlbumQuery {
    filter: Option<CompiledFilter>,
    sort: Option<(SortField, SortOrder)>,
    limit: usize,
    offset: usize,
    strict: bool,
}

impl AlbumQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only albums passing `filter`.
    pub fn filter(mut self, filter: CompiledFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sorts the matching albums.
    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// Maximum number of albums on the page. 0 means no limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Number of matching albums to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Fail the whole query on the first evaluation error instead of
    /// dropping the album.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs the query.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first [`EvalError`]. Otherwise never
    /// fails: albums that cannot be evaluated are logged and left out.
    pub fn run<'a>(&self, albums: &'a [Album]) -> Result<QueryPage<'a>, EvalError> {
        let (mut matched, skipped) = match &self.filter {
            Some(filter) => self.apply_filter(filter, albums)?,
            None => (albums.iter().collect(), 0),
        };

        if let Some((field, order)) = self.sort {
            sort_albums(&mut matched, field, order);
        }

        let total = matched.len();
        let albums = self.paginate(matched);
        tracing::debug!(total, skipped, returned = albums.len(), "album query done");

        Ok(QueryPage {
            albums,
            total,
            skipped,
        })
    }

    fn apply_filter<'a>(
        &self,
        filter: &CompiledFilter,
        albums: &'a [Album],
    ) -> Result<(Vec<&'a Album>, usize), EvalError> {
        let evaluator = FilterEvaluator::new(filter);
        let mut matched = Vec::new();
        let mut skipped = 0;

        for album in albums {
            match evaluator.matches(album) {
                Ok(true) => matched.push(album),
                Ok(false) => {}
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    tracing::warn!(album_id = album.id, error = %e, "failed to resolve album");
                    skipped += 1;
                }
            }
        }

        Ok((matched, skipped))
    }

    fn paginate<'a>(&self, albums: Vec<&'a Album>) -> Vec<&'a Album> {
        let page = albums.into_iter().skip(self.offset);
        if self.limit > 0 {
            page.take(self.limit).collect()
        } else {
            page.collect()
        }
    }
}
