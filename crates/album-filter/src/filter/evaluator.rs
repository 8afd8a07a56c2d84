//! Filter evaluation against album records.
//!
//! A [`CompiledFilter`] is built once from source text and can then be
//! evaluated against any number of records, from any number of threads.
//! Evaluation walks the tree: `and`/`or` nodes combine the results of
//! their two sides, comparison nodes look the field up on the record and
//! apply the operator with the semantics of that field.
//!
//! | Field | Operators | Meaning |
//! |---|---|---|
//! | `date` | `=` `!=` `<` `<=` `>` `>=` | value is `DD/MM/YYYY`, compared with `created_at` |
//! | `tag`, `permissions.user`, `permissions.group` | `=` `!=` | substring of the space-joined list |
//! | `name`, `description`, `location`, `owner` | all | string order, `like` regex, `in` list |
//!
//! # Example
//!
//! ```
//! use album_filter_rs::filter::CompiledFilter;
//! use album_filter_rs::Album;
//! use chrono::{TimeZone, Utc};
//!
//! let filter = CompiledFilter::compile("name = 'test' and date > '01/01/2022'").unwrap();
//!
//! let created = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();
//! let album = Album::new(1, "test", "alice", created);
//!
//! assert!(filter.matches(&album).unwrap());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use strsim::levenshtein;

use super::ast::{BinaryExpr, Expr};
use super::error::{EvalError, ParseError};
use super::parser::FilterParser;
use super::token::Token;
use crate::album::{AlbumRecord, Field};

/// Format of the value in a `date` comparison.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A parsed filter expression, ready to be evaluated.
///
/// Immutable once built, so it can be shared across threads. Clones share
/// the tree.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    root: Arc<BinaryExpr>,
}

impl CompiledFilter {
    /// Parses `text` into a filter.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with the byte offset of the offending token
    /// if `text` is not a valid filter expression.
    pub fn compile(text: &str) -> Result<Self, ParseError> {
        let root = FilterParser::parse(text)?;
        tracing::debug!(filter = %root, "compiled filter expression");
        Ok(Self::from_root(root))
    }

    /// Wraps an already built tree.
    pub fn from_root(root: BinaryExpr) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// The root node of the expression.
    pub fn root(&self) -> &BinaryExpr {
        &self.root
    }

    /// Evaluates the filter against one record.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] if the expression references an unknown
    /// field, uses an operator the field does not support, or carries a
    /// value that cannot be interpreted (bad date, bad regex).
    pub fn matches<R: AlbumRecord + ?Sized>(&self, record: &R) -> Result<bool, EvalError> {
        FilterEvaluator::new(self).matches(record)
    }
}

impl FromStr for CompiledFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledFilter")
            .field(&format_args!("{}", self.root))
            .finish()
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.root, f)
    }
}

/// Pending work while evaluating a tree.
enum Step<'e> {
    Node(&'e BinaryExpr),
    Operand(&'e Expr),
    Combine(Token),
}

/// Evaluates a compiled filter against records.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    filter: &'a CompiledFilter,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a CompiledFilter) -> Self {
        Self { filter }
    }

    /// Returns whether the record passes the filter.
    pub fn matches<R: AlbumRecord + ?Sized>(&self, record: &R) -> Result<bool, EvalError> {
        self.evaluate_node(&self.filter.root, record)
    }

    /// Returns the records that pass the filter, in their original order.
    ///
    /// # Errors
    ///
    /// Fails on the first record that cannot be evaluated.
    pub fn filter_records<'b, R: AlbumRecord>(
        &self,
        records: &'b [R],
    ) -> Result<Vec<&'b R>, EvalError> {
        let mut matched = Vec::new();
        for record in records {
            if self.matches(record)? {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    /// Walks the tree with an explicit stack so long `and`/`or` chains
    /// cannot exhaust the call stack.
    ///
    /// Both sides of a combinator are always evaluated, left first, so the
    /// first error in left-to-right order is the one reported.
    fn evaluate_node<R: AlbumRecord + ?Sized>(
        &self,
        root: &BinaryExpr,
        record: &R,
    ) -> Result<bool, EvalError> {
        let mut steps = vec![Step::Node(root)];
        let mut results: Vec<bool> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Node(node) if node.is_combinator() => {
                    steps.push(Step::Combine(node.op));
                    steps.push(Step::Operand(&*node.right));
                    steps.push(Step::Operand(&*node.left));
                }
                Step::Node(node) => results.push(self.evaluate_comparison(node, record)?),
                Step::Operand(Expr::Binary(node)) => steps.push(Step::Node(node)),
                Step::Operand(other) => {
                    return Err(EvalError::unexpected_operand("expression", other.kind()))
                }
                Step::Combine(op) => {
                    let (Some(right), Some(left)) = (results.pop(), results.pop()) else {
                        unreachable!("combinator operands are evaluated before the combinator");
                    };
                    results.push(if op == Token::And {
                        left && right
                    } else {
                        left || right
                    });
                }
            }
        }

        let Some(matched) = results.pop() else {
            unreachable!("the root node always yields a result");
        };
        Ok(matched)
    }

    /// Evaluates a leaf node such as `name = 'x'`.
    fn evaluate_comparison<R: AlbumRecord + ?Sized>(
        &self,
        node: &BinaryExpr,
        record: &R,
    ) -> Result<bool, EvalError> {
        let Expr::Var(name) = node.left.as_ref() else {
            return Err(EvalError::unexpected_operand("variable", node.left.kind()));
        };

        let field = Field::from_name(name).ok_or_else(|| field_not_found(name))?;
        let op = node.op;
        let value = node.right.as_ref();

        match field {
            Field::Date => compare_date(name, op, value, record.created_at()),
            Field::Tag => contains_in_list(name, op, value, &record.tag_names()),
            Field::UserPermissions => {
                contains_in_list(name, op, value, &record.user_permission_owners())
            }
            Field::GroupPermissions => {
                contains_in_list(name, op, value, &record.group_permission_owners())
            }
            Field::Name => compare_text(name, op, value, record.name()),
            Field::Description => compare_text(name, op, value, record.description()),
            Field::Location => compare_text(name, op, value, record.location()),
            Field::Owner => compare_text(name, op, value, record.owner()),
        }
    }
}

fn field_not_found(name: &str) -> EvalError {
    let suggestion = Field::ALL
        .iter()
        .map(|f| (f.name(), levenshtein(name, f.name())))
        .min_by_key(|(_, d)| *d)
        .filter(|(_, d)| *d > 0 && *d <= MAX_SUGGESTION_DISTANCE)
        .map(|(n, _)| n.to_string());

    EvalError::FieldNotFound {
        field: name.to_string(),
        suggestion,
    }
}

fn expect_str(value: &Expr) -> Result<&str, EvalError> {
    match value {
        Expr::Str(s) => Ok(s),
        other => Err(EvalError::unexpected_operand("string", other.kind())),
    }
}

/// `date` comparisons. The value is a day at midnight UTC; `>`/`>=` mean
/// "after that instant", `<`/`<=` "before", `=`/`!=` compare the calendar
/// day.
fn compare_date(
    field: &str,
    op: Token,
    value: &Expr,
    created_at: DateTime<Utc>,
) -> Result<bool, EvalError> {
    if !matches!(
        op,
        Token::Equals | Token::NotEquals | Token::Less | Token::Lte | Token::Greater | Token::Gte
    ) {
        return Err(EvalError::wrong_op(field, op));
    }

    let literal = expect_str(value)?;
    let date = NaiveDate::parse_from_str(literal, DATE_FORMAT).map_err(|_| {
        EvalError::InvalidDate {
            value: literal.to_string(),
        }
    })?;
    let midnight = date.and_time(NaiveTime::default()).and_utc();

    Ok(match op {
        Token::Greater | Token::Gte => created_at > midnight,
        Token::Less | Token::Lte => created_at < midnight,
        Token::Equals => created_at.date_naive() == date,
        _ => created_at.date_naive() != date,
    })
}

/// `tag` and permission comparisons: the value must appear somewhere in
/// the space-joined list. This is substring containment, so `a` matches a
/// list holding `cat`.
fn contains_in_list(
    field: &str,
    op: Token,
    value: &Expr,
    items: &[&str],
) -> Result<bool, EvalError> {
    if !matches!(op, Token::Equals | Token::NotEquals) {
        return Err(EvalError::wrong_op(field, op));
    }

    let needle = expect_str(value)?;
    let found = items.join(" ").contains(needle);
    Ok(if op == Token::Equals { found } else { !found })
}

/// Comparisons on plain string fields.
fn compare_text(field: &str, op: Token, value: &Expr, actual: &str) -> Result<bool, EvalError> {
    if op == Token::In {
        return match value {
            Expr::List(items) => Ok(items.iter().any(|item| item == actual)),
            other => Err(EvalError::unexpected_operand("list", other.kind())),
        };
    }

    if !op.is_comparison() {
        return Err(EvalError::wrong_op(field, op));
    }

    let expected = expect_str(value)?;
    Ok(match op {
        Token::Equals => actual == expected,
        Token::NotEquals => actual != expected,
        Token::Greater => actual > expected,
        Token::Gte => actual >= expected,
        Token::Less => actual < expected,
        Token::Lte => actual <= expected,
        Token::Like => {
            let pattern = Regex::new(expected).map_err(|e| EvalError::InvalidPattern {
                pattern: expected.to_string(),
                reason: e.to_string(),
            })?;
            pattern.is_match(actual)
        }
        _ => return Err(EvalError::wrong_op(field, op)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::{Album, AlbumPermission, Tag};
    use chrono::TimeZone;

    // ==================== Test Helpers ====================

    fn created(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn make_album(name: &str) -> Album {
        Album::new(1, name, "owner-1", created(2022, 2, 2))
    }

    fn eval(expr: &str, album: &Album) -> Result<bool, EvalError> {
        CompiledFilter::compile(expr).unwrap().matches(album)
    }

    fn with_location(location: &str) -> Album {
        let mut album = make_album("toto");
        album.location = location.to_string();
        album
    }

    // ==================== Common Fields ====================

    #[test]
    fn test_name_equals() {
        let album = make_album("test");
        assert!(eval("name = 'test'", &album).unwrap());
        assert!(!eval("name != 'test'", &album).unwrap());
    }

    #[test]
    fn test_chained_and() {
        let mut album = make_album("test");
        album.description = "titi".to_string();
        album.location = "loc".to_string();
        assert!(eval(
            "name = 'test' and description != 'toto' and location = 'loc'",
            &album
        )
        .unwrap());
    }

    #[test]
    fn test_left_to_right_or() {
        let mut album = make_album("other");
        album.location = "loc".to_string();
        // ((false and true) or true)
        assert!(eval(
            "name = 'test' and description != 'toto' or location = 'loc'",
            &album
        )
        .unwrap());
        // ((true or false) and false)
        assert!(!eval("location = 'loc' or name = 'x' and name = 'y'", &album).unwrap());
    }

    #[test]
    fn test_string_ordering() {
        let album = make_album("m");
        assert!(eval("name > 'a'", &album).unwrap());
        assert!(eval("name >= 'm'", &album).unwrap());
        assert!(eval("name < 'z'", &album).unwrap());
        assert!(eval("name <= 'm'", &album).unwrap());
        assert!(!eval("name < 'm'", &album).unwrap());
    }

    #[test]
    fn test_owner_and_description() {
        let mut album = make_album("x");
        album.description = "summer trip".to_string();
        assert!(eval("owner = 'owner-1'", &album).unwrap());
        assert!(eval("description like 'trip$'", &album).unwrap());
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let err = eval("Name = 'test'", &make_album("test")).unwrap_err();
        assert_eq!(
            err,
            EvalError::FieldNotFound {
                field: "Name".to_string(),
                suggestion: Some("name".to_string()),
            }
        );
    }

    // ==================== LIKE / IN ====================

    #[test]
    fn test_like_regex() {
        let album = with_location("tata");
        assert!(eval("location like 't.t.'", &album).unwrap());
        assert!(eval("location like 't[a-z]{1}t.'", &album).unwrap());
        assert!(!eval("location like '^x'", &album).unwrap());
    }

    #[test]
    fn test_like_is_unanchored() {
        assert!(eval("location like 'at'", &with_location("tata")).unwrap());
    }

    #[test]
    fn test_like_invalid_pattern() {
        let err = eval("location like '[a-'", &with_location("tata")).unwrap_err();
        assert!(matches!(err, EvalError::InvalidPattern { ref pattern, .. } if pattern == "[a-"));
    }

    #[test]
    fn test_in_list() {
        assert!(eval("location in ['loc1','loc2']", &with_location("loc1")).unwrap());
        assert!(!eval("location in ['loc1','loc2']", &with_location("loc3")).unwrap());
    }

    #[test]
    fn test_in_requires_list() {
        let err = eval("location in 'loc1'", &with_location("loc1")).unwrap_err();
        assert_eq!(err, EvalError::unexpected_operand("list", "string"));
    }

    #[test]
    fn test_list_with_other_operator() {
        let err = eval("location = ['loc1']", &with_location("loc1")).unwrap_err();
        assert_eq!(err, EvalError::unexpected_operand("string", "list"));
    }

    // ==================== Dates ====================

    #[test]
    fn test_date_range() {
        let mut album = make_album("a");
        album.created_at = created(2022, 2, 1);
        assert!(eval("date > '01/01/2022' and date < '01/03/2022'", &album).unwrap());

        album.created_at = created(2022, 4, 1);
        assert!(!eval("date > '01/01/2022' and date < '01/03/2022'", &album).unwrap());

        album.created_at = created(2021, 11, 15);
        assert!(eval("date > '11/01/2021' and date < '16/11/2021'", &album).unwrap());
    }

    #[test]
    fn test_date_equality_is_calendar_day() {
        let mut album = make_album("a");
        album.created_at = Utc.with_ymd_and_hms(2022, 2, 1, 18, 30, 0).unwrap();
        assert!(eval("date = '01/02/2022'", &album).unwrap());
        assert!(!eval("date != '01/02/2022'", &album).unwrap());
        assert!(eval("date != '02/02/2022'", &album).unwrap());
    }

    #[test]
    fn test_date_boundaries_are_exclusive() {
        let mut album = make_album("a");
        album.created_at = created(2022, 2, 1);
        // Exactly midnight is neither after nor before the day.
        assert!(!eval("date > '01/02/2022'", &album).unwrap());
        assert!(!eval("date >= '01/02/2022'", &album).unwrap());
        assert!(!eval("date <= '01/02/2022'", &album).unwrap());

        album.created_at = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 1).unwrap();
        assert!(eval("date >= '01/02/2022'", &album).unwrap());
    }

    #[test]
    fn test_underscore_field_name_does_not_parse() {
        // Field names are letters and dots only, so `created_at` stops at `_`.
        let err = CompiledFilter::compile("created_at = '01/02/2022'").unwrap_err();
        assert_eq!(err.position, 7);
        assert_eq!(err.message, "unexpected character '_'");
    }

    #[test]
    fn test_date_invalid_literal() {
        let err = eval("date > '2022-01-01'", &make_album("a")).unwrap_err();
        assert_eq!(
            err,
            EvalError::InvalidDate {
                value: "2022-01-01".to_string()
            }
        );
    }

    #[test]
    fn test_date_wrong_ops() {
        assert!(eval("date like '01/01/2022'", &make_album("a"))
            .unwrap_err()
            .is_wrong_op());
        assert!(eval("date in ['01/01/2022']", &make_album("a"))
            .unwrap_err()
            .is_wrong_op());
    }

    // ==================== List Fields ====================

    #[test]
    fn test_tag_substring_match() {
        let mut album = make_album("test");
        album.tags = vec![Tag::new("tag")];
        assert!(eval("name = 'test' and tag = 'tag'", &album).unwrap());
        assert!(!eval("name = 'test' and tag = 'tag2'", &album).unwrap());
        assert!(eval("tag != 'tag2'", &album).unwrap());
    }

    #[test]
    fn test_tag_matches_substring_of_unrelated_element() {
        let mut album = make_album("test");
        album.tags = vec![Tag::new("cat"), Tag::new("dog")];
        assert!(eval("tag = 'a'", &album).unwrap());
        // The join puts a space between elements.
        assert!(eval("tag = 't d'", &album).unwrap());
    }

    #[test]
    fn test_tag_wrong_op() {
        let mut album = make_album("test");
        album.tags = vec![Tag::new("tag")];
        let err = eval("name = 'test' and tag > 'tag2'", &album).unwrap_err();
        assert_eq!(err, EvalError::wrong_op("tag", ">"));
    }

    #[test]
    fn test_permissions() {
        let mut album = make_album("toto");
        album.user_permissions = vec![AlbumPermission::new("toto", vec![])];
        album.group_permissions = vec![AlbumPermission::new("family", vec![])];
        assert!(eval("permissions.user = 'toto'", &album).unwrap());
        assert!(!eval("permissions.user = 'toto2'", &album).unwrap());
        assert!(eval("permissions.group = 'family'", &album).unwrap());
        assert!(!eval("permissions.group = 'toto'", &album).unwrap());
        assert!(eval("permissions.group != 'toto'", &album).unwrap());
    }

    #[test]
    fn test_permissions_wrong_ops() {
        let mut album = make_album("toto");
        album.user_permissions = vec![AlbumPermission::new("toto", vec![])];
        album.group_permissions = vec![AlbumPermission::new("family", vec![])];

        let err = eval("permissions.user like 'x'", &album).unwrap_err();
        assert!(err.is_wrong_op());
        assert_eq!(err, EvalError::wrong_op("permissions.user", "like"));

        let err = eval("permissions.group in ['x']", &album).unwrap_err();
        assert!(err.is_wrong_op());
        assert_eq!(err, EvalError::wrong_op("permissions.group", "in"));

        assert!(eval("permissions.user > 'a'", &album).unwrap_err().is_wrong_op());
        assert!(eval("permissions.group <= 'a'", &album).unwrap_err().is_wrong_op());
    }

    #[test]
    fn test_empty_list_field() {
        let album = make_album("toto");
        assert!(!eval("tag = 'x'", &album).unwrap());
        assert!(eval("permissions.user != 'x'", &album).unwrap());
    }

    // ==================== Errors ====================

    #[test]
    fn test_unknown_field() {
        let err = eval("blabla = 'titi' and date != '01/02/2022'", &make_album("titi")).unwrap_err();
        assert!(err.is_field_not_found());
    }

    #[test]
    fn test_error_on_right_side_is_not_short_circuited() {
        let album = make_album("titi");
        let err = eval("name = 'titi' or blabla = 'x'", &album).unwrap_err();
        assert!(err.is_field_not_found());
        let err = eval("name = 'nope' and tag like 'x'", &album).unwrap_err();
        assert!(err.is_wrong_op());
    }

    #[test]
    fn test_first_error_wins() {
        let err = eval("tag > 'x' and blabla = 'y'", &make_album("a")).unwrap_err();
        assert!(err.is_wrong_op());
    }

    #[test]
    fn test_malformed_tree_is_rejected() {
        let root = BinaryExpr::new(Expr::str("name"), Token::Equals, Expr::str("x"));
        let err = CompiledFilter::from_root(root)
            .matches(&make_album("x"))
            .unwrap_err();
        assert_eq!(err, EvalError::unexpected_operand("variable", "string"));

        let root = BinaryExpr::new(Expr::var("name"), Token::And, Expr::str("x"));
        let err = CompiledFilter::from_root(root)
            .matches(&make_album("x"))
            .unwrap_err();
        assert_eq!(err, EvalError::unexpected_operand("expression", "variable"));
    }

    #[test]
    fn test_text_field_rejects_non_comparison_op() {
        let root = BinaryExpr::new(Expr::var("name"), Token::Comma, Expr::str("x"));
        let err = CompiledFilter::from_root(root)
            .matches(&make_album("x"))
            .unwrap_err();
        assert_eq!(err, EvalError::wrong_op("name", ","));
    }

    // ==================== Long Chains ====================

    /// `name = 'a' <op> name = 'a' <op> ...` with `n` comparisons.
    fn chain(n: usize, op: &str) -> String {
        let mut text = String::from("name = 'a'");
        for _ in 1..n {
            text.push_str(&format!(" {op} name = 'a'"));
        }
        text
    }

    #[test]
    fn test_long_or_chain_evaluates() {
        let filter = CompiledFilter::compile(&chain(100_000, "or")).unwrap();
        assert!(!filter.matches(&make_album("b")).unwrap());
        assert!(filter.matches(&make_album("a")).unwrap());

        let copy = filter.clone();
        assert_eq!(copy, filter);
        assert!(filter.to_string().ends_with(r#"or ("name" = "a"))"#));
    }

    #[test]
    fn test_long_and_chain_evaluates() {
        let filter = CompiledFilter::compile(&chain(100_000, "and")).unwrap();
        assert!(filter.matches(&make_album("a")).unwrap());
        assert!(!filter.matches(&make_album("b")).unwrap());
    }

    #[test]
    fn test_long_chain_reports_first_error() {
        let mut text = chain(50_000, "or");
        text.push_str(" or tag > 'x' or blabla = 'y'");
        let err = eval(&text, &make_album("a")).unwrap_err();
        assert!(err.is_wrong_op());
    }

    #[test]
    fn test_debug_shows_rendered_filter() {
        let filter = CompiledFilter::compile("name = 'a'").unwrap();
        assert_eq!(
            format!("{filter:?}"),
            r#"CompiledFilter(("name" = "a"))"#
        );
    }

    // ==================== Evaluator ====================

    #[test]
    fn test_filter_records_keeps_order() {
        let albums = vec![
            with_location("loc1"),
            with_location("loc3"),
            with_location("loc2"),
        ];
        let filter = CompiledFilter::compile("location in ['loc1','loc2']").unwrap();
        let matched = FilterEvaluator::new(&filter).filter_records(&albums).unwrap();
        let locations: Vec<&str> = matched.iter().map(|a| a.location.as_str()).collect();
        assert_eq!(locations, vec!["loc1", "loc2"]);
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let filter = CompiledFilter::compile("location like '^t'").unwrap();
        let album = with_location("tata");
        let before = album.clone();
        for _ in 0..3 {
            assert!(filter.matches(&album).unwrap());
        }
        assert_eq!(album, before);
    }
}
