//! Tests for the filter parser.

use super::*;

fn render(input: &str) -> String {
    FilterParser::parse(input).unwrap().to_string()
}

fn parse_err(input: &str) -> ParseError {
    FilterParser::parse(input).unwrap_err()
}

// ==================== Rendering Tests ====================

#[test]
fn test_parse_single_comparison() {
    assert_eq!(render("name = 'test'"), r#"("name" = "test")"#);
}

#[test]
fn test_parse_and_chain() {
    assert_eq!(
        render("name = 'test' and description != 'toto' and location = 'loc'"),
        r#"((("name" = "test") and ("description" != "toto")) and ("location" = "loc"))"#
    );
}

#[test]
fn test_parse_and_chain_then_or() {
    assert_eq!(
        render("name = 'test' and description != 'toto' and location = 'loc' or tag = 'tag'"),
        r#"(((("name" = "test") and ("description" != "toto")) and ("location" = "loc")) or ("tag" = "tag"))"#
    );
}

#[test]
fn test_parse_or() {
    assert_eq!(
        render("name = 'test' or description != 'toto'"),
        r#"(("name" = "test") or ("description" != "toto"))"#
    );
}

#[test]
fn test_and_or_are_left_associative() {
    assert_eq!(
        render("name = 'a' and tag = 'b' or owner = 'c'"),
        r#"((("name" = "a") and ("tag" = "b")) or ("owner" = "c"))"#
    );
    // No precedence: `or` first still groups to the left.
    assert_eq!(
        render("name = 'a' or tag = 'b' and owner = 'c'"),
        r#"((("name" = "a") or ("tag" = "b")) and ("owner" = "c"))"#
    );
}

#[test]
fn test_parse_list() {
    assert_eq!(render("name in ['1', '2']"), r#"("name" in [1,2])"#);
    assert_eq!(render("name in ['only']"), r#"("name" in [only])"#);
}

#[test]
fn test_parse_all_operators() {
    for op in ["=", "!=", "<", "<=", ">", ">="] {
        assert_eq!(
            render(&format!("name {op} 'x'")),
            format!(r#"("name" {op} "x")"#)
        );
    }
    assert_eq!(render("name LIKE 'x'"), r#"("name" like "x")"#);
}

#[test]
fn test_parse_keywords_case_insensitive() {
    assert_eq!(
        render("name Like 'x' AND tag = 'y' Or owner IN ['z']"),
        r#"((("name" like "x") and ("tag" = "y")) or ("owner" in [z]))"#
    );
}

#[test]
fn test_parse_double_quoted_string() {
    assert_eq!(render(r#"name = "it's""#), r#"("name" = "it's")"#);
}

#[test]
fn test_parse_dotted_field() {
    assert_eq!(
        render("permissions.user = 'bob'"),
        r#"("permissions.user" = "bob")"#
    );
}

#[test]
fn test_parse_leaf_shape() {
    let root = FilterParser::parse("location in ['a','b']").unwrap();
    assert_eq!(*root.left, Expr::var("location"));
    assert_eq!(root.op, Token::In);
    assert_eq!(*root.right, Expr::list(["a", "b"]));
    assert!(!root.is_combinator());
}

#[test]
fn test_parse_combinator_shape() {
    let root = FilterParser::parse("name = 'a' or tag = 'b'").unwrap();
    assert!(root.is_combinator());
    assert!(matches!(*root.left, Expr::Binary(_)));
    assert!(matches!(*root.right, Expr::Binary(_)));
}

#[test]
fn test_compile_is_idempotent() {
    let input = "name = 'test' and date > '01/01/2022' or tag != 'x'";
    let first = compile(input).unwrap();
    let second = compile(input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_compiled_filter_from_str() {
    let filter: CompiledFilter = "owner = 'alice'".parse().unwrap();
    assert_eq!(filter.to_string(), r#"("owner" = "alice")"#);
}

// ==================== Error Tests ====================

#[test]
fn test_missing_combinator() {
    let err = parse_err("name = 'test' description != 'toto'");
    assert_eq!(err.position, 14);
    assert_eq!(err.message, "unexpected expression after comparison: variable");
}

#[test]
fn test_missing_combinator_later_in_chain() {
    let err = parse_err("name = 'a' and b = 'x' c = 'y'");
    assert_eq!(err.position, 23);
    assert_eq!(err.message, "unexpected expression after comparison: variable");
}

#[test]
fn test_leading_combinator() {
    let err = parse_err("and name = 'test'");
    assert_eq!(err.position, 0);
    assert_eq!(err.message, "expected variable instead of and");
}

#[test]
fn test_trailing_combinator() {
    let err = parse_err("name = 'test' and");
    assert_eq!(err.position, 17);
    assert_eq!(err.message, "expected variable instead of EOL");
}

#[test]
fn test_missing_operator() {
    let err = parse_err("name and 'test'");
    assert_eq!(err.position, 5);
    assert_eq!(err.message, "expected operator instead of and");

    let err = parse_err("name");
    assert_eq!(err.position, 4);
    assert_eq!(err.message, "expected operator instead of EOL");
}

#[test]
fn test_trailing_operator() {
    let err = parse_err("name = 'test' =");
    assert_eq!(err.position, 14);
    assert_eq!(err.message, "unexpected expression after comparison: =");
}

#[test]
fn test_missing_value() {
    let err = parse_err("name =");
    assert_eq!(err.position, 6);
    assert_eq!(err.message, "expected string instead of EOL");
}

#[test]
fn test_variable_as_value() {
    let err = parse_err("name = foo");
    assert_eq!(err.position, 7);
    assert_eq!(err.message, "expected string instead of variable");
}

#[test]
fn test_empty_expression() {
    let err = parse_err("");
    assert_eq!(err.position, 0);
    assert_eq!(err.message, "expected variable instead of EOL");

    assert!(FilterParser::parse("   ").is_err());
}

#[test]
fn test_list_missing_open_bracket() {
    let err = parse_err("name in '1', '2']");
    assert_eq!(err.position, 11);
    assert_eq!(err.message, "unexpected expression after comparison: ,");
}

#[test]
fn test_list_missing_close_bracket() {
    let err = parse_err("name in ['1', '2'");
    assert_eq!(err.position, 17);
    assert_eq!(err.message, "expected ',' or ']' instead of EOL");
}

#[test]
fn test_list_missing_comma() {
    let err = parse_err("name in ['1''2']");
    assert_eq!(err.position, 12);
    assert_eq!(err.message, "expected ',' or ']' instead of string");
}

#[test]
fn test_empty_list() {
    let err = parse_err("name in []");
    assert_eq!(err.position, 9);
    assert_eq!(err.message, "expected string instead of ]");
}

#[test]
fn test_list_trailing_comma() {
    let err = parse_err("name in ['1',]");
    assert_eq!(err.position, 13);
    assert_eq!(err.message, "expected string instead of ]");
}

#[test]
fn test_unterminated_string() {
    let err = parse_err("name = 'test");
    assert_eq!(err.position, 7);
    assert_eq!(err.message, "didn't find end quote in string");
}

#[test]
fn test_illegal_character() {
    let err = parse_err("name = 'a' & tag = 'b'");
    assert_eq!(err.position, 11);
    assert_eq!(err.message, "unexpected character '&'");
}

#[test]
fn test_parentheses_are_not_grouping() {
    let err = parse_err("(name = 'a')");
    assert_eq!(err.position, 0);
    assert_eq!(err.message, "unexpected character '('");
}

#[test]
fn test_matches_reports_parse_errors() {
    use crate::Album;
    use chrono::{TimeZone, Utc};

    let album = Album::new(1, "a", "o", Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    assert!(matches!(
        super::matches("name =", &album),
        Err(FilterError::Parse(_))
    ));
    assert!(matches!(
        super::matches("nope = 'a'", &album),
        Err(FilterError::Eval(EvalError::FieldNotFound { .. }))
    ));
    assert_eq!(super::matches("name = 'a'", &album), Ok(true));
}
