//! Recursive descent parser for filter expressions.

use super::ast::{BinaryExpr, Expr};
use super::error::ParseError;
use super::lexer::{Lexer, PositionedToken};
use super::token::Token;

/// Parser for album filter expressions.
///
/// The parser pulls tokens from the [`Lexer`] one at a time and keeps a
/// single token of lookahead. It never backtracks.
///
/// # Grammar
///
/// ```text
/// expression   ::= equality (("and" | "or") equality)*
/// equality     ::= VARIABLE comparison primary
/// primary      ::= STRING | "[" STRING ("," STRING)* "]"
/// comparison   ::= "=" | "!=" | "<" | "<=" | ">" | ">=" | "like" | "in"
/// ```
///
/// `and` and `or` have the same precedence and chain strictly left to
/// right: `a and b or c` is `((a and b) or c)`. Brackets only delimit list
/// literals; there is no grouping.
///
/// # Example
///
/// ```
/// use album_filter_rs::filter::FilterParser;
///
/// let expr = FilterParser::parse("name = 'test' and location = 'loc'").unwrap();
/// assert_eq!(
///     expr.to_string(),
///     r#"(("name" = "test") and ("location" = "loc"))"#
/// );
/// ```
pub struct FilterParser<'a> {
    lexer: Lexer<'a>,
    /// Current token.
    current: PositionedToken,
}

type ParseResult<T> = Result<T, ParseError>;

impl<'a> FilterParser<'a> {
    /// Parses a filter expression into its root node.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the byte offset of the first token
    /// that does not fit the grammar, or of the first illegal character.
    pub fn parse(input: &str) -> ParseResult<BinaryExpr> {
        let mut parser = FilterParser {
            lexer: Lexer::new(input),
            current: PositionedToken {
                position: 0,
                token: Token::Eol,
                literal: String::new(),
            },
        };
        parser.advance()?;
        parser.parse_expression()
    }

    /// Moves to the next token. Illegal tokens fail right away with the
    /// lexer's message.
    fn advance(&mut self) -> ParseResult<()> {
        self.current = self.lexer.scan();
        if self.current.token == Token::Illegal {
            return Err(self.error(self.current.literal.clone()));
        }
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.current.position, message)
    }

    /// Fails unless the current token is `expected`. Does not advance.
    fn expect(&self, expected: Token) -> ParseResult<()> {
        if self.current.token != expected {
            return Err(self.error(format!(
                "expected {expected} instead of {}",
                self.current.token
            )));
        }
        Ok(())
    }

    /// Parses `equality (("and" | "or") equality)*`.
    fn parse_expression(&mut self) -> ParseResult<BinaryExpr> {
        let mut left = self.parse_equality()?;
        self.check_after_equality()?;

        while self.current.token.is_combinator() {
            let op = self.current.token;
            self.advance()?;
            let right = self.parse_equality()?;
            self.check_after_equality()?;
            left = BinaryExpr::new(Expr::Binary(left), op, Expr::Binary(right));
        }

        Ok(left)
    }

    fn check_after_equality(&self) -> ParseResult<()> {
        match self.current.token {
            Token::And | Token::Or | Token::Eol => Ok(()),
            other => Err(self.error(format!(
                "unexpected expression after comparison: {other}"
            ))),
        }
    }

    /// Parses `VARIABLE comparison primary`.
    fn parse_equality(&mut self) -> ParseResult<BinaryExpr> {
        self.expect(Token::Variable)?;
        let field = Expr::Var(std::mem::take(&mut self.current.literal));
        self.advance()?;

        let op = self.current.token;
        if !op.is_comparison() {
            return Err(self.error(format!("expected operator instead of {op}")));
        }
        self.advance()?;

        let value = self.parse_primary()?;
        Ok(BinaryExpr::new(field, op, value))
    }

    /// Parses `STRING | "[" STRING ("," STRING)* "]"`.
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let expr = match self.current.token {
            Token::String => Expr::Str(std::mem::take(&mut self.current.literal)),
            Token::LBracket => {
                let mut items = Vec::new();
                loop {
                    self.advance()?;
                    self.expect(Token::String)?;
                    items.push(std::mem::take(&mut self.current.literal));
                    self.advance()?;
                    match self.current.token {
                        Token::RBracket => break,
                        Token::Comma => continue,
                        other => {
                            return Err(
                                self.error(format!("expected ',' or ']' instead of {other}"))
                            )
                        }
                    }
                }
                Expr::List(items)
            }
            other => return Err(self.error(format!("expected string instead of {other}"))),
        };

        self.advance()?;
        Ok(expr)
    }
}
