//! Lexical categories of the filter language.

use std::fmt;

/// A token kind produced by the [`Lexer`](super::lexer::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A byte the lexer could not make sense of, or an unterminated string.
    Illegal,
    /// End of input.
    Eol,

    // ==================== Combinators ====================
    /// The `and` keyword.
    And,
    /// The `or` keyword.
    Or,

    // ==================== Comparisons ====================
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    Less,
    /// `<=`
    Lte,
    /// `>`
    Greater,
    /// `>=`
    Gte,
    /// The `like` keyword (regular expression match).
    Like,
    /// The `in` keyword (list membership).
    In,

    // ==================== Punctuation ====================
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    // ==================== Literals ====================
    /// A quoted string.
    String,
    /// A field reference such as `name` or `permissions.user`.
    Variable,
}

impl Token {
    /// Looks up a keyword, ignoring case.
    pub fn from_keyword(word: &str) -> Option<Token> {
        match word.to_ascii_lowercase().as_str() {
            "and" => Some(Token::And),
            "or" => Some(Token::Or),
            "like" => Some(Token::Like),
            "in" => Some(Token::In),
            _ => None,
        }
    }

    /// Returns true for `and` and `or`.
    pub fn is_combinator(self) -> bool {
        matches!(self, Token::And | Token::Or)
    }

    /// Returns true for the operators allowed between a field and its value.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Token::Equals
                | Token::NotEquals
                | Token::Less
                | Token::Lte
                | Token::Greater
                | Token::Gte
                | Token::Like
                | Token::In
        )
    }

    /// The printable name of the token.
    pub fn name(self) -> &'static str {
        match self {
            Token::Illegal => "illegal",
            Token::Eol => "EOL",
            Token::And => "and",
            Token::Or => "or",
            Token::Equals => "=",
            Token::NotEquals => "!=",
            Token::Less => "<",
            Token::Lte => "<=",
            Token::Greater => ">",
            Token::Gte => ">=",
            Token::Like => "like",
            Token::In => "in",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            Token::String => "string",
            Token::Variable => "variable",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
