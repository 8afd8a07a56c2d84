//! Lexer (tokenizer) for filter expressions.

use super::token::Token;

/// Literal reported when a string is missing its closing quote.
pub(crate) const UNTERMINATED_STRING: &str = "didn't find end quote in string";

/// A token with its position and literal text in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
    /// The token kind.
    pub token: Token,
    /// Field name for `Variable`, contents for `String`, diagnostic for
    /// `Illegal`, empty otherwise.
    pub literal: String,
}

impl PositionedToken {
    fn new(position: usize, token: Token, literal: impl Into<String>) -> Self {
        Self {
            position,
            token,
            literal: literal.into(),
        }
    }
}

/// Single-use lexer over one filter expression.
///
/// Call [`scan`](Lexer::scan) until it returns [`Token::Eol`]. The lexer
/// works on bytes: positions are byte offsets into the source string.
pub struct Lexer<'a> {
    src: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(src: &'a str) -> Self {
        Self { src, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.position).copied()
    }

    /// Skips spaces and tabs.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.position += 1;
        }
    }

    /// Returns the next token. Once the input is exhausted every call
    /// returns `Eol`.
    pub fn scan(&mut self) -> PositionedToken {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.peek() else {
            return PositionedToken::new(start, Token::Eol, "");
        };

        if c.is_ascii_alphabetic() {
            return self.read_identifier();
        }

        self.position += 1;
        let token = match c {
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b',' => Token::Comma,
            b'=' => Token::Equals,
            b'!' => {
                if self.peek() != Some(b'=') {
                    return PositionedToken::new(start, Token::Illegal, "unexpected character '!'");
                }
                self.position += 1;
                Token::NotEquals
            }
            b'<' => self.with_equals(Token::Lte, Token::Less),
            b'>' => self.with_equals(Token::Gte, Token::Greater),
            b'\'' | b'"' => return self.read_quoted_string(start, c),
            _ => return self.illegal_char(start),
        };

        PositionedToken::new(start, token, "")
    }

    /// Consumes a trailing `=` if present.
    fn with_equals(&mut self, with: Token, without: Token) -> Token {
        if self.peek() == Some(b'=') {
            self.position += 1;
            with
        } else {
            without
        }
    }

    /// Reads a field name or keyword. Names are ASCII letters and dots, so
    /// `permissions.user` is a single variable.
    fn read_identifier(&mut self) -> PositionedToken {
        let start = self.position;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'.') {
            self.position += 1;
        }

        let word = &self.src[start..self.position];
        match Token::from_keyword(word) {
            Some(keyword) => PositionedToken::new(start, keyword, ""),
            None => PositionedToken::new(start, Token::Variable, word),
        }
    }

    /// Reads up to the next occurrence of the opening quote. There are no
    /// escape sequences.
    fn read_quoted_string(&mut self, start: usize, quote: u8) -> PositionedToken {
        let rest = &self.src.as_bytes()[self.position..];
        match rest.iter().position(|&b| b == quote) {
            Some(len) => {
                let literal = &self.src[self.position..self.position + len];
                self.position += len + 1;
                PositionedToken::new(start, Token::String, literal)
            }
            None => {
                self.position = self.src.len();
                PositionedToken::new(start, Token::Illegal, UNTERMINATED_STRING)
            }
        }
    }

    fn illegal_char(&mut self, start: usize) -> PositionedToken {
        // Step over the whole character so later slicing stays on a boundary.
        let ch = self.src[start..].chars().next().unwrap_or('\0');
        self.position = start + ch.len_utf8();
        PositionedToken::new(
            start,
            Token::Illegal,
            format!("unexpected character '{ch}'"),
        )
    }

    /// Collects tokens up to and including the first `Eol` or `Illegal`.
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        loop {
            let positioned = self.scan();
            let done = matches!(positioned.token, Token::Eol | Token::Illegal);
            tokens.push(positioned);
            if done {
                return tokens;
            }
        }
    }
}
