//! Error types for compiling and evaluating filters.

use thiserror::Error;

/// A specialized Result type for operations that compile and evaluate.
pub type FilterResult<T> = Result<T, FilterError>;

/// A syntax error in a filter expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error at {position}: {message}")]
pub struct ParseError {
    /// Byte offset of the token that triggered the failure.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error.
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Message suitable for showing to the person who typed the filter.
    pub fn diagnostic(&self) -> String {
        format!(
            "invalid filter expression near character {}: {}",
            self.position, self.message
        )
    }
}

/// Errors raised while evaluating a compiled filter against a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    /// The operator cannot be used with the field's type.
    #[error("wrong op: '{op}' cannot be used with field '{field}'")]
    WrongOp {
        /// The field being compared.
        field: String,
        /// The operator text.
        op: String,
    },

    /// The expression references a field albums do not have.
    #[error("album field not found: '{field}'{}", format_suggestion(.suggestion))]
    FieldNotFound {
        /// The unknown field name.
        field: String,
        /// A known field with a similar name.
        suggestion: Option<String>,
    },

    /// A `date` comparison whose value is not `DD/MM/YYYY`.
    #[error("expected date (DD/MM/YYYY) instead of '{value}'")]
    InvalidDate {
        /// The literal that failed to parse.
        value: String,
    },

    /// A `like` pattern that is not a valid regular expression.
    #[error("failed to compile pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Why the regex engine rejected it.
        reason: String,
    },

    /// An operand of the wrong kind, e.g. a string on the right of `in`.
    #[error("expected {expected} instead of {found}")]
    UnexpectedOperand {
        /// What the operator needs.
        expected: &'static str,
        /// What the expression contains.
        found: String,
    },
}

fn format_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl EvalError {
    /// Creates a wrong operator error.
    pub fn wrong_op(field: impl Into<String>, op: impl ToString) -> Self {
        EvalError::WrongOp {
            field: field.into(),
            op: op.to_string(),
        }
    }

    /// Creates an unexpected operand error.
    pub fn unexpected_operand(expected: &'static str, found: impl Into<String>) -> Self {
        EvalError::UnexpectedOperand {
            expected,
            found: found.into(),
        }
    }

    /// Returns true for [`EvalError::WrongOp`].
    pub fn is_wrong_op(&self) -> bool {
        matches!(self, EvalError::WrongOp { .. })
    }

    /// Returns true for [`EvalError::FieldNotFound`].
    pub fn is_field_not_found(&self) -> bool {
        matches!(self, EvalError::FieldNotFound { .. })
    }
}

/// Any error from compiling or evaluating a filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The expression could not be evaluated against a record.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
