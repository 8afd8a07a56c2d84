//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use super::token::Token;

/// A node of a parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A comparison (`name = 'x'`) or a combination (`a and b`).
    Binary(BinaryExpr),

    /// A field reference. May contain dots (`permissions.user`).
    Var(String),

    /// A string literal.
    Str(String),

    /// A bracketed list of string literals, the right operand of `in`.
    List(Vec<String>),
}

/// A binary node.
///
/// The parser only produces two shapes: a *comparison*, whose left side is
/// an [`Expr::Var`] and whose right side is an [`Expr::Str`] or
/// [`Expr::List`], and a *combinator* (`and`/`or`) whose sides are both
/// binary nodes.
///
/// A chain of `n` comparisons is a left-leaning tree `n - 1` levels deep.
/// Rendering, comparison and drop walk it with an explicit stack, so depth
/// is bounded by memory rather than by the call stack. `Clone` and `Debug`
/// are still recursive.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: Token,
    pub right: Box<Expr>,
}

impl BinaryExpr {
    /// Creates a binary node.
    pub fn new(left: Expr, op: Token, right: Expr) -> Self {
        Self {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Returns true if this node joins two sub-expressions with `and`/`or`.
    pub fn is_combinator(&self) -> bool {
        self.op.is_combinator()
    }
}

impl Expr {
    /// Creates a binary node wrapped in an `Expr`.
    ///
    /// # Example
    ///
    /// ```
    /// use album_filter_rs::filter::{Expr, Token};
    ///
    /// let expr = Expr::binary(Expr::var("name"), Token::Equals, Expr::str("test"));
    /// assert_eq!(expr.to_string(), r#"("name" = "test")"#);
    /// ```
    pub fn binary(left: Expr, op: Token, right: Expr) -> Self {
        Expr::Binary(BinaryExpr::new(left, op, right))
    }

    /// Creates a field reference.
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    /// Creates a string literal.
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// Creates a list literal.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::List(items.into_iter().map(Into::into).collect())
    }

    /// Short description of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Binary(_) => "expression",
            Expr::Var(_) => "variable",
            Expr::Str(_) => "string",
            Expr::List(_) => "list",
        }
    }
}

impl PartialEq for BinaryExpr {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.op != b.op {
                return false;
            }
            for (x, y) in [(&*a.left, &*b.left), (&*a.right, &*b.right)] {
                match (x, y) {
                    (Expr::Binary(x), Expr::Binary(y)) => pending.push((x, y)),
                    (Expr::Binary(_), _) | (_, Expr::Binary(_)) => return false,
                    (x, y) if x != y => return false,
                    _ => {}
                }
            }
        }
        true
    }
}

impl Eq for BinaryExpr {}

impl Drop for BinaryExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_binary(&mut self.left, &mut pending);
        detach_binary(&mut self.right, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_binary(&mut node.left, &mut pending);
            detach_binary(&mut node.right, &mut pending);
            // `node` now only owns leaves and drops without recursing.
        }
    }
}

/// Moves a binary child out of `slot` onto `pending`, leaving an empty leaf.
fn detach_binary(slot: &mut Expr, pending: &mut Vec<BinaryExpr>) {
    if matches!(slot, Expr::Binary(_)) {
        if let Expr::Binary(node) = std::mem::replace(slot, Expr::List(Vec::new())) {
            pending.push(node);
        }
    }
}

/// One step of rendering a tree without recursion.
enum Render<'a> {
    Node(&'a BinaryExpr),
    Operand(&'a Expr),
    Op(Token),
    Close,
}

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Render::Node(self)];
        while let Some(step) = stack.pop() {
            match step {
                Render::Node(node) => {
                    f.write_str("(")?;
                    stack.push(Render::Close);
                    stack.push(Render::Operand(&*node.right));
                    stack.push(Render::Op(node.op));
                    stack.push(Render::Operand(&*node.left));
                }
                Render::Operand(Expr::Binary(node)) => stack.push(Render::Node(node)),
                Render::Operand(leaf) => fmt::Display::fmt(leaf, f)?,
                Render::Op(op) => write!(f, " {op} ")?,
                Render::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(binary) => fmt::Display::fmt(binary, f),
            Expr::Var(name) => write_quoted(f, name),
            Expr::Str(value) => write_quoted(f, value),
            Expr::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
