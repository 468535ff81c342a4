//! Error model for the expression engine.
//!
//! Every fallible stage returns a typed error instead of aborting the
//! process; callers render the returned value as a single line (plus, for
//! lex/parse errors, a caret line) and move on. See [`ExprError`] for the
//! umbrella type used by whole-expression operations.

use std::fmt;

use crate::token::{Token, TokenKind};
use crate::word::Word;

/// A failure in the lexer: no rule matched, a literal overflowed `Word`, or
/// a `$name` did not resolve to a known register.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LexError {
    #[error("no token matches at offset {offset}")]
    NoMatch { offset: usize },

    #[error("number {text:?} does not fit in a machine word")]
    NumberOverflow { offset: usize, text: String },

    #[error("unknown register name {name:?}")]
    UnknownRegister { offset: usize, name: String },
}

impl LexError {
    /// Byte offset into the source expression where the failure begins.
    pub fn offset(&self) -> usize {
        match *self {
            LexError::NoMatch { offset }
            | LexError::NumberOverflow { offset, .. }
            | LexError::UnknownRegister { offset, .. } => offset,
        }
    }

    /// Renders the source with a caret under the offending character.
    pub fn render(&self, source: &str) -> String {
        caret_line(source, self.offset()) + "\n" + &self.to_string()
    }
}

/// A failure in the parser: a grammar violation.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected an expression, found {found}")]
    ExpectedExpr { index: usize, found: String },

    #[error("expected ')', found {found}")]
    ExpectedRParen { index: usize, found: String },

    #[error("unexpected token {found} after a complete expression")]
    TrailingInput { index: usize, found: String },
}

impl ParseError {
    /// Index, within the token stream, of the first offending token.
    pub fn index(&self) -> usize {
        match *self {
            ParseError::ExpectedExpr { index, .. }
            | ParseError::ExpectedRParen { index, .. }
            | ParseError::TrailingInput { index, .. } => index,
        }
    }

    /// Renders the token stream (space-joined display names) with a caret
    /// under the offending token, since the parser only has token positions
    /// to work with, not raw source offsets.
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut line = String::new();
        let mut caret_col = 0;

        for (i, tok) in tokens.iter().enumerate() {
            if i == self.index() {
                caret_col = line.chars().count();
            }
            if i > 0 {
                line.push(' ');
            }
            line.push_str(tok.display_name());
        }

        format!("{line}\n{}^\n{}", " ".repeat(caret_col), self)
    }
}

/// A failure during evaluation of an otherwise well-formed postfix sequence.
#[derive(Clone, Debug, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivideByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("out-of-bounds memory read at {0:#x}")]
    OutOfBounds(Word),

    #[error("unknown register {0:?}")]
    UnknownRegister(String),
}

/// The union of everything that can go wrong evaluating one expression,
/// from lexing through evaluation.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ExprError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A failure operating on the watchpoint pool.
#[derive(Clone, Debug, thiserror::Error)]
pub enum WatchpointError {
    #[error("watchpoint pool is full")]
    PoolFull,

    #[error("watchpoint {0} not found")]
    NotFound(usize),

    #[error(transparent)]
    Expr(#[from] ExprError),
}

/// Builds a two-line `<source>\n<caret>` fragment pointing at byte `offset`.
fn caret_line(source: &str, offset: usize) -> String {
    let col = source[..offset.min(source.len())].chars().count();
    format!("{source}\n{}^", " ".repeat(col))
}

/// Helper so call sites can render any of the per-stage errors without a
/// `match`, given the inputs each stage needs for its caret line.
pub fn render(err: &ExprError, source: &str, tokens: &[Token]) -> String {
    match err {
        ExprError::Lex(e) => e.render(source),
        ExprError::Parse(e) => e.render(tokens),
        ExprError::Eval(e) => e.to_string(),
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
