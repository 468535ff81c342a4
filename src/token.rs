//! Lexical tokens.

use crate::word::Word;

/// The kind of a lexical token.
///
/// Mirrors the grammar in the expression surface: numeric and register
/// leaves, the C-like operator set (minus assignment, increment/decrement,
/// and the ternary operator), parentheses, and the terminator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// An integer literal.
    Num,

    /// A register reference, e.g. `$a0`.
    Reg,

    // === Arithmetic ===
    /// `+` - addition, or unary identity.
    Add,
    /// `-` - subtraction, or unary negation.
    Sub,
    /// `*` - multiplication, or (unary) memory dereference.
    Mul,
    /// `/` - unsigned division.
    Div,
    /// `%` - unsigned modulo.
    Mod,

    // === Bitwise ===
    /// `&` - bitwise AND.
    BitAnd,
    /// `|` - bitwise OR.
    BitOr,
    /// `^` - bitwise XOR.
    BitXor,
    /// `~` - bitwise complement (unary only).
    BitNot,

    // === Shifts ===
    /// `<<` - logical left shift.
    Shl,
    /// `>>` - logical (unsigned) right shift.
    Shr,
    /// `s>>` - arithmetic (signed) right shift.
    SShr,

    // === Comparisons ===
    /// `<` - unsigned less-than.
    Lt,
    /// `>` - unsigned greater-than.
    Gt,
    /// `<=` - unsigned less-or-equal.
    Le,
    /// `>=` - unsigned greater-or-equal.
    Ge,
    /// `s<` - signed less-than.
    SLt,
    /// `s>` - signed greater-than.
    SGt,
    /// `s<=` - signed less-or-equal.
    SLe,
    /// `s>=` - signed greater-or-equal.
    SGe,
    /// `==` - equality.
    Eq,
    /// `!=` - inequality.
    Ne,

    // === Logical ===
    /// `!` - logical NOT (unary only).
    LogNot,
    /// `&&` - logical AND (not short-circuited; see evaluator).
    LogAnd,
    /// `||` - logical OR (not short-circuited; see evaluator).
    LogOr,

    // === Grouping ===
    /// `(`
    LParen,
    /// `)`
    RParen,

    /// End of token stream.
    End,
}

impl TokenKind {
    /// Returns the display name used in diagnostics, e.g. `"s>>"`.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Num    => "number",
            Reg    => "register",
            Add    => "+",
            Sub    => "-",
            Mul    => "*",
            Div    => "/",
            Mod    => "%",
            BitAnd => "&",
            BitOr  => "|",
            BitXor => "^",
            BitNot => "~",
            Shl    => "<<",
            Shr    => ">>",
            SShr   => "s>>",
            Lt     => "<",
            Gt     => ">",
            Le     => "<=",
            Ge     => ">=",
            SLt    => "s<",
            SGt    => "s>",
            SLe    => "s<=",
            SGe    => "s>=",
            Eq     => "==",
            Ne     => "!=",
            LogNot => "!",
            LogAnd => "&&",
            LogOr  => "||",
            LParen => "(",
            RParen => ")",
            End    => "end",
        }
    }

    /// Returns true for operators that can appear as a unary prefix:
    /// `+ - * ! ~`.
    pub fn can_be_unary(self) -> bool {
        use TokenKind::*;
        matches!(self, Add | Sub | Mul | LogNot | BitNot)
    }
}

/// A lexical token: a kind, an optional numeric value, the source text (used
/// for register names and diagnostics), and (for operators) whether the
/// parser determined this occurrence to be unary.
///
/// The lexer never sets `unary`; only the parser does, and only for tokens
/// where [`TokenKind::can_be_unary`] holds. The linearizer preserves the
/// flag, and it is the only signal the evaluator uses to tell a unary `*`
/// (dereference) from a binary `*` (multiplication), and so on for `+`/`-`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub unary: bool,
    pub value: Word,
    /// For `Reg`, the register name without the leading `$`. Unused
    /// otherwise; [`TokenKind::name`] supplies the display text for
    /// everything else.
    pub text: String,
}

impl Token {
    /// Creates a non-unary, valueless token of the given kind.
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, unary: false, value: 0, text: String::new() }
    }

    /// Creates a `Num` token carrying `value`.
    pub fn num(value: Word) -> Self {
        Self { kind: TokenKind::Num, unary: false, value, text: String::new() }
    }

    /// Creates a `Reg` token naming `register` (without the leading `$`).
    pub fn reg(register: impl Into<String>) -> Self {
        Self { kind: TokenKind::Reg, unary: false, value: 0, text: register.into() }
    }

    /// Returns the display text for error messages: the register name for
    /// `Reg`, the operator/keyword spelling otherwise.
    pub fn display_name(&self) -> &str {
        if self.kind == TokenKind::Reg {
            &self.text
        } else {
            self.kind.name()
        }
    }

    /// Returns a copy of this token with the unary flag set.
    pub fn as_unary(mut self) -> Self {
        self.unary = true;
        self
    }
}
