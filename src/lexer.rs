//! Tokeniser for debugger expressions.
//!
//! Token rules are tried in order at the current offset; the first rule
//! whose pattern matches (anchored at that offset) wins, exactly as the
//! original tool's ordered regex table worked. Order matters: a
//! multi-character operator's rule must appear before any rule that is a
//! prefix of it, or the shorter rule would win first and the lexer would
//! never see the longer operator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::word::Word;

enum Rule {
    /// Consumed but emits no token (whitespace).
    Skip,
    /// A fixed operator or punctuation kind.
    Op(TokenKind),
    /// A numeric literal in the given radix.
    Num(u32),
    /// A register reference; the match includes the leading `$`.
    Reg,
}

struct CompiledRule {
    pattern: Regex,
    rule: Rule,
}

/// The ordered rule table, compiled once on first use.
static RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    use TokenKind::*;

    // (pattern, rule) in match-priority order. Patterns are anchored with
    // `^` so a match always starts exactly at the current offset.
    let specs: &[(&str, Rule)] = &[
        (r"0x[0-9a-f]+", Rule::Num(16)),
        (r"0X[0-9A-F]+", Rule::Num(16)),
        (r"[0-9]+",      Rule::Num(10)),
        (r"\$\w+",       Rule::Reg),

        // Signed comparisons/shift, longest-prefix-first within each group.
        (r"s<=", Rule::Op(SLe)),
        (r"s>=", Rule::Op(SGe)),
        (r"s>>", Rule::Op(SShr)),
        (r"s<",  Rule::Op(SLt)),
        (r"s>",  Rule::Op(SGt)),

        (r"==", Rule::Op(Eq)),
        (r"!=", Rule::Op(Ne)),
        (r"<<", Rule::Op(Shl)),
        (r"<=", Rule::Op(Le)),
        (r">>", Rule::Op(Shr)),
        (r">=", Rule::Op(Ge)),
        (r"&&", Rule::Op(LogAnd)),
        (r"\|\|", Rule::Op(LogOr)),

        (r"<", Rule::Op(Lt)),
        (r">", Rule::Op(Gt)),

        (r"\+", Rule::Op(Add)),
        (r"-",  Rule::Op(Sub)),
        (r"\*", Rule::Op(Mul)),
        (r"/",  Rule::Op(Div)),
        (r"%",  Rule::Op(Mod)),
        (r"&",  Rule::Op(BitAnd)),
        (r"\|", Rule::Op(BitOr)),
        (r"\^", Rule::Op(BitXor)),
        (r"~",  Rule::Op(BitNot)),
        (r"!",  Rule::Op(LogNot)),
        (r"\(", Rule::Op(LParen)),
        (r"\)", Rule::Op(RParen)),

        (r"\s+", Rule::Skip),
    ];

    specs
        .iter()
        .map(|(pat, rule)| CompiledRule {
            pattern: Regex::new(&format!("^(?:{pat})")).expect("built-in pattern is valid"),
            rule: match rule {
                Rule::Skip => Rule::Skip,
                Rule::Op(k) => Rule::Op(*k),
                Rule::Num(r) => Rule::Num(*r),
                Rule::Reg => Rule::Reg,
            },
        })
        .collect()
});

/// Resolves a register name (without the leading `$`) to a value. This is
/// the lexer's half of the collaborator boundary described by
/// [`crate::machine::MachineState`]: the lexer only needs to know whether
/// the name exists, not its current value.
pub trait RegisterNames {
    fn is_register(&self, name: &str) -> bool;
}

/// Tokenises `input` completely, returning the token sequence (always
/// terminated by one [`TokenKind::End`]) or the first lex failure.
pub fn lex(input: &str, registers: &impl RegisterNames) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let rest = &input[offset..];
        let Some(compiled) = RULES.iter().find(|r| r.pattern.is_match(rest)) else {
            return Err(LexError::NoMatch { offset });
        };

        let m = compiled.pattern.find(rest).expect("is_match implies find");
        let text = m.as_str();
        let len = text.len();

        match &compiled.rule {
            Rule::Skip => {}

            Rule::Num(radix) => {
                let digits = if *radix == 16 { &text[2..] } else { text };
                let value = Word::from_str_radix(digits, *radix).map_err(|_| {
                    LexError::NumberOverflow { offset, text: text.to_string() }
                })?;
                tokens.push(Token::num(value));
            }

            Rule::Reg => {
                let name = &text[1..];
                if !registers.is_register(name) {
                    return Err(LexError::UnknownRegister {
                        offset,
                        name: name.to_string(),
                    });
                }
                tokens.push(Token::reg(name));
            }

            Rule::Op(kind) => tokens.push(Token::new(*kind)),
        }

        offset += len;
    }

    tokens.push(Token::new(TokenKind::End));
    Ok(tokens)
}
