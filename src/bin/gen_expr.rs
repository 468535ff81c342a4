// This file is part of dbgexpr, a debugger expression engine.
// Copyright 2022 Jeffrey Sharp
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// dbgexpr is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// dbgexpr is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with dbgexpr.  If not, see <http://www.gnu.org/licenses/>.

//! Generates random arithmetic expressions (`+ - * / % & | ^` over
//! unsigned literals only; no registers, no memory dereference) and
//! writes `<hex> <expr>` lines for [`expr-test`](crate) to replay.
//!
//! Ground truth is this crate's own evaluator, run once here at
//! generation time, at `Word` width with wrapping semantics — there is
//! no independent reference implementation in this environment, so this
//! harness mainly guards against regressions across refactors of the
//! lexer/parser/evaluator pipeline, not against a second, trusted
//! implementation of C arithmetic (see DESIGN.md).

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dbgexpr::eval::eval;
use dbgexpr::lexer::lex;
use dbgexpr::machine::DemoMachine;
use dbgexpr::parser::parse;
use dbgexpr::postfix::linearize;
use dbgexpr::word::Word;

const OPS: &[char] = &['+', '-', '*', '/', '%', '&', '|', '^'];

/// Expressions with a token count outside this range are discarded.
const MIN_TOKENS: usize = 5;
const MAX_TOKENS: usize = 1023;

#[derive(Parser, Debug)]
#[command(name = "gen-expr", about = "Generate a random-expression regression corpus")]
struct Cli {
    /// Number of `<hex> <expr>` lines to emit.
    count: usize,

    /// Seed for the PRNG; omit for a nondeterministic run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut emitted = 0;
    let mut attempts = 0;
    while emitted < cli.count {
        attempts += 1;
        if attempts > cli.count.saturating_mul(1000).max(10_000) {
            eprintln!("giving up: too many discarded attempts");
            std::process::exit(1);
        }

        let mut gen = Generator { rng: &mut rng, depth: 0 };
        let expr = gen.expr();

        let token_count = token_count(&expr);
        if !(MIN_TOKENS..=MAX_TOKENS).contains(&token_count) {
            continue;
        }

        let mut machine = DemoMachine::new(0, Vec::new());
        let Ok(value) = evaluate(&expr, &mut machine) else { continue };

        println!("{value:08x} {expr}");
        emitted += 1;
    }
}

/// Rough token count: every operator, parenthesis, and number contributes
/// one token, which is enough precision to gate expression size.
fn token_count(expr: &str) -> usize {
    dbgexpr::lexer::lex(expr, &AllRegisters).map(|t| t.len().saturating_sub(1)).unwrap_or(0)
}

struct AllRegisters;
impl dbgexpr::lexer::RegisterNames for AllRegisters {
    fn is_register(&self, _name: &str) -> bool {
        true
    }
}

fn evaluate(expr: &str, machine: &mut DemoMachine) -> Result<Word, ()> {
    let tokens = lex(expr, &*machine).map_err(|_| ())?;
    let ast = parse(&tokens).map_err(|_| ())?;
    eval(&linearize(&ast), machine).map_err(|_| ())
}

/// Recursive-descent text generator: at each step, either emit a number,
/// recurse with extra whitespace, wrap in parens (optionally negated), or
/// combine two sub-expressions with a random operator.
struct Generator<'r> {
    rng: &'r mut StdRng,
    depth: u32,
}

impl Generator<'_> {
    fn expr(&mut self) -> String {
        self.depth += 1;
        // Bottom out once nesting gets deep, to keep generated text finite.
        let choice = if self.depth >= 8 { 0 } else { self.rng.gen_range(0..8) };

        let out = match choice {
            0 => self.num(),
            1 => format!(" {}", self.expr()),
            2 => format!("(- {})", self.expr()),
            3 => format!("({})", self.expr()),
            _ => {
                let left = self.expr();
                let op = OPS[self.rng.gen_range(0..OPS.len())];
                let right = self.expr();
                format!("{left}{op}{right}")
            }
        };

        self.depth -= 1;
        out
    }

    fn num(&mut self) -> String {
        let value: Word = self.rng.gen();
        if self.rng.gen_bool(0.5) {
            value.to_string()
        } else {
            format!("0x{value:x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_expression_is_lexable_and_parseable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut gen = Generator { rng: &mut rng, depth: 0 };
        let expr = gen.expr();
        let mut machine = DemoMachine::new(0, Vec::new());
        assert!(evaluate(&expr, &mut machine).is_ok() || token_count(&expr) > 0);
    }

    #[test]
    fn token_count_matches_lexer_output_minus_end() {
        assert_eq!(token_count("1 + 2"), 3);
    }
}
