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

//! Regression harness: replays a `<hex-word-value> <expression>` corpus
//! through the full lex/parse/linearize/eval pipeline and reports any
//! mismatch. A mismatch on an expression that evaluated successfully is a
//! hard failure (non-zero exit); a mismatch caused by an evaluation error
//! is only counted, since the corpus may intentionally include faulting
//! expressions.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process::ExitCode;

use clap::Parser;

use dbgexpr::eval::eval;
use dbgexpr::lexer::lex;
use dbgexpr::machine::DemoMachine;
use dbgexpr::parser::parse;
use dbgexpr::postfix::linearize;
use dbgexpr::word::Word;

#[derive(Parser, Debug)]
#[command(name = "expr-test", about = "Replay a <hex> <expr> corpus through the expression engine")]
struct Cli {
    /// Path to the corpus file.
    path: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let file = match File::open(&cli.path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{}: {e}", cli.path);
            return ExitCode::FAILURE;
        }
    };

    let mut total = 0usize;
    let mut errors = 0usize;

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("line {}: {e}", lineno + 1);
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some((hex, expr)) = line.split_once(char::is_whitespace) else {
            eprintln!("line {}: expected `<hex> <expr>`, got {line:?}", lineno + 1);
            return ExitCode::FAILURE;
        };
        let expr = expr.trim();

        let Ok(expected) = Word::from_str_radix(hex, 16) else {
            eprintln!("line {}: not a hex word: {hex:?}", lineno + 1);
            return ExitCode::FAILURE;
        };

        let mut machine = DemoMachine::new(0, Vec::new());
        let actual = run(expr, &mut machine);

        match actual {
            Ok(actual) if actual == expected => {
                println!("{total:<7} dut: {actual:#010x}, ref: {expected:#010x}");
            }
            Ok(actual) => {
                println!("expr: {expr}\nref={expected:#010x}\ndut={actual:#010x}");
                eprintln!("total run: {total}, err: {}", errors + 1);
                return ExitCode::FAILURE;
            }
            Err(message) => {
                println!("expr: {expr}\nref={expected:#010x}\nerror: {message}");
                errors += 1;
            }
        }

        total += 1;
    }

    println!("total run: {total}, err: {errors}");
    ExitCode::SUCCESS
}

fn run(expr: &str, machine: &mut DemoMachine) -> Result<Word, String> {
    let tokens = lex(expr, &*machine).map_err(|e| e.to_string())?;
    let ast = parse(&tokens).map_err(|e| e.to_string())?;
    let postfix = linearize(&ast);
    eval(&postfix, machine).map_err(|e| e.to_string())
}
