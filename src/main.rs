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

//! Interactive debugger REPL built on the expression engine in [`dbgexpr`].
//!
//! This binary is the thin command dispatcher described by the expanded
//! specification (component I): it owns a [`DemoMachine`] and a
//! [`WatchpointEngine`], reads lines via `rustyline`, and turns each line
//! into a call into the engine. It contains no expression-evaluation logic
//! of its own.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use dbgexpr::eval::eval;
use dbgexpr::lexer::lex;
use dbgexpr::machine::DemoMachine;
use dbgexpr::parser::parse;
use dbgexpr::postfix::linearize;
use dbgexpr::watchpoint::WatchpointEngine;
use dbgexpr::word::{format_hex, Word, WORD_BITS};

/// The name of the debugger.
pub const PROGRAM_NAME: &str = "dbgexpr";

/// A toy instruction-set-emulator monitor demonstrating the debugger
/// expression engine: integer expressions over registers and memory,
/// print/watch/examine commands, and watchpoints that halt on change.
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME, version, about)]
struct Cli {
    /// Read commands from `FILE` instead of the interactive prompt.
    #[arg(long, value_name = "FILE")]
    batch: Option<PathBuf>,

    /// Disable colored diagnostics (same effect as setting `NO_COLOR`).
    #[arg(long)]
    no_color: bool,

    /// Asserts that this build uses a 64-bit machine word. This crate's
    /// word width is fixed at compile time by the `word64` Cargo feature;
    /// the flag exists so a batch script can fail fast on a mismatched
    /// build rather than silently compare against the wrong width.
    #[arg(long)]
    word64: bool,
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let built_for_word64 = cfg!(feature = "word64");
    if cli.word64 != built_for_word64 {
        eprintln!(
            "{}",
            format!(
                "warning: --word64={} but this build uses a {}-bit word",
                cli.word64, WORD_BITS
            )
            .yellow()
        );
    }

    let mut session = Session::new();

    let result = match &cli.batch {
        Some(path) => run_batch(&mut session, path),
        None => run_interactive(&mut session),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}: {}", PROGRAM_NAME.red(), message);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Demo memory region: 4 KiB starting at address 0.
const DEMO_MEMORY_SIZE: usize = 4096;
const DEMO_MEMORY_BASE: Word = 0;

/// Owns the demo machine and watchpoint pool that back one REPL session.
struct Session {
    machine: DemoMachine,
    watchpoints: WatchpointEngine,
}

impl Session {
    fn new() -> Self {
        Self {
            machine: DemoMachine::new(DEMO_MEMORY_BASE, vec![0; DEMO_MEMORY_SIZE]),
            watchpoints: WatchpointEngine::new(),
        }
    }

    /// Dispatches one command line. Returns `false` for `q`, `true`
    /// otherwise (including on a reported, non-fatal error).
    fn dispatch(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }

        let (cmd, args) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "q" | "quit" | "exit" => return false,
            "help" => self.cmd_help(args),
            "p" | "print" => self.cmd_print(args),
            "w" | "watch" => self.cmd_watch(args),
            "d" | "delete" => self.cmd_delete(args),
            "info" => self.cmd_info(args),
            "x" => self.cmd_examine(args),
            "si" => self.cmd_step(args),
            _ => println!("{}", format!("unknown command {cmd:?}").red()),
        }

        true
    }

    fn cmd_print(&mut self, args: &str) {
        if args.is_empty() {
            println!("{}", "p requires an expression".red());
            return;
        }
        match eval_expr(args, &mut self.machine) {
            Ok(value) => println!("{}", format_hex(value)),
            Err(message) => println!("{}", message.red()),
        }
    }

    fn cmd_watch(&mut self, args: &str) {
        if args.is_empty() {
            println!("{}", "w requires an expression".red());
            return;
        }
        match self.watchpoints.new_watchpoint(args, &mut self.machine) {
            Ok(no) => println!("watchpoint {no}"),
            Err(error) => println!("{}", error.to_string().red()),
        }
    }

    fn cmd_delete(&mut self, args: &str) {
        if args.is_empty() {
            self.watchpoints.free_all();
            return;
        }
        match args.parse::<usize>() {
            Ok(no) => match self.watchpoints.free(no) {
                Ok(()) => println!("deleted watchpoint {no}"),
                Err(error) => println!("{}", error.to_string().red()),
            },
            Err(_) => println!("{}", format!("not a watchpoint number: {args:?}").red()),
        }
    }

    fn cmd_info(&self, args: &str) {
        match args {
            "r" | "reg" | "registers" => {
                for (name, value) in self.machine.registers() {
                    println!("{name:<5} {}", format_hex(value));
                }
            }
            "w" | "watch" | "watchpoints" => {
                let mut any = false;
                for (no, source, value) in self.watchpoints.display() {
                    any = true;
                    println!("watchpoint {no:2}: {source}  (= {})", format_hex(value));
                }
                if !any {
                    println!("no watchpoints");
                }
            }
            _ => println!("{}", format!("unknown info topic: {args:?}").red()),
        }
    }

    fn cmd_examine(&mut self, args: &str) {
        let Some((count, expr)) = args.split_once(char::is_whitespace) else {
            println!("{}", "x requires a count and an expression".red());
            return;
        };
        let Ok(count) = count.parse::<usize>() else {
            println!("{}", format!("not a count: {count:?}").red());
            return;
        };

        let addr = match eval_expr(expr.trim(), &mut self.machine) {
            Ok(addr) => addr,
            Err(message) => {
                println!("{}", message.red());
                return;
            }
        };

        for i in 0..count {
            let word_addr = addr.wrapping_add((i * 4) as Word);
            match self.machine_read_word(word_addr) {
                Ok(value) => println!("{}:  {:08x}", format_hex(word_addr), value),
                Err(message) => {
                    println!("{}", message.red());
                    return;
                }
            }
        }
    }

    fn machine_read_word(&mut self, addr: Word) -> Result<Word, String> {
        use dbgexpr::eval::MachineState;
        self.machine.read_word(addr).map_err(|e| e.to_string())
    }

    fn cmd_step(&mut self, args: &str) {
        let count = if args.is_empty() {
            1
        } else {
            match args.parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    println!("{}", format!("not a step count: {args:?}").red());
                    return;
                }
            }
        };

        for _ in 0..count {
            self.machine.step();
            let hits = self.watchpoints.scan(&mut self.machine, self.machine.pc());
            if hits.is_empty() {
                continue;
            }
            for hit in &hits {
                println!(
                    "{}",
                    format!(
                        "watchpoint {} hit at pc {}: {}",
                        hit.no,
                        format_hex(hit.pc),
                        hit.expr
                    )
                    .yellow()
                );
                println!("  old value = {}", format_hex(hit.old));
                println!("  new value = {}", format_hex(hit.new));
            }
            // A watchpoint hit stops a multi-step run early.
            break;
        }
    }

    fn cmd_help(&self, args: &str) {
        const COMMANDS: &[(&str, &str)] = &[
            ("help [cmd]", "list commands, or describe one"),
            ("p <expr>", "evaluate an expression and print it in hex"),
            ("w <expr>", "install a watchpoint, printing its assigned number"),
            ("d [no]", "delete watchpoint `no`, or all watchpoints if omitted"),
            ("info r", "dump all registers and pc"),
            ("info w", "list active watchpoints"),
            ("x <n> <expr>", "print n consecutive words starting at <expr>"),
            ("si [n]", "single-step n times (default 1), scanning watchpoints"),
            ("q", "quit"),
        ];

        if args.is_empty() {
            for (name, description) in COMMANDS {
                println!("{name:<14} {description}");
            }
            return;
        }

        match COMMANDS.iter().find(|(name, _)| name.split_whitespace().next() == Some(args)) {
            Some((name, description)) => println!("{name} - {description}"),
            None => println!("{}", format!("unknown command {args:?}").red()),
        }
    }
}

/// Runs the full lex/parse/linearize/eval pipeline over one expression,
/// rendering any lex/parse failure as a caret-annotated message.
fn eval_expr(src: &str, machine: &mut DemoMachine) -> Result<Word, String> {
    let tokens = lex(src, &*machine).map_err(|e| e.render(src))?;
    let ast = parse(&tokens).map_err(|e| e.render(&tokens))?;
    let postfix = linearize(&ast);
    eval(&postfix, machine).map_err(|e| e.to_string())
}

fn run_interactive(session: &mut Session) -> Result<(), String> {
    let mut editor = DefaultEditor::new().map_err(|e| e.to_string())?;
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(&format!("({}) ", PROGRAM_NAME.green())) {
            Ok(line) => {
                let _ = editor.add_history_entry(&line);
                if !session.dispatch(&line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.to_string()),
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
    Ok(())
}

fn run_batch(session: &mut Session, path: &PathBuf) -> Result<(), String> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| e.to_string())?;
        if !session.dispatch(&line) {
            break;
        }
    }
    Ok(())
}

fn history_path() -> Option<PathBuf> {
    let mut path = dirs_next_home()?;
    path.push(".dbgexpr_history");
    Some(path)
}

/// A tiny stand-in for a `dirs`-style crate: just `$HOME`, or `None` on
/// platforms where history simply won't persist.
fn dirs_next_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_evaluates_and_does_not_crash_on_error() {
        let mut session = Session::new();
        assert!(session.dispatch("p 1 + 2 * 3"));
        assert!(session.dispatch("p 10 / 0"));
    }

    #[test]
    fn watch_and_delete_round_trip() {
        let mut session = Session::new();
        assert!(session.dispatch("w 1 + 1"));
        assert_eq!(session.watchpoints.display().count(), 1);
        assert!(session.dispatch("d 1"));
        assert_eq!(session.watchpoints.display().count(), 0);
    }

    #[test]
    fn quit_stops_dispatch_loop() {
        let mut session = Session::new();
        assert!(!session.dispatch("q"));
    }

    #[test]
    fn step_reports_pc_watchpoint_hit() {
        let mut session = Session::new();
        assert!(session.dispatch("w $pc"));
        session.dispatch("si 1");
        // pc advanced by one word, so the watchpoint's stored value must
        // have followed it.
        let (_, _, value) = session.watchpoints.display().next().unwrap();
        assert_eq!(value, session.machine.pc());
    }
}
