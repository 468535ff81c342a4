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

//! A debugger expression engine: lex, parse, linearize, and evaluate
//! C-like integer expressions against register and memory state, and a
//! watchpoint pool built on top of it.
//!
//! The pipeline is a straight line from source text to a machine word:
//! [`lexer::lex`] produces a token stream, [`parser::parse`] builds an
//! [`ast::Ast`], [`postfix::linearize`] flattens it to postfix, and
//! [`eval::eval`] walks the postfix sequence against anything implementing
//! [`eval::MachineState`]. [`watchpoint::WatchpointEngine`] keeps compiled
//! expressions around and re-evaluates them on demand.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod machine;
pub mod parser;
pub mod pool;
pub mod postfix;
pub mod token;
pub mod watchpoint;
pub mod word;
