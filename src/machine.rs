//! A small in-memory stand-in for the inferior being debugged.
//!
//! Real register and memory access belongs to whatever front-end embeds
//! this crate; `DemoMachine` exists so the REPL, the regression harness,
//! and this crate's own tests have a concrete, dependency-free
//! [`MachineState`] to run expressions against.

use crate::error::EvalError;
use crate::eval::MachineState;
use crate::lexer::RegisterNames;
use crate::word::Word;

/// A fixed register file plus a flat byte buffer addressed starting at
/// `base`. Reads outside `[base, base + memory.len())` are out of bounds.
pub struct DemoMachine {
    names: Vec<&'static str>,
    values: Vec<Word>,
    base: Word,
    memory: Vec<u8>,
}

/// RISC-V-style ABI register names, matching the order `pc` is reported
/// separately in `info r` output.
const REGISTER_NAMES: &[&str] = &[
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

impl DemoMachine {
    /// Creates a machine with all registers zeroed and `memory.len()`
    /// bytes of memory starting at `base`.
    pub fn new(base: Word, memory: Vec<u8>) -> Self {
        let names = REGISTER_NAMES.iter().chain(["pc"].iter()).copied().collect::<Vec<_>>();
        let values = vec![0; names.len()];
        Self { names, values, base, memory }
    }

    /// Sets `name` to `value`; panics if `name` is not a known register,
    /// since this is test/demo setup code, not a user-facing path.
    pub fn set_register(&mut self, name: &str, value: Word) {
        let index = self.index_of(name).unwrap_or_else(|| panic!("no such register {name:?}"));
        self.values[index] = value;
    }

    /// Iterates all registers in display order, for `info r`.
    pub fn registers(&self) -> impl Iterator<Item = (&str, Word)> {
        self.names.iter().copied().zip(self.values.iter().copied())
    }

    /// Current value of `pc`, the last entry in the register file.
    pub fn pc(&self) -> Word {
        *self.values.last().expect("pc is always present")
    }

    /// Advances `pc` by one word, standing in for "execute one
    /// instruction" since this crate has no ISA decoder of its own. The
    /// REPL's `si` command calls this once per step.
    pub fn step(&mut self) {
        let pc = self.values.last_mut().expect("pc is always present");
        *pc = pc.wrapping_add(crate::word::WORD_BYTES as Word);
    }

    /// Resolves either an ABI name (`a0`, `sp`, `pc`, ...) or a numeric
    /// name (`r0`..`r31`, aliasing `x0`..`x31` in ABI order) to an index.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|&n| n == name).or_else(|| {
            let n: usize = name.strip_prefix('r')?.parse().ok()?;
            (n < REGISTER_NAMES.len()).then_some(n)
        })
    }
}

impl RegisterNames for DemoMachine {
    fn is_register(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

impl MachineState for DemoMachine {
    fn resolve_register(&self, name: &str) -> Option<Word> {
        self.index_of(name).map(|i| self.values[i])
    }

    fn read_word(&mut self, addr: Word) -> Result<Word, EvalError> {
        let offset = addr.checked_sub(self.base).ok_or(EvalError::OutOfBounds(addr))?;
        let offset = offset as usize;
        let bytes: [u8; crate::word::WORD_BYTES] = self
            .memory
            .get(offset..offset + crate::word::WORD_BYTES)
            .ok_or(EvalError::OutOfBounds(addr))?
            .try_into()
            .map_err(|_| EvalError::OutOfBounds(addr))?;
        Ok(Word::from_le_bytes(bytes))
    }
}
