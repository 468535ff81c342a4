//! Watchpoints: expressions re-evaluated after every step, reported when
//! their value changes.

use crate::error::{ExprError, WatchpointError};
use crate::eval::{eval, MachineState};
use crate::lexer::{lex, RegisterNames};
use crate::parser::parse;
use crate::pool::{OrderedPool, Pooled};
use crate::postfix::linearize;
use crate::token::Token;
use crate::word::Word;

/// Number of watchpoint slots available at once.
pub const DEFAULT_CAPACITY: usize = 32;

struct Watchpoint {
    no: usize,
    next: Option<usize>,
    source: String,
    postfix: Vec<Token>,
    value: Word,
    old_value: Word,
}

impl Pooled for Watchpoint {
    fn no(&self) -> usize { self.no }
    fn next(&self) -> Option<usize> { self.next }
    fn set_next(&mut self, next: Option<usize>) { self.next = next; }
}

/// One watchpoint whose expression's value changed since it was last
/// checked.
#[derive(Clone, Debug)]
pub struct WatchpointHit {
    pub no: usize,
    pub pc: Word,
    pub expr: String,
    pub old: Word,
    pub new: Word,
}

/// Owns the watchpoint pool and drives `scan`/`new`/`free`/`display`.
pub struct WatchpointEngine {
    pool: OrderedPool<Watchpoint>,
}

impl WatchpointEngine {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let pool = OrderedPool::new(capacity, |i| Watchpoint {
            no: i + 1,
            next: None,
            source: String::new(),
            postfix: Vec::new(),
            value: 0,
            old_value: 0,
        });
        Self { pool }
    }

    /// Parses and evaluates `src`, then allocates a watchpoint that
    /// remembers this initial value as the baseline for `scan`.
    pub fn new_watchpoint(
        &mut self,
        src: &str,
        machine: &mut (impl MachineState + RegisterNames),
    ) -> Result<usize, WatchpointError> {
        let tokens = lex(src, &*machine).map_err(ExprError::from)?;
        let ast = parse(&tokens).map_err(ExprError::from)?;
        let postfix = linearize(&ast);
        let value = eval(&postfix, machine).map_err(ExprError::from)?;

        let idx = self.pool.alloc().ok_or(WatchpointError::PoolFull)?;
        let slot = self.pool.get_mut(idx).expect("just allocated");
        slot.source = src.to_string();
        slot.postfix = postfix;
        slot.value = value;
        slot.old_value = value;

        Ok(slot.no)
    }

    /// Releases watchpoint `no`. Fails if `no` does not name an active
    /// watchpoint.
    pub fn free(&mut self, no: usize) -> Result<(), WatchpointError> {
        let idx = no.checked_sub(1).filter(|&i| i < self.pool.capacity());
        match idx {
            Some(idx) if self.pool.free(idx) => Ok(()),
            _ => Err(WatchpointError::NotFound(no)),
        }
    }

    /// Releases every active watchpoint, for `d` with no argument.
    pub fn free_all(&mut self) {
        let active_nos: Vec<usize> = self.pool.active().map(|wp| wp.no).collect();
        for no in active_nos {
            self.free(no).expect("no came from the active list");
        }
    }

    /// Lists active watchpoints in ascending number order, for `info w`.
    pub fn display(&self) -> impl Iterator<Item = (usize, &str, Word)> {
        self.pool.active().map(|wp| (wp.no, wp.source.as_str(), wp.value))
    }

    /// Re-evaluates every active watchpoint's expression and returns the
    /// ones whose value changed, updating their stored value as it goes.
    /// `pc` is the emulator's current program counter, stamped onto each
    /// [`WatchpointHit`] for the caller's report; this crate does not read
    /// it itself, since `MachineState` has no `pc()` of its own. An
    /// individual watchpoint that fails to re-evaluate (e.g. a register or
    /// memory access that is no longer valid) is logged and skipped rather
    /// than aborting the scan.
    pub fn scan(&mut self, machine: &mut impl MachineState, pc: Word) -> Vec<WatchpointHit> {
        let active_nos: Vec<usize> = self.pool.active().map(|wp| wp.no).collect();
        let mut hits = Vec::new();

        for no in active_nos {
            let idx = no - 1;
            let new_value = {
                let wp = self.pool.get(idx).expect("no came from an active slot");
                match eval(&wp.postfix, machine) {
                    Ok(value) => value,
                    Err(error) => {
                        tracing::warn!(watchpoint = no, %error, "skipping watchpoint that failed to re-evaluate");
                        continue;
                    }
                }
            };

            let wp = self.pool.get_mut(idx).expect("no came from an active slot");
            if new_value != wp.value {
                hits.push(WatchpointHit {
                    no,
                    pc,
                    expr: wp.source.clone(),
                    old: wp.value,
                    new: new_value,
                });
                wp.old_value = wp.value;
                wp.value = new_value;
            }
        }

        hits
    }
}

impl Default for WatchpointEngine {
    fn default() -> Self {
        Self::new()
    }
}
