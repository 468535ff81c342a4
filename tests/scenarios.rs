//! End-to-end scenarios from the expression engine's specification table:
//! full lex/parse/linearize/eval pipeline runs against a `DemoMachine`.

use dbgexpr::eval::eval;
use dbgexpr::lexer::lex;
use dbgexpr::machine::DemoMachine;
use dbgexpr::parser::parse;
use dbgexpr::postfix::linearize;
use dbgexpr::watchpoint::WatchpointEngine;
use dbgexpr::word::Word;

fn run(src: &str, machine: &mut DemoMachine) -> Word {
    let tokens = lex(src, &*machine).expect("lex");
    let ast = parse(&tokens).expect("parse");
    eval(&linearize(&ast), machine).expect("eval")
}

fn try_run(src: &str, machine: &mut DemoMachine) -> Result<Word, String> {
    let tokens = lex(src, &*machine).map_err(|e| e.to_string())?;
    let ast = parse(&tokens).map_err(|e| e.to_string())?;
    eval(&linearize(&ast), machine).map_err(|e| e.to_string())
}

fn machine() -> DemoMachine {
    DemoMachine::new(0, vec![0; 64])
}

#[test]
fn scenario_1_precedence() {
    assert_eq!(run("1 + 2 * 3", &mut machine()), 7);
}

#[test]
fn scenario_2_addition_wraps() {
    assert_eq!(run("(0xffffffff + 1)", &mut machine()), 0);
}

#[test]
fn scenario_3_left_shift() {
    assert_eq!(run("1 << 31", &mut machine()), 0x8000_0000);
}

#[test]
fn scenario_4_arithmetic_right_shift_sign_extends() {
    assert_eq!(run("0x80000000 s>> 1", &mut machine()), 0xc000_0000);
}

#[test]
fn scenario_5_logical_right_shift_does_not_sign_extend() {
    assert_eq!(run("0x80000000 >> 1", &mut machine()), 0x4000_0000);
}

#[test]
fn scenario_6_signed_less_than() {
    assert_eq!(run("-1 s< 0", &mut machine()), 1);
}

#[test]
fn scenario_7_unsigned_less_than() {
    assert_eq!(run("-1 < 0", &mut machine()), 0);
}

#[test]
fn scenario_8_division_by_zero_is_an_eval_error() {
    assert!(try_run("10 / 0", &mut machine()).is_err());
}

#[test]
fn scenario_9_watchpoint_hit_on_register_change() {
    let mut m = machine();
    m.set_register("a0", 0x1000);
    let mut wp = WatchpointEngine::new();
    let no = wp.new_watchpoint("$a0 + 4", &mut m).unwrap();

    assert!(wp.scan(&mut m, m.pc()).is_empty());

    m.set_register("a0", 0x2000);
    let hits = wp.scan(&mut m, m.pc());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].no, no);
    assert_eq!(hits[0].old, 0x1004);
    assert_eq!(hits[0].new, 0x2004);
}

// Testable invariants (spec section 8), not the scenario table, but
// cheap enough to keep alongside the scenarios they motivate.

#[test]
fn invariant_double_negation_and_double_complement_are_identity() {
    let mut m = machine();
    assert_eq!(run("- - 5", &mut m), 5);
    assert_eq!(run("~ ~ 5", &mut m), 5);
    assert_eq!(run("+ 5", &mut m), 5);
}

#[test]
fn invariant_double_logical_not_is_boolean_identity() {
    let mut m = machine();
    assert_eq!(run("! ! 5", &mut m), 1);
    assert_eq!(run("! ! 0", &mut m), 0);
}

#[test]
fn invariant_division_and_modulo_reconstruct_dividend() {
    let mut m = machine();
    for (a, b) in [(17 as Word, 5 as Word), (100, 7), (9, 9)] {
        let src = format!("{a} / {b} * {b} + {a} % {b}");
        assert_eq!(run(&src, &mut m), a);
    }
}

#[test]
fn invariant_precedence_table() {
    let mut m = machine();
    assert_eq!(run("1 + 2 * 3", &mut m), 7);
    assert_eq!(run("(1 + 2) * 3", &mut m), 9);
    assert_eq!(run("1 | 2 & 3", &mut m), 3);
    assert_eq!(run("1 << 2 + 1", &mut m), 8);
    assert_eq!(run("!0", &mut m), 1);
    assert_eq!(run("!1", &mut m), 0);
}

#[test]
fn dereference_on_right_of_and_is_not_short_circuited() {
    // `&&` has already evaluated both operands by the time it fires, so a
    // fault on the right side still surfaces even though the left side
    // alone would make a short-circuiting `&&` skip it.
    let mut m = machine();
    assert!(try_run("0 && *0xdeadbeef", &mut m).is_err());
}
