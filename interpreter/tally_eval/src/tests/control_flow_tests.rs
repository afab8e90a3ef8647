//! Loops, branches, functions, and the break/continue/return signals.

use pretty_assertions::assert_eq;

use tally_ir::{BinaryOp, CompareOp, IncrementOp};
use tally_core::ErrorKind;

use super::{number, run_program, text};

#[test]
fn while_runs_until_condition_fails() {
    let result = run_program(|b| {
        let zero = b.number(0.0);
        let s1 = b.assign_var("i", zero);
        let i = b.ident("i");
        let ten = b.number(10.0);
        let cond = b.compare(CompareOp::Lt, i, ten);
        let i = b.ident("i");
        let inc = b.increment(IncrementOp::Inc, i);
        let step = b.expr_stmt(inc);
        let body = b.block(&[step]);
        let s2 = b.while_stmt(cond, body);
        let read = b.ident("i");
        let s3 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
    });
    assert_eq!(number(&result), 10.0);
}

#[test]
fn break_stops_after_third_pass() {
    let result = run_program(|b| {
        let zero = b.number(0.0);
        let s1 = b.assign_var("n", zero);
        let t = b.boolean(true);
        let n = b.ident("n");
        let inc = b.increment(IncrementOp::Inc, n);
        let bump = b.expr_stmt(inc);
        let n = b.ident("n");
        let three = b.number(3.0);
        let done = b.compare(CompareOp::Eq, n, three);
        let brk = b.break_stmt();
        let stop = b.if_stmt(done, brk, None);
        let body = b.block(&[bump, stop]);
        let s2 = b.while_stmt(t, body);
        let read = b.ident("n");
        let s3 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
    });
    assert_eq!(number(&result), 3.0);
}

#[test]
fn continue_skips_rest_of_pass_but_keeps_looping() {
    // Counts the even values of i in 1..=6.
    let result = run_program(|b| {
        let zero = b.number(0.0);
        let s1 = b.assign_var("i", zero);
        let zero = b.number(0.0);
        let s2 = b.assign_var("evens", zero);

        let i = b.ident("i");
        let six = b.number(6.0);
        let cond = b.compare(CompareOp::Lt, i, six);

        let i = b.ident("i");
        let inc = b.increment(IncrementOp::Inc, i);
        let bump = b.expr_stmt(inc);
        let i = b.ident("i");
        let two = b.number(2.0);
        let rem = b.binary(BinaryOp::Mod, i, two);
        let one = b.number(1.0);
        let odd = b.compare(CompareOp::Eq, rem, one);
        let cont = b.continue_stmt();
        let skip = b.if_stmt(odd, cont, None);
        let evens = b.ident("evens");
        let inc = b.increment(IncrementOp::Inc, evens);
        let count = b.expr_stmt(inc);
        let body = b.block(&[bump, skip, count]);
        let s3 = b.while_stmt(cond, body);

        let read = b.ident("evens");
        let s4 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
        b.push_top(s4);
    });
    assert_eq!(number(&result), 3.0);
}

#[test]
fn for_step_runs_after_continue() {
    let result = run_program(|b| {
        let zero = b.number(0.0);
        let i = b.ident("i");
        let init = b.assign(i, zero);
        let i = b.ident("i");
        let five = b.number(5.0);
        let cond = b.compare(CompareOp::Lt, i, five);
        let i = b.ident("i");
        let step = b.increment(IncrementOp::Inc, i);
        let cont = b.continue_stmt();
        let body = b.block(&[cont]);
        let s1 = b.for_stmt(Some(init), cond, Some(step), body);
        let read = b.ident("i");
        let s2 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 5.0);
}

#[test]
fn for_each_sums_array_elements() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let two = b.number(2.0);
        let three = b.number(3.0);
        let arr = b.array(&[one, two, three]);
        let s1 = b.assign_var("arr", arr);
        let zero = b.number(0.0);
        let s2 = b.assign_var("sum", zero);
        let sum = b.ident("sum");
        let x = b.ident("x");
        let add = b.compound(IncrementOp::AddAssign, sum, x);
        let acc = b.expr_stmt(add);
        let body = b.block(&[acc]);
        let iter = b.ident("arr");
        let s3 = b.for_each("x", iter, body);
        let read = b.ident("sum");
        let s4 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
        b.push_top(s4);
    });
    assert_eq!(number(&result), 6.0);
}

#[test]
fn for_each_visits_map_keys_in_sorted_order() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let two = b.number(2.0);
        let map = b.map(&[("b", one), ("a", two)]);
        let s1 = b.assign_var("m", map);
        let empty = b.string("");
        let s2 = b.assign_var("acc", empty);
        let acc = b.ident("acc");
        let k = b.ident("k");
        let add = b.compound(IncrementOp::AddAssign, acc, k);
        let append = b.expr_stmt(add);
        let body = b.block(&[append]);
        let iter = b.ident("m");
        let s3 = b.for_each("k", iter, body);
        let read = b.ident("acc");
        let s4 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
        b.push_top(s4);
    });
    assert_eq!(text(&result), "ab");
}

#[test]
fn for_each_rejects_numbers() {
    let result = run_program(|b| {
        let n = b.number(5.0);
        let body = b.block(&[]);
        let s1 = b.for_each("x", n, body);
        b.push_top(s1);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Type);
}

#[test]
fn function_returns_value() {
    let result = run_program(|b| {
        let x = b.ident("x");
        let two = b.number(2.0);
        let doubled = b.binary(BinaryOp::Mul, x, two);
        let ret = b.return_stmt(Some(doubled));
        let body = b.block(&[ret]);
        let s1 = b.func_decl("double", &["x"], body);
        let five = b.number(5.0);
        let call = b.call_named("double", &[five]);
        let s2 = b.expr_stmt(call);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 10.0);
}

#[test]
fn function_without_return_yields_null() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let work = b.assign_var("unused", one);
        let body = b.block(&[work]);
        let s1 = b.func_decl("noop", &[], body);
        let call = b.call_named("noop", &[]);
        let s2 = b.expr_stmt(call);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(result.unwrap(), tally_core::Value::Null);
}

#[test]
fn number_arguments_are_copied_into_the_callee() {
    let result = run_program(|b| {
        let x = b.ident("x");
        let inc = b.increment(IncrementOp::Inc, x);
        let bump = b.expr_stmt(inc);
        let body = b.block(&[bump]);
        let s1 = b.func_decl("mutate", &["x"], body);
        let five = b.number(5.0);
        let s2 = b.assign_var("a", five);
        let a = b.ident("a");
        let call = b.call_named("mutate", &[a]);
        let s3 = b.expr_stmt(call);
        let read = b.ident("a");
        let s4 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
        b.push_top(s4);
    });
    assert_eq!(number(&result), 5.0);
}

#[test]
fn extra_positionals_land_in_arguments() {
    let result = run_program(|b| {
        let args = b.ident("arguments");
        let zero = b.number(0.0);
        let first_extra = b.index(args, zero);
        let ret = b.return_stmt(Some(first_extra));
        let body = b.block(&[ret]);
        let s1 = b.func_decl("f", &["a"], body);
        let one = b.number(1.0);
        let two = b.number(2.0);
        let three = b.number(3.0);
        let call = b.call_named("f", &[one, two, three]);
        let s2 = b.expr_stmt(call);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 2.0);
}

#[test]
fn lambda_binds_and_calls() {
    let result = run_program(|b| {
        let x = b.ident("x");
        let one = b.number(1.0);
        let plus = b.binary(BinaryOp::Add, x, one);
        let ret = b.return_stmt(Some(plus));
        let body = b.block(&[ret]);
        let lambda = b.lambda(&["x"], body);
        let s1 = b.assign_var("f", lambda);
        let seven = b.number(7.0);
        let call = b.call_named("f", &[seven]);
        let s2 = b.expr_stmt(call);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 8.0);
}

#[test]
fn top_level_break_is_a_control_flow_error() {
    let result = run_program(|b| {
        let s1 = b.break_stmt();
        b.push_top(s1);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::ControlFlow);
}

#[test]
fn top_level_return_is_a_control_flow_error() {
    let result = run_program(|b| {
        let s1 = b.return_stmt(None);
        b.push_top(s1);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::ControlFlow);
}

#[test]
fn calling_a_number_is_not_callable() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let s1 = b.assign_var("n", one);
        let call = b.call_named("n", &[]);
        let s2 = b.expr_stmt(call);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);
}
