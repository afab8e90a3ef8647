//! Expressions, operators, and data-structure access.

use pretty_assertions::assert_eq;

use tally_ir::{BinaryOp, CompareOp, IncrementOp, LogicalOp, UnaryOp};
use tally_core::{ErrorKind, Value};

use super::{number, run_program, text};

#[test]
fn adds_two_variables() {
    let result = run_program(|b| {
        let three = b.number(3.0);
        let s1 = b.assign_var("a", three);
        let four = b.number(4.0);
        let s2 = b.assign_var("b", four);
        let a = b.ident("a");
        let bb = b.ident("b");
        let sum = b.binary(BinaryOp::Add, a, bb);
        let s3 = b.assign_var("c", sum);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
    });
    assert_eq!(number(&result), 7.0);
}

#[test]
fn division_by_zero_is_infinite() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let zero = b.number(0.0);
        let div = b.binary(BinaryOp::Div, one, zero);
        let stmt = b.expr_stmt(div);
        b.push_top(stmt);
    });
    assert!(number(&result).is_infinite());
}

#[test]
fn mixed_operands_concatenate() {
    let result = run_program(|b| {
        let label = b.string("n = ");
        let n = b.number(42.0);
        let cat = b.binary(BinaryOp::Add, label, n);
        let stmt = b.expr_stmt(cat);
        b.push_top(stmt);
    });
    assert_eq!(text(&result), "n = 42");
}

#[test]
fn compound_append_grows_string() {
    let result = run_program(|b| {
        let x = b.string("x");
        let s1 = b.assign_var("s", x);
        let target = b.ident("s");
        let y = b.string("y");
        let append = b.compound(IncrementOp::AddAssign, target, y);
        let s2 = b.expr_stmt(append);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(text(&result), "xy");
}

#[test]
fn postfix_increment_yields_new_value() {
    let result = run_program(|b| {
        let five = b.number(5.0);
        let s1 = b.assign_var("n", five);
        let target = b.ident("n");
        let inc = b.increment(IncrementOp::Inc, target);
        let s2 = b.expr_stmt(inc);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 6.0);
}

#[test]
fn null_equals_only_null() {
    let result = run_program(|b| {
        let null = b.null();
        let other = b.null();
        let cmp = b.compare(CompareOp::Eq, null, other);
        let stmt = b.expr_stmt(cmp);
        b.push_top(stmt);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));
}

#[test]
fn null_ordering_reads_as_not_equal() {
    // Any ordering comparison against Null behaves like `!=`.
    let result = run_program(|b| {
        let null = b.null();
        let five = b.number(5.0);
        let cmp = b.compare(CompareOp::Lt, null, five);
        let stmt = b.expr_stmt(cmp);
        b.push_top(stmt);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));
}

#[test]
fn string_equality_is_exact_but_ordering_folds_case() {
    let eq = run_program(|b| {
        let l = b.string("Abc");
        let r = b.string("abc");
        let cmp = b.compare(CompareOp::Eq, l, r);
        let stmt = b.expr_stmt(cmp);
        b.push_top(stmt);
    });
    assert_eq!(eq.unwrap(), Value::Bool(false));

    let lt = run_program(|b| {
        let l = b.string("Abc");
        let r = b.string("abd");
        let cmp = b.compare(CompareOp::Lt, l, r);
        let stmt = b.expr_stmt(cmp);
        b.push_top(stmt);
    });
    assert_eq!(lt.unwrap(), Value::Bool(true));
}

#[test]
fn logical_and_short_circuits() {
    // The right side would blow up if evaluated.
    let result = run_program(|b| {
        let f = b.boolean(false);
        let missing = b.ident("no_such_binding");
        let and = b.logical(LogicalOp::And, f, missing);
        let stmt = b.expr_stmt(and);
        b.push_top(stmt);
    });
    assert_eq!(result.unwrap(), Value::Bool(false));
}

#[test]
fn negation_requires_a_number() {
    let result = run_program(|b| {
        let s = b.string("nope");
        let neg = b.unary(UnaryOp::Neg, s);
        let stmt = b.expr_stmt(neg);
        b.push_top(stmt);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Type);
}

#[test]
fn interpolation_renders_embedded_values() {
    let result = run_program(|b| {
        let seven = b.number(7.0);
        let s1 = b.assign_var("n", seven);
        let n = b.ident("n");
        let interp = b.interp("got ", &[(n, " items")]);
        let s2 = b.expr_stmt(interp);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(text(&result), "got 7 items");
}

#[test]
fn array_element_read_and_write() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let two = b.number(2.0);
        let three = b.number(3.0);
        let arr = b.array(&[one, two, three]);
        let s1 = b.assign_var("arr", arr);

        let recv = b.ident("arr");
        let idx = b.number(1.0);
        let slot = b.index(recv, idx);
        let nine = b.number(9.0);
        let write = b.assign(slot, nine);
        let s2 = b.expr_stmt(write);

        let recv = b.ident("arr");
        let idx = b.number(1.0);
        let read = b.index(recv, idx);
        let s3 = b.expr_stmt(read);

        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
    });
    assert_eq!(number(&result), 9.0);
}

#[test]
fn array_index_out_of_bounds_is_runtime_error() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let arr = b.array(&[one]);
        let s1 = b.assign_var("arr", arr);
        let recv = b.ident("arr");
        let idx = b.number(5.0);
        let read = b.index(recv, idx);
        let s2 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);
}

#[test]
fn map_member_write_creates_entry_and_absent_reads_null() {
    let created = run_program(|b| {
        let map = b.map(&[]);
        let s1 = b.assign_var("m", map);
        let recv = b.ident("m");
        let slot = b.member(recv, "x");
        let one = b.number(1.0);
        let write = b.assign(slot, one);
        let s2 = b.expr_stmt(write);
        let recv = b.ident("m");
        let read = b.member(recv, "x");
        let s3 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
        b.push_top(s3);
    });
    assert_eq!(number(&created), 1.0);

    let absent = run_program(|b| {
        let map = b.map(&[]);
        let s1 = b.assign_var("m", map);
        let recv = b.ident("m");
        let read = b.member(recv, "missing");
        let s2 = b.expr_stmt(read);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(absent.unwrap(), Value::Null);
}

#[test]
fn assignment_through_null_receiver_is_silent() {
    let result = run_program(|b| {
        let null = b.null();
        let s1 = b.assign_var("m", null);
        let recv = b.ident("m");
        let slot = b.member(recv, "x");
        let one = b.number(1.0);
        let write = b.assign(slot, one);
        let s2 = b.expr_stmt(write);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 1.0);
}

#[test]
fn table_row_reads_as_array() {
    let result = run_program(|b| {
        let one = b.number(1.0);
        let two = b.number(2.0);
        let row = b.array(&[one, two]);
        let table = b.table(&["a", "b"], &[row]);
        let s1 = b.assign_var("t", table);
        let recv = b.ident("t");
        let idx = b.number(0.0);
        let row_read = b.index(recv, idx);
        let cell_idx = b.number(1.0);
        let cell = b.index(row_read, cell_idx);
        let s2 = b.expr_stmt(cell);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(number(&result), 2.0);
}
