//! Error propagation, try/catch, and the resource limits.

use pretty_assertions::assert_eq;

use tally_ir::{CompareOp, IncrementOp};
use tally_core::{ErrorKind, EvalError, Limits, Value};

use super::{run_program, run_with, text};

fn boom(_args: &[Value]) -> Result<Value, EvalError> {
    Err(EvalError::new(ErrorKind::Runtime, "boom"))
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let result = run_program(|b| {
        let read = b.ident("nope");
        let s1 = b.expr_stmt(read);
        b.push_top(s1);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);
}

#[test]
fn catch_binds_the_error_message() {
    let result = run_with(
        Limits::default(),
        |ctx| ctx.register_host_fn("boom", boom),
        |b| {
            let call = b.call_named("boom", &[]);
            let s = b.expr_stmt(call);
            let body = b.block(&[s]);
            let e = b.ident("e");
            let message = b.member(e, "message");
            let s = b.assign_var("r", message);
            let handler = b.block(&[s]);
            let s1 = b.try_catch(body, "e", handler);
            let read = b.ident("r");
            let s2 = b.expr_stmt(read);
            b.push_top(s1);
            b.push_top(s2);
        },
    );
    assert_eq!(text(&result), "boom");
}

#[test]
fn catch_binds_the_error_kind_name() {
    let result = run_with(
        Limits::default(),
        |ctx| ctx.register_host_fn("boom", boom),
        |b| {
            let call = b.call_named("boom", &[]);
            let s = b.expr_stmt(call);
            let body = b.block(&[s]);
            let e = b.ident("e");
            let name = b.member(e, "name");
            let s = b.assign_var("r", name);
            let handler = b.block(&[s]);
            let s1 = b.try_catch(body, "e", handler);
            let read = b.ident("r");
            let s2 = b.expr_stmt(read);
            b.push_top(s1);
            b.push_top(s2);
        },
    );
    assert_eq!(text(&result), "RuntimeError");
}

#[test]
fn explicit_failure_passes_through_catch() {
    let result = run_program(|b| {
        let message = b.string("nope");
        let fail = b.fail_stmt(Some(message));
        let body = b.block(&[fail]);
        let caught = b.string("caught");
        let s = b.assign_var("r", caught);
        let handler = b.block(&[s]);
        let s1 = b.try_catch(body, "e", handler);
        b.push_top(s1);
    });
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Fail);
    assert_eq!(err.message, "nope");
}

#[test]
fn loop_limit_passes_through_catch() {
    let limits = Limits {
        max_loop_statements: 10,
        ..Limits::default()
    };
    let result = run_with(limits, |_| {}, |b| {
        let t = b.boolean(true);
        let one = b.number(1.0);
        let s = b.assign_var("x", one);
        let body = b.block(&[s]);
        let spin = b.while_stmt(t, body);
        let try_body = b.block(&[spin]);
        let handler = b.block(&[]);
        let s1 = b.try_catch(try_body, "e", handler);
        b.push_top(s1);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::LimitExceeded);
}

#[test]
fn string_budget_stops_compound_append() {
    let limits = Limits {
        max_string_length: 6,
        ..Limits::default()
    };
    let result = run_with(limits, |_| {}, |b| {
        let head = b.string("aaaa");
        let s1 = b.assign_var("s", head);
        let target = b.ident("s");
        let tail = b.string("bbbb");
        let append = b.compound(IncrementOp::AddAssign, target, tail);
        let s2 = b.expr_stmt(append);
        b.push_top(s1);
        b.push_top(s2);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::LimitExceeded);
}

#[test]
fn scope_string_budget_accumulates_across_binds() {
    let limits = Limits {
        max_scope_string_length: 10,
        ..Limits::default()
    };
    // Each bind is well under the per-string cap; the aggregate trips.
    let result = run_with(limits, |_| {}, |b| {
        for name in ["a", "b", "c"] {
            let s = b.string("aaaa");
            let stmt = b.assign_var(name, s);
            b.push_top(stmt);
        }
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::LimitExceeded);
}

#[test]
fn scope_budget_stops_deep_nesting() {
    let limits = Limits {
        max_scope_depth: 3,
        ..Limits::default()
    };
    let result = run_with(limits, |_| {}, |b| {
        let one = b.number(1.0);
        let innermost = b.assign_var("x", one);
        let mut block = b.block(&[innermost]);
        for _ in 0..5 {
            block = b.block(&[block]);
        }
        b.push_top(block);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::LimitExceeded);
}

#[test]
fn caught_exception_budget_is_finite() {
    let limits = Limits {
        max_caught_exceptions: 2,
        ..Limits::default()
    };
    let result = run_with(
        limits,
        |ctx| ctx.register_host_fn("boom", boom),
        |b| {
            for _ in 0..3 {
                let call = b.call_named("boom", &[]);
                let s = b.expr_stmt(call);
                let body = b.block(&[s]);
                let handler = b.block(&[]);
                let stmt = b.try_catch(body, "e", handler);
                b.push_top(stmt);
            }
        },
    );
    assert_eq!(result.unwrap_err().kind, ErrorKind::LimitExceeded);
}

#[test]
fn handler_error_propagates() {
    let result = run_with(
        Limits::default(),
        |ctx| ctx.register_host_fn("boom", boom),
        |b| {
            let call = b.call_named("boom", &[]);
            let s = b.expr_stmt(call);
            let body = b.block(&[s]);
            let missing = b.ident("still_undefined");
            let s = b.expr_stmt(missing);
            let handler = b.block(&[s]);
            let stmt = b.try_catch(body, "e", handler);
            b.push_top(stmt);
        },
    );
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);
}

#[test]
fn catch_scope_does_not_leak_the_binding() {
    let result = run_with(
        Limits::default(),
        |ctx| ctx.register_host_fn("boom", boom),
        |b| {
            let call = b.call_named("boom", &[]);
            let s = b.expr_stmt(call);
            let body = b.block(&[s]);
            let handler = b.block(&[]);
            let stmt = b.try_catch(body, "e", handler);
            let e = b.ident("e");
            let gone = b.expr_stmt(e);
            b.push_top(stmt);
            b.push_top(gone);
        },
    );
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);
}

#[test]
fn comparing_mismatched_types_orders_as_error() {
    let result = run_program(|b| {
        let arr = b.array(&[]);
        let one = b.number(1.0);
        let cmp = b.compare(CompareOp::Lt, arr, one);
        let stmt = b.expr_stmt(cmp);
        b.push_top(stmt);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::Type);
}
