//! End-to-end evaluation tests: each builds a small program through
//! [`AstBuilder`] and runs it against a fresh context.

mod control_flow_tests;
mod error_tests;
mod eval_tests;

use tally_ir::{AstBuilder, SharedInterner};
use tally_core::{EvalError, Limits, Value};

use crate::{EvalContext, Interpreter};

/// Build and run a program with default limits; the result is the value
/// of the last top-level statement.
pub(crate) fn run_program(
    build: impl FnOnce(&mut AstBuilder),
) -> Result<Value, EvalError> {
    run_with(Limits::default(), |_| {}, build)
}

/// Build and run a program with explicit limits and a context
/// preparation hook (host functions, globals).
pub(crate) fn run_with(
    limits: Limits,
    prepare: impl FnOnce(&mut EvalContext),
    build: impl FnOnce(&mut AstBuilder),
) -> Result<Value, EvalError> {
    let interner = SharedInterner::new();
    let mut builder = AstBuilder::new(interner.clone());
    build(&mut builder);
    let (ast, program) = builder.finish();
    let mut ctx = EvalContext::with_limits(interner, limits);
    prepare(&mut ctx);
    Interpreter::new(&ast, &mut ctx).run(&program)
}

pub(crate) fn number(result: &Result<Value, EvalError>) -> f64 {
    match result {
        Ok(Value::Number(n)) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

pub(crate) fn text(result: &Result<Value, EvalError>) -> String {
    match result {
        Ok(Value::Str(s)) => s.to_string(),
        other => panic!("expected a string, got {other:?}"),
    }
}
