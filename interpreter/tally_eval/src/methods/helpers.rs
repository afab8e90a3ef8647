//! Shared receiver/argument extraction for the built-in member sets.
//!
//! The registry key already pins the receiver's tag, so the receiver
//! matches here are about unwrapping the payload, not re-checking types.

use tally_core::errors::{wrong_arg_type, EvalError};
use tally_core::{Shared, TableValue, TimeValue, UnitValue, Value};

pub(super) fn as_array<'a>(
    method: &str,
    recv: &'a Value,
) -> Result<&'a Shared<Vec<Value>>, EvalError> {
    match recv {
        Value::Array(items) => Ok(items),
        _ => Err(wrong_arg_type(method, "array receiver")),
    }
}

pub(super) fn as_map<'a>(
    method: &str,
    recv: &'a Value,
) -> Result<&'a Shared<rustc_hash::FxHashMap<String, Value>>, EvalError> {
    match recv {
        Value::Map(map) => Ok(map),
        _ => Err(wrong_arg_type(method, "map receiver")),
    }
}

pub(super) fn as_table<'a>(
    method: &str,
    recv: &'a Value,
) -> Result<&'a Shared<TableValue>, EvalError> {
    match recv {
        Value::Table(table) => Ok(table),
        _ => Err(wrong_arg_type(method, "table receiver")),
    }
}

pub(super) fn as_string<'a>(method: &str, recv: &'a Value) -> Result<&'a str, EvalError> {
    match recv {
        Value::Str(s) => Ok(s),
        _ => Err(wrong_arg_type(method, "string receiver")),
    }
}

pub(super) fn as_date(
    method: &str,
    recv: &Value,
) -> Result<chrono::NaiveDateTime, EvalError> {
    match recv {
        Value::Date(d) => Ok(*d),
        _ => Err(wrong_arg_type(method, "date receiver")),
    }
}

pub(super) fn as_time(method: &str, recv: &Value) -> Result<TimeValue, EvalError> {
    match recv {
        Value::Time(t) => Ok(*t),
        _ => Err(wrong_arg_type(method, "time receiver")),
    }
}

pub(super) fn as_quantity<'a>(
    method: &str,
    recv: &'a Value,
) -> Result<&'a UnitValue, EvalError> {
    match recv {
        Value::Quantity(q) => Ok(q),
        _ => Err(wrong_arg_type(method, "unit receiver")),
    }
}

pub(super) fn number_arg(method: &str, args: &[Value], index: usize) -> Result<f64, EvalError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        _ => Err(wrong_arg_type(method, "number")),
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn int_arg(method: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    number_arg(method, args, index).map(|n| n.trunc() as i64)
}

pub(super) fn str_arg(method: &str, args: &[Value], index: usize) -> Result<String, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.to_string()),
        _ => Err(wrong_arg_type(method, "string")),
    }
}
