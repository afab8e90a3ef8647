//! Array members.
//!
//! Two naming layers share the table: the base set (`add`, `removeAt`,
//! ...) and a JS-style set (`push`, `pop`) registered on top of it.
//! Element arguments are forwarded raw so their tags survive.

use tally_ir::StringInterner;
use tally_core::errors::index_out_of_bounds;
use tally_core::{EvalResult, Value};

use tally_core::TypeTag;

use super::helpers::{as_array, int_arg};
use super::{ArgKind, ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Array;
    registry.register_property(tag, interner.intern("length"), length, None);
    registry.register_method(
        tag,
        interner.intern("add"),
        add,
        vec![ArgSpec::required("item", ArgKind::Any)],
        false,
    );
    registry.register_method(
        tag,
        interner.intern("insert"),
        insert,
        vec![
            ArgSpec::required("index", ArgKind::Int),
            ArgSpec::required("item", ArgKind::Any),
        ],
        false,
    );
    registry.register_method(
        tag,
        interner.intern("removeAt"),
        remove_at,
        vec![ArgSpec::required("index", ArgKind::Int)],
        false,
    );
    registry.register_method(
        tag,
        interner.intern("indexOf"),
        index_of,
        vec![ArgSpec::required("item", ArgKind::Any)],
        false,
    );
    registry.register_method(
        tag,
        interner.intern("contains"),
        contains,
        vec![ArgSpec::required("item", ArgKind::Any)],
        false,
    );
    registry.register_method(tag, interner.intern("clear"), clear, vec![], false);
    registry.register_method(
        tag,
        interner.intern("join"),
        join,
        vec![ArgSpec::with_default(
            "separator",
            ArgKind::Any,
            Value::string(","),
        )],
        false,
    );
    // JS-style layer over the same payload.
    registry.register_method(
        tag,
        interner.intern("push"),
        push,
        vec![ArgSpec::required("item", ArgKind::Any)],
        false,
    );
    registry.register_method(tag, interner.intern("pop"), pop, vec![], false);
}

#[allow(clippy::cast_precision_loss)]
fn length(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_array("length", recv)?.borrow().len() as f64))
}

fn add(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    as_array("add", recv)?.borrow_mut().push(args[0].clone());
    Ok(Value::Null)
}

fn insert(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let items = as_array("insert", recv)?;
    let index = int_arg("insert", args, 0)?;
    let mut items = items.borrow_mut();
    // Inserting at the end is allowed; past it is not.
    if index < 0 || index as usize > items.len() {
        return Err(index_out_of_bounds(index, items.len()));
    }
    items.insert(index as usize, args[1].clone());
    Ok(Value::Null)
}

fn remove_at(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let items = as_array("removeAt", recv)?;
    let index = int_arg("removeAt", args, 0)?;
    let mut items = items.borrow_mut();
    if index < 0 || index as usize >= items.len() {
        return Err(index_out_of_bounds(index, items.len()));
    }
    Ok(items.remove(index as usize))
}

#[allow(clippy::cast_precision_loss)]
fn index_of(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let items = as_array("indexOf", recv)?.borrow();
    let position = items.iter().position(|v| v == &args[0]);
    Ok(Value::Number(
        position.map_or(-1.0, |i| i as f64),
    ))
}

fn contains(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let items = as_array("contains", recv)?.borrow();
    Ok(Value::Bool(items.iter().any(|v| v == &args[0])))
}

fn clear(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    as_array("clear", recv)?.borrow_mut().clear();
    Ok(Value::Null)
}

fn join(ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let separator = args[0].render();
    let items = as_array("join", recv)?.borrow();
    let parts: Vec<String> = items.iter().map(Value::render).collect();
    let out = parts.join(&separator);
    ctx.limiter.check_string_length(out.len())?;
    Ok(Value::string(out))
}

#[allow(clippy::cast_precision_loss)]
fn push(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let items = as_array("push", recv)?;
    let mut items = items.borrow_mut();
    items.push(args[0].clone());
    Ok(Value::Number(items.len() as f64))
}

fn pop(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(as_array("pop", recv)?
        .borrow_mut()
        .pop()
        .unwrap_or(Value::Null))
}
