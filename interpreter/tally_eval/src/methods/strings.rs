//! String members. Coercion is on: string arguments arrive as host
//! strings whatever the caller passed, and index arguments arrive as
//! whole numbers. Offsets and lengths count characters, not bytes.

use tally_ir::StringInterner;
use tally_core::{EvalResult, TypeTag, Value};

use super::helpers::{as_string, int_arg, str_arg};
use super::{ArgKind, ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::String;
    registry.register_property(tag, interner.intern("length"), length, None);
    registry.register_method(
        tag,
        interner.intern("contains"),
        contains,
        vec![ArgSpec::required("text", ArgKind::Str)],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("substring"),
        substring,
        vec![
            ArgSpec::required("start", ArgKind::Int),
            ArgSpec::optional("length", ArgKind::Int),
        ],
        true,
    );
    registry.register_method(tag, interner.intern("toUpper"), to_upper, vec![], true);
    registry.register_method(tag, interner.intern("toLower"), to_lower, vec![], true);
    registry.register_method(tag, interner.intern("trim"), trim, vec![], true);
    registry.register_method(
        tag,
        interner.intern("split"),
        split,
        vec![ArgSpec::required("separator", ArgKind::Str)],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("replace"),
        replace,
        vec![
            ArgSpec::required("from", ArgKind::Str),
            ArgSpec::required("to", ArgKind::Str),
        ],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("indexOf"),
        index_of,
        vec![ArgSpec::required("text", ArgKind::Str)],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("startsWith"),
        starts_with,
        vec![ArgSpec::required("text", ArgKind::Str)],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("endsWith"),
        ends_with,
        vec![ArgSpec::required("text", ArgKind::Str)],
        true,
    );
}

#[allow(clippy::cast_precision_loss)]
fn length(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(
        as_string("length", recv)?.chars().count() as f64,
    ))
}

fn contains(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let needle = str_arg("contains", args, 0)?;
    Ok(Value::Bool(as_string("contains", recv)?.contains(&needle)))
}

#[allow(clippy::cast_sign_loss)]
fn substring(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let s = as_string("substring", recv)?;
    let start = int_arg("substring", args, 0)?.max(0) as usize;
    let out: String = match args.get(1) {
        Some(Value::Null) | None => s.chars().skip(start).collect(),
        _ => {
            let len = int_arg("substring", args, 1)?.max(0) as usize;
            s.chars().skip(start).take(len).collect()
        }
    };
    Ok(Value::string(out))
}

fn to_upper(ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    let out = as_string("toUpper", recv)?.to_uppercase();
    ctx.limiter.check_string_length(out.len())?;
    Ok(Value::string(out))
}

fn to_lower(ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    let out = as_string("toLower", recv)?.to_lowercase();
    ctx.limiter.check_string_length(out.len())?;
    Ok(Value::string(out))
}

fn trim(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(as_string("trim", recv)?.trim()))
}

fn split(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let separator = str_arg("split", args, 0)?;
    let pieces: Vec<Value> = as_string("split", recv)?
        .split(&separator)
        .map(Value::string)
        .collect();
    Ok(Value::array(pieces))
}

fn replace(ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let from = str_arg("replace", args, 0)?;
    let to = str_arg("replace", args, 1)?;
    let out = as_string("replace", recv)?.replace(&from, &to);
    ctx.limiter.check_string_length(out.len())?;
    Ok(Value::string(out))
}

#[allow(clippy::cast_precision_loss)]
fn index_of(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let needle = str_arg("indexOf", args, 0)?;
    let s = as_string("indexOf", recv)?;
    let position = s
        .find(&needle)
        .map(|byte| s[..byte].chars().count());
    Ok(Value::Number(position.map_or(-1.0, |i| i as f64)))
}

fn starts_with(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let prefix = str_arg("startsWith", args, 0)?;
    Ok(Value::Bool(
        as_string("startsWith", recv)?.starts_with(&prefix),
    ))
}

fn ends_with(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let suffix = str_arg("endsWith", args, 0)?;
    Ok(Value::Bool(as_string("endsWith", recv)?.ends_with(&suffix)))
}
