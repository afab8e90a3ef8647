//! Time (duration) members.

use tally_ir::StringInterner;
use tally_core::{EvalResult, TypeTag, Value};

use super::helpers::as_time;
use super::{HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Time;
    registry.register_property(tag, interner.intern("days"), days, None);
    registry.register_property(tag, interner.intern("hours"), hours, None);
    registry.register_property(tag, interner.intern("minutes"), minutes, None);
    registry.register_property(tag, interner.intern("totalMinutes"), total_minutes, None);
}

#[allow(clippy::cast_precision_loss)]
fn days(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_time("days", recv)?.days() as f64))
}

#[allow(clippy::cast_precision_loss)]
fn hours(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_time("hours", recv)?.hours() as f64))
}

#[allow(clippy::cast_precision_loss)]
fn minutes(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_time("minutes", recv)?.minutes() as f64))
}

#[allow(clippy::cast_precision_loss)]
fn total_minutes(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(
        as_time("totalMinutes", recv)?.total_minutes() as f64,
    ))
}
