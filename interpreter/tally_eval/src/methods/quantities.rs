//! Unit-quantity members.

use tally_ir::StringInterner;
use tally_core::{EvalResult, TypeTag, UnitValue, Value};

use super::helpers::{as_quantity, str_arg};
use super::{ArgKind, ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Unit;
    registry.register_property(tag, interner.intern("value"), value, None);
    registry.register_property(tag, interner.intern("base"), base, None);
    registry.register_property(tag, interner.intern("unit"), unit, None);
    registry.register_property(tag, interner.intern("group"), group, None);
    registry.register_method(
        tag,
        interner.intern("convertTo"),
        convert_to,
        vec![ArgSpec::required("unit", ArgKind::Str)],
        true,
    );
}

fn value(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_quantity("value", recv)?.relative))
}

fn base(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_quantity("base", recv)?.base))
}

fn unit(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(
        as_quantity("unit", recv)?.subgroup.to_string(),
    ))
}

fn group(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(as_quantity("group", recv)?.group.to_string()))
}

/// Re-express the quantity in another unit of the same group; the base
/// magnitude is unchanged, only the relative magnitude and subgroup move.
fn convert_to(ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let quantity = as_quantity("convertTo", recv)?;
    let target = str_arg("convertTo", args, 0)?;
    let relative = ctx
        .units
        .convert(quantity.relative, &quantity.subgroup, &target)?;
    let group = ctx.units.group_of(&target)?.to_owned();
    let subgroup = ctx.units.canonical_name(&target)?.to_owned();
    Ok(Value::Quantity(UnitValue::new(
        relative,
        quantity.base,
        &group,
        &subgroup,
    )))
}
