//! Map members. `keys` and `values` sort by key so scripts iterating a
//! map see a deterministic order despite the unordered storage.

use tally_ir::StringInterner;
use tally_core::{EvalResult, TypeTag, Value};

use super::helpers::{as_map, str_arg};
use super::{ArgKind, ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Map;
    registry.register_property(tag, interner.intern("count"), count, None);
    registry.register_method(
        tag,
        interner.intern("containsKey"),
        contains_key,
        vec![ArgSpec::required("key", ArgKind::Str)],
        true,
    );
    registry.register_method(tag, interner.intern("keys"), keys, vec![], false);
    registry.register_method(tag, interner.intern("values"), values, vec![], false);
    registry.register_method(
        tag,
        interner.intern("remove"),
        remove,
        vec![ArgSpec::required("key", ArgKind::Str)],
        true,
    );
}

#[allow(clippy::cast_precision_loss)]
fn count(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(as_map("count", recv)?.borrow().len() as f64))
}

fn contains_key(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let key = str_arg("containsKey", args, 0)?;
    Ok(Value::Bool(
        as_map("containsKey", recv)?.borrow().contains_key(&key),
    ))
}

fn keys(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    let map = as_map("keys", recv)?.borrow();
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    Ok(Value::array(
        keys.into_iter().cloned().map(Value::string).collect(),
    ))
}

fn values(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    let map = as_map("values", recv)?.borrow();
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    Ok(Value::array(
        keys.into_iter().map(|k| map[k].clone()).collect(),
    ))
}

fn remove(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let key = str_arg("remove", args, 0)?;
    Ok(Value::Bool(
        as_map("remove", recv)?.borrow_mut().remove(&key).is_some(),
    ))
}
