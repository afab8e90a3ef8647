//! Table members.

use tally_ir::StringInterner;
use tally_core::{EvalResult, TypeTag, Value};

use super::helpers::as_table;
use super::{ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Table;
    registry.register_property(tag, interner.intern("rowCount"), row_count, None);
    registry.register_property(tag, interner.intern("columns"), columns, None);
    registry.register_method(
        tag,
        interner.intern("addRow"),
        add_row,
        vec![ArgSpec::variadic("cells")],
        false,
    );
}

#[allow(clippy::cast_precision_loss)]
fn row_count(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(
        as_table("rowCount", recv)?.borrow().row_count() as f64,
    ))
}

fn columns(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    let table = as_table("columns", recv)?.borrow();
    Ok(Value::array(
        table
            .columns()
            .iter()
            .cloned()
            .map(Value::string)
            .collect(),
    ))
}

/// Cells bind variadically; short rows pad with Null to the column count.
fn add_row(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let cells = match &args[0] {
        Value::Array(items) => items.borrow().clone(),
        other => vec![other.clone()],
    };
    as_table("addRow", recv)?.borrow_mut().add_row(cells);
    Ok(Value::Null)
}
