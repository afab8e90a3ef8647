//! Date members.

use chrono::{Datelike, Duration};

use tally_ir::StringInterner;
use tally_core::errors::arithmetic_overflow;
use tally_core::{EvalResult, TypeTag, Value};

use super::helpers::{as_date, int_arg};
use super::{ArgKind, ArgSpec, HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry, interner: &StringInterner) {
    let tag = TypeTag::Date;
    registry.register_property(tag, interner.intern("year"), year, None);
    registry.register_property(tag, interner.intern("month"), month, None);
    registry.register_property(tag, interner.intern("day"), day, None);
    registry.register_property(tag, interner.intern("dayOfWeek"), day_of_week, None);
    registry.register_method(
        tag,
        interner.intern("addDays"),
        add_days,
        vec![ArgSpec::required("days", ArgKind::Int)],
        true,
    );
    registry.register_method(
        tag,
        interner.intern("addHours"),
        add_hours,
        vec![ArgSpec::required("hours", ArgKind::Int)],
        true,
    );
}

fn year(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(f64::from(as_date("year", recv)?.year())))
}

fn month(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(f64::from(as_date("month", recv)?.month())))
}

fn day(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(f64::from(as_date("day", recv)?.day())))
}

fn day_of_week(_ctx: &HostCtx<'_>, recv: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Day(as_date("dayOfWeek", recv)?.weekday()))
}

fn add_days(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let date = as_date("addDays", recv)?;
    let days = int_arg("addDays", args, 0)?;
    date.checked_add_signed(Duration::days(days))
        .map(Value::Date)
        .ok_or_else(|| arithmetic_overflow("date"))
}

fn add_hours(_ctx: &HostCtx<'_>, recv: &Value, args: &[Value]) -> EvalResult {
    let date = as_date("addHours", recv)?;
    let hours = int_arg("addHours", args, 0)?;
    date.checked_add_signed(Duration::hours(hours))
        .map(Value::Date)
        .ok_or_else(|| arithmetic_overflow("date"))
}
