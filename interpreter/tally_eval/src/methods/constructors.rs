//! Constructors behind `new` expressions, plus the name aliases the
//! alias hook used to register (`List`, `Dictionary`, `Quantity`).

use chrono::{Local, NaiveDate};

use tally_core::errors::{invalid_date_components, no_matching_constructor, wrong_arg_type};
use tally_core::{EvalResult, ObjectValue, TableValue, TimeValue, UnitValue, Value};

use super::helpers::{int_arg, number_arg, str_arg};
use super::{HostCtx, MethodRegistry};

pub(super) fn install(registry: &mut MethodRegistry) {
    registry.register_constructor("Array", array, 0, None);
    registry.register_constructor("Map", map, 0, Some(0));
    registry.register_constructor("Table", table, 0, None);
    registry.register_constructor("Date", date, 0, Some(6));
    registry.register_constructor("Time", time, 0, Some(3));
    registry.register_constructor("Unit", unit, 2, Some(2));
    registry.register_constructor("Object", object, 0, Some(1));
    registry.register_alias("List", "Array");
    registry.register_alias("Dictionary", "Map");
    registry.register_alias("Quantity", "Unit");
}

fn array(_ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::array(args.to_vec()))
}

fn map(_ctx: &HostCtx<'_>, _args: &[Value]) -> EvalResult {
    Ok(Value::empty_map())
}

fn table(_ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    let mut columns = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Str(s) => columns.push(s.to_string()),
            _ => return Err(wrong_arg_type("Table", "column name string")),
        }
    }
    Ok(Value::table(TableValue::new(columns)))
}

/// `Date()` is now; `Date(y, m, d)` is midnight of that day;
/// `Date(y, m, d, h, mi, s)` is the full timestamp. Other argument counts
/// have no matching constructor.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn date(_ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    match args.len() {
        0 => Ok(Value::Date(Local::now().naive_local())),
        3 | 6 => {
            let year = int_arg("Date", args, 0)? as i32;
            let month = int_arg("Date", args, 1)?.max(0) as u32;
            let day = int_arg("Date", args, 2)?.max(0) as u32;
            let (hour, minute, second) = if args.len() == 6 {
                (
                    int_arg("Date", args, 3)?.max(0) as u32,
                    int_arg("Date", args, 4)?.max(0) as u32,
                    int_arg("Date", args, 5)?.max(0) as u32,
                )
            } else {
                (0, 0, 0)
            };
            NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(hour, minute, second))
                .map(Value::Date)
                .ok_or_else(invalid_date_components)
        }
        n => Err(no_matching_constructor("Date", n)),
    }
}

/// `Time()`, `Time(hours)`, `Time(hours, minutes)`, or
/// `Time(days, hours, minutes)`.
fn time(_ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    let t = match args.len() {
        0 => TimeValue::zero(),
        1 => TimeValue::from_hours(int_arg("Time", args, 0)?),
        2 => TimeValue::from_parts(0, int_arg("Time", args, 0)?, int_arg("Time", args, 1)?),
        _ => TimeValue::from_parts(
            int_arg("Time", args, 0)?,
            int_arg("Time", args, 1)?,
            int_arg("Time", args, 2)?,
        ),
    };
    Ok(Value::Time(t))
}

/// `Unit(magnitude, unitName)`.
fn unit(ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    let magnitude = number_arg("Unit", args, 0)?;
    let unit_name = str_arg("Unit", args, 1)?;
    let base = ctx.units.to_base_units(magnitude, &unit_name)?;
    let group = ctx.units.group_of(&unit_name)?.to_owned();
    let subgroup = ctx.units.canonical_name(&unit_name)?.to_owned();
    Ok(Value::Quantity(UnitValue::new(
        magnitude, base, &group, &subgroup,
    )))
}

fn object(_ctx: &HostCtx<'_>, args: &[Value]) -> EvalResult {
    let type_name = if args.is_empty() {
        "object".to_owned()
    } else {
        str_arg("Object", args, 0)?
    };
    Ok(Value::object(ObjectValue::new(type_name)))
}
