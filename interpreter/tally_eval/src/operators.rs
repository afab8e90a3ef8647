//! Binary arithmetic, comparison, and indexed-access semantics.
//!
//! Dispatch is a direct match over the pair of value tags: the type set
//! is closed, so pattern matching gives exhaustiveness where the original
//! relied on runtime type tests. Same-type rules are tried first; the
//! mixed-type fallbacks (Bool as 0/1 next to numbers, everything else
//! concatenating textual forms) apply only when no same-type rule
//! matched. The fallback-to-concatenation is deliberate permissiveness of
//! the language, not an error path.

use chrono::Local;

use tally_ir::{BinaryOp, CompareOp};
use tally_core::errors::{
    arithmetic_overflow, cannot_index, index_out_of_bounds, invalid_operator, key_not_found,
    null_access, unit_group_mismatch, unsupported_date_op, unsupported_time_op,
};
use tally_core::{day_number, EvalError, EvalResult, Limiter, TimeValue, UnitValue, Value};

/// Evaluate a binary arithmetic operator over two values.
pub fn evaluate_binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    units: &tally_core::UnitTable,
    limiter: &Limiter,
) -> EvalResult {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(number_op(op, *a, *b))),
        (Value::Time(a), Value::Time(b)) => match op {
            BinaryOp::Add => a
                .checked_add(*b)
                .map(Value::Time)
                .ok_or_else(|| arithmetic_overflow("time")),
            BinaryOp::Sub => a
                .checked_sub(*b)
                .map(Value::Time)
                .ok_or_else(|| arithmetic_overflow("time")),
            _ => Err(unsupported_time_op(op.symbol())),
        },
        (Value::Date(a), Value::Date(b)) => match op {
            BinaryOp::Sub => Ok(Value::Time(TimeValue::from_duration(
                a.signed_duration_since(*b),
            ))),
            _ => Err(unsupported_date_op(op.symbol())),
        },
        (Value::Str(a), Value::Str(b)) => match op {
            BinaryOp::Add => concat(a, b, limiter),
            _ => Err(invalid_operator(op.symbol(), "string", "string")),
        },
        (Value::Quantity(a), Value::Quantity(b)) => quantity_op(op, a, b, units),
        // Mixed fallbacks below.
        (Value::Number(a), Value::Bool(b)) => {
            Ok(Value::Number(number_op(op, *a, f64::from(*b))))
        }
        (Value::Bool(a), Value::Number(b)) => {
            Ok(Value::Number(number_op(op, f64::from(*a), *b)))
        }
        // Bool next to a string concatenates whatever the operator was.
        (Value::Str(_), Value::Bool(_)) | (Value::Bool(_), Value::Str(_)) => {
            concat(&lhs.render(), &rhs.render(), limiter)
        }
        _ => concat(&lhs.render(), &rhs.render(), limiter),
    }
}

fn number_op(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        // IEEE semantics: division by zero is infinity, not an error.
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
    }
}

fn concat(a: &str, b: &str, limiter: &Limiter) -> EvalResult {
    limiter.check_string_length(a.len() + b.len())?;
    let mut out = String::with_capacity(a.len() + b.len());
    out.push_str(a);
    out.push_str(b);
    Ok(Value::string(out))
}

/// Quantity arithmetic works on base magnitudes; the result is re-tagged
/// to the left operand's subgroup.
fn quantity_op(
    op: BinaryOp,
    a: &UnitValue,
    b: &UnitValue,
    units: &tally_core::UnitTable,
) -> EvalResult {
    if a.group != b.group {
        return Err(unit_group_mismatch(&a.group, &b.group));
    }
    let base = number_op(op, a.base, b.base);
    let relative = units.convert_relative(base, &a.subgroup)?;
    Ok(Value::Quantity(UnitValue::new(
        relative, base, &a.group, &a.subgroup,
    )))
}

/// Evaluate a comparison operator over two values.
pub fn evaluate_compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    // Null participates specially: only equality is meaningful, and every
    // other operator against a lone Null behaves as a not-equal check.
    // `Null < x` is therefore true for non-Null x; kept for compatibility.
    if matches!(lhs, Value::Null) || matches!(rhs, Value::Null) {
        let both_null = matches!(lhs, Value::Null) && matches!(rhs, Value::Null);
        return Ok(match op {
            CompareOp::Eq => both_null,
            _ => !both_null,
        });
    }
    // Date vs Time is a "days away from today" proximity test, not an
    // ordering; see `days_away`.
    match (lhs, rhs) {
        (Value::Date(d), Value::Time(t)) | (Value::Time(t), Value::Date(d)) => {
            return Ok(days_away(op, *d, *t));
        }
        _ => {}
    }
    // DayOfWeek next to anything orderable compares by day number.
    if matches!(lhs, Value::Day(_)) || matches!(rhs, Value::Day(_)) {
        if let (Some(a), Some(b)) = (day_ordinal(lhs), day_ordinal(rhs)) {
            return Ok(compare_numbers(op, a, b));
        }
    }
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(compare_numbers(op, *a, *b)),
        (Value::Str(a), Value::Str(b)) => Ok(match op {
            // Equality is exact; ordering is case-insensitive.
            CompareOp::Eq => a == b,
            CompareOp::NotEq => a != b,
            _ => op.apply(a.to_lowercase().cmp(&b.to_lowercase())),
        }),
        (Value::Bool(a), Value::Bool(b)) => Ok(op.apply(a.cmp(b))),
        (Value::Date(a), Value::Date(b)) => Ok(op.apply(a.cmp(b))),
        (Value::Time(a), Value::Time(b)) => Ok(op.apply(a.cmp(b))),
        (Value::Quantity(a), Value::Quantity(b)) => {
            if a.group != b.group {
                return Err(unit_group_mismatch(&a.group, &b.group));
            }
            Ok(compare_numbers(op, a.base, b.base))
        }
        _ => match op {
            CompareOp::Eq => Ok(lhs == rhs),
            CompareOp::NotEq => Ok(lhs != rhs),
            _ => Err(invalid_operator(
                op.symbol(),
                lhs.type_name(),
                rhs.type_name(),
            )),
        },
    }
}

fn compare_numbers(op: CompareOp, a: f64, b: f64) -> bool {
    a.partial_cmp(&b).is_some_and(|ord| op.apply(ord))
}

fn day_ordinal(value: &Value) -> Option<f64> {
    use chrono::Datelike;
    match value {
        Value::Day(d) => Some(day_number(*d)),
        Value::Date(d) => Some(day_number(d.weekday())),
        #[allow(clippy::cast_precision_loss)]
        Value::Time(t) => Some(t.days() as f64),
        Value::Number(n) => Some(*n),
        _ => None,
    }
}

/// "Is this absolute date within N days from today": the day difference
/// from today is compared against the duration's whole-day component. A
/// date already in the past is false under every operator; this is a
/// future-looking proximity test, replicated exactly for compatibility.
fn days_away(op: CompareOp, date: chrono::NaiveDateTime, time: TimeValue) -> bool {
    let today = Local::now().naive_local();
    let diff = date.signed_duration_since(today).num_days();
    if diff < 0 {
        return false;
    }
    op.apply(diff.cmp(&time.days()))
}

/// Indexed read: arrays and tables by number, maps by string.
pub fn access_index(target: &Value, index: &Value) -> EvalResult {
    match (target, index) {
        (Value::Null, _) => Err(null_access()),
        (Value::Array(items), Value::Number(n)) => {
            let items = items.borrow();
            let idx = index_to_offset(*n, items.len())?;
            Ok(items[idx].clone())
        }
        (Value::Table(table), Value::Number(n)) => {
            let table = table.borrow();
            let idx = index_to_offset(*n, table.row_count())?;
            // A row reads back as a fresh array of its cells.
            let row = table.row(idx).map(<[Value]>::to_vec).unwrap_or_default();
            Ok(Value::array(row))
        }
        (Value::Map(map), Value::Str(key)) => map
            .borrow()
            .get(key.as_ref())
            .cloned()
            .ok_or_else(|| key_not_found(key)),
        _ => Err(cannot_index(target.type_name(), index.type_name())),
    }
}

/// Bounds-check a numeric index against a container length.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn index_to_offset(n: f64, len: usize) -> Result<usize, EvalError> {
    let idx = n.trunc() as i64;
    if idx < 0 || (idx as u64) >= len as u64 {
        return Err(index_out_of_bounds(idx, len));
    }
    Ok(idx as usize)
}
