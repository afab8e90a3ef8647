//! Unary operations: truthiness, logical not, negation, increments.

use tally_ir::IncrementOp;

use tally_core::errors::{invalid_compound_op, invalid_negation};
use tally_core::{EvalResult, Limiter, Value};

/// The language's truthiness table.
///
/// Numbers are truthy only when strictly positive (zero and negatives are
/// falsy). A string is truthy whatever its content, empty included; only
/// a null reference is falsy. Dates are falsy only at the two sentinel
/// extremes. Every container, function, and object is truthy.
pub fn is_true(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n > 0.0,
        Value::Str(_) => true,
        Value::Date(d) => !Value::is_sentinel_date(*d),
        _ => true,
    }
}

/// Logical not. Bool negates, Null maps to true, and every other tag maps
/// to a fixed false: there is no implicit truthiness coercion here, in
/// contrast with [`is_true`].
pub fn logical_not(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(!b),
        Value::Null => Value::Bool(true),
        _ => Value::Bool(false),
    }
}

/// Arithmetic negation; numbers only.
pub fn negate(value: &Value) -> EvalResult {
    match value {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(invalid_negation(other.type_name())),
    }
}

/// Apply an increment or compound-assignment step to a number.
///
/// `Inc`/`Dec` ignore the step and apply an implicit 1.
pub fn increment_number(op: IncrementOp, current: f64, step: f64) -> f64 {
    match op {
        IncrementOp::Inc => current + 1.0,
        IncrementOp::Dec => current - 1.0,
        IncrementOp::AddAssign => current + step,
        IncrementOp::SubAssign => current - step,
        IncrementOp::MulAssign => current * step,
        IncrementOp::DivAssign => current / step,
    }
}

/// Apply a compound-assignment step to a string.
///
/// Only `+=` (append) is defined; every other compound operator on a
/// string is a syntax error. The appended result is checked against the
/// string-length budget before it is returned.
pub fn increment_string(
    op: IncrementOp,
    current: &str,
    suffix: &str,
    limiter: &Limiter,
) -> EvalResult {
    if op != IncrementOp::AddAssign {
        return Err(invalid_compound_op(op.symbol(), "string"));
    }
    limiter.check_string_length(current.len() + suffix.len())?;
    let mut out = String::with_capacity(current.len() + suffix.len());
    out.push_str(current);
    out.push_str(suffix);
    Ok(Value::string(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;
    use tally_core::{ErrorKind, Limits};

    #[test]
    fn truthiness_table() {
        assert!(!is_true(&Value::Null));
        assert!(!is_true(&Value::Number(0.0)));
        assert!(!is_true(&Value::Number(-1.0)));
        assert!(is_true(&Value::Number(0.01)));
        assert!(is_true(&Value::string("")));
        assert!(!is_true(&Value::Bool(false)));
        assert!(!is_true(&Value::Date(NaiveDateTime::MIN)));
        assert!(!is_true(&Value::Date(NaiveDateTime::MAX)));
        assert!(is_true(&Value::array(vec![])));
    }

    #[test]
    fn logical_not_is_not_truthiness() {
        assert_eq!(logical_not(&Value::Bool(true)), Value::Bool(false));
        assert_eq!(logical_not(&Value::Null), Value::Bool(true));
        // Even a falsy number maps to false.
        assert_eq!(logical_not(&Value::Number(0.0)), Value::Bool(false));
        assert_eq!(logical_not(&Value::string("x")), Value::Bool(false));
    }

    #[test]
    fn negate_numbers_only() {
        assert_eq!(negate(&Value::Number(2.5)).unwrap(), Value::Number(-2.5));
        let err = negate(&Value::string("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn number_increments() {
        assert_eq!(increment_number(IncrementOp::Inc, 1.0, 99.0), 2.0);
        assert_eq!(increment_number(IncrementOp::Dec, 1.0, 99.0), 0.0);
        assert_eq!(increment_number(IncrementOp::MulAssign, 3.0, 4.0), 12.0);
        assert_eq!(increment_number(IncrementOp::DivAssign, 1.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn string_append_only() {
        let limiter = Limiter::default();
        let v = increment_string(IncrementOp::AddAssign, "x", "y", &limiter).unwrap();
        assert_eq!(v, Value::string("xy"));
        let err = increment_string(IncrementOp::SubAssign, "x", "y", &limiter).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn string_append_respects_limit() {
        let limiter = Limiter::new(Limits {
            max_string_length: 3,
            ..Limits::default()
        });
        let err =
            increment_string(IncrementOp::AddAssign, "ab", "cd", &limiter).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
    }
}
