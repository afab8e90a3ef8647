//! Value conversion driven by the registered conversion matrix.

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use tally_core::errors::{invalid_conversion, unknown_conversion};
use tally_core::{day_number, ConversionMode, EvalResult, TimeValue, TypeRegistry, TypeTag, Value};

/// Convert `value` to the destination tag.
///
/// The registry decides whether the pair is allowed at all; this function
/// performs the payload work for `Supported` and `RuntimeCheck` pairs.
/// A `RuntimeCheck` pair whose payload does not fit (e.g. a non-numeric
/// string to number) fails with a type error.
pub fn convert_value(types: &TypeRegistry, value: &Value, dst: TypeTag) -> EvalResult {
    let src = value.type_tag();
    match types.conversion_mode(src, dst)? {
        ConversionMode::SameType => Ok(value.clone()),
        ConversionMode::NotSupported => Err(invalid_conversion(src.name(), dst.name())),
        ConversionMode::Supported | ConversionMode::RuntimeCheck => apply(value, dst),
    }
}

fn apply(value: &Value, dst: TypeTag) -> EvalResult {
    let src = value.type_tag();
    // Null is assignable to any slot.
    if matches!(value, Value::Null) {
        return Ok(Value::Null);
    }
    if dst == TypeTag::String {
        return Ok(Value::string(value.render()));
    }
    match (value, dst) {
        (Value::Bool(b), TypeTag::Number) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        (Value::Number(n), TypeTag::Bool) => Ok(Value::Bool(*n > 0.0)),
        (Value::Str(s), TypeTag::Number) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| invalid_conversion(src.name(), dst.name())),
        (Value::Str(s), TypeTag::Bool) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid_conversion(src.name(), dst.name())),
        },
        (Value::Str(s), TypeTag::Date) => parse_date(s.trim())
            .map(Value::Date)
            .ok_or_else(|| invalid_conversion(src.name(), dst.name())),
        (Value::Str(s), TypeTag::Time) => parse_time(s.trim())
            .map(Value::Time)
            .ok_or_else(|| invalid_conversion(src.name(), dst.name())),
        (Value::Number(n), TypeTag::DayOfWeek) => day_from_number(*n)
            .map(Value::Day)
            .ok_or_else(|| invalid_conversion(src.name(), dst.name())),
        (Value::Day(d), TypeTag::Number) => Ok(Value::Number(day_number(*d))),
        (Value::Date(d), TypeTag::DayOfWeek) => {
            use chrono::Datelike;
            Ok(Value::Day(d.weekday()))
        }
        (Value::Quantity(q), TypeTag::Number) => Ok(Value::Number(q.relative)),
        _ => Err(unknown_conversion(src.name(), dst.name())),
    }
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(d);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse `hh:mm`, `hh:mm:ss`, or `d.hh:mm:ss`.
fn parse_time(s: &str) -> Option<TimeValue> {
    let (days, rest) = match s.split_once('.') {
        Some((d, rest)) => (d.parse::<i64>().ok()?, rest),
        None => (0, s),
    };
    let mut parts = rest.split(':');
    let hours = parts.next()?.parse::<i64>().ok()?;
    let minutes = parts.next()?.parse::<i64>().ok()?;
    if let Some(seconds) = parts.next() {
        // Seconds are accepted but truncated to whole minutes.
        seconds.parse::<i64>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(TimeValue::from_parts(days, hours, minutes))
}

fn day_from_number(n: f64) -> Option<Weekday> {
    if n.fract() != 0.0 || !(0.0..=6.0).contains(&n) {
        return None;
    }
    // Sunday = 0, matching `day_number`.
    Some(match n as i64 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_core::ErrorKind;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_builtins()
    }

    #[test]
    fn number_to_string() {
        let v = convert_value(&registry(), &Value::Number(3.0), TypeTag::String).unwrap();
        assert_eq!(v, Value::string("3"));
    }

    #[test]
    fn string_to_number_checked_at_runtime() {
        let reg = registry();
        let ok = convert_value(&reg, &Value::string("42.5"), TypeTag::Number).unwrap();
        assert_eq!(ok, Value::Number(42.5));
        let err = convert_value(&reg, &Value::string("soup"), TypeTag::Number).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn bool_number_round_trip() {
        let reg = registry();
        assert_eq!(
            convert_value(&reg, &Value::Bool(true), TypeTag::Number).unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            convert_value(&reg, &Value::Number(0.0), TypeTag::Bool).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn null_converts_to_anything() {
        let reg = registry();
        assert_eq!(
            convert_value(&reg, &Value::Null, TypeTag::Number).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn containers_refuse_conversion() {
        let err =
            convert_value(&registry(), &Value::array(vec![]), TypeTag::Map).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn string_to_time() {
        let v = convert_value(&registry(), &Value::string("1.02:30:00"), TypeTag::Time).unwrap();
        assert_eq!(v, Value::Time(TimeValue::from_parts(1, 2, 30)));
    }

    #[test]
    fn number_to_day_of_week() {
        let v = convert_value(&registry(), &Value::Number(0.0), TypeTag::DayOfWeek).unwrap();
        assert_eq!(v, Value::Day(Weekday::Sun));
        let err =
            convert_value(&registry(), &Value::Number(9.0), TypeTag::DayOfWeek).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }
}
