//! Runtime values for the Tally script engine.
//!
//! `Value` is a closed tagged union: the tag and the payload are one
//! Rust enum variant, so they can never disagree. Conversions between
//! tags always go through explicit factory methods.
//!
//! Container variants (`Array`, `Map`, `Table`, `Object`) hold their
//! payload behind [`Shared`], so clones alias the same storage and
//! assignment mutates in place. Primitive variants are plain copies.

mod composite;
mod tag;

use std::fmt;
use std::rc::Rc;

use chrono::{NaiveDateTime, Weekday};
use rustc_hash::FxHashMap;

pub use composite::{FunctionValue, HostFn, ObjectValue, TableValue, TimeValue, UnitValue};
pub use tag::TypeTag;

use crate::Shared;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// Null / absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// IEEE double-precision number (the only numeric kind).
    Number(f64),
    /// Immutable string payload; variable slots are rebound on mutation.
    Str(Rc<str>),
    /// Absolute date and time.
    Date(NaiveDateTime),
    /// Signed duration.
    Time(TimeValue),
    /// Day of the week.
    Day(Weekday),
    /// Growable sequence.
    Array(Shared<Vec<Value>>),
    /// String-keyed map.
    Map(Shared<FxHashMap<String, Value>>),
    /// Named columns plus rows.
    Table(Shared<TableValue>),
    /// Unit-of-measure quantity.
    Quantity(UnitValue),
    /// User-defined or host function.
    Function(Rc<FunctionValue>),
    /// Opaque host object with named fields.
    Object(Shared<ObjectValue>),
}

impl Value {
    // Factory methods

    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Rc::from(s.into()))
    }

    /// Create an array value with its own storage.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Shared::new(elements))
    }

    /// Create a map value with its own storage.
    pub fn map(entries: FxHashMap<String, Value>) -> Self {
        Value::Map(Shared::new(entries))
    }

    /// Create an empty map value.
    pub fn empty_map() -> Self {
        Value::Map(Shared::new(FxHashMap::default()))
    }

    /// Create a table value with its own storage.
    pub fn table(table: TableValue) -> Self {
        Value::Table(Shared::new(table))
    }

    /// Create a function value.
    pub fn function(f: FunctionValue) -> Self {
        Value::Function(Rc::new(f))
    }

    /// Create a host object value.
    pub fn object(obj: ObjectValue) -> Self {
        Value::Object(Shared::new(obj))
    }

    // Inspection

    /// The value's type tag. O(1).
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(_) => TypeTag::Number,
            Value::Str(_) => TypeTag::String,
            Value::Date(_) => TypeTag::Date,
            Value::Time(_) => TypeTag::Time,
            Value::Day(_) => TypeTag::DayOfWeek,
            Value::Array(_) => TypeTag::Array,
            Value::Map(_) => TypeTag::Map,
            Value::Table(_) => TypeTag::Table,
            Value::Quantity(_) => TypeTag::Unit,
            Value::Function(_) => TypeTag::Function,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// Script-facing type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    /// Clone for argument binding.
    ///
    /// Primitive tags get an independent copy so callee mutation of a
    /// parameter (e.g. `x++`) cannot alias the caller's value; container
    /// and object tags share their payload, matching reference semantics.
    #[must_use]
    pub fn clone_for_arg(&self) -> Value {
        // Container variants clone the Shared handle, which is exactly
        // the "same reference" contract; primitives copy their payload.
        self.clone()
    }

    /// Textual form used by string concatenation fallback and
    /// interpolation. Null renders as the empty string; booleans render
    /// lowercase.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_owned(),
            Value::Number(n) => render_number(*n),
            Value::Str(s) => s.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Time(t) => t.render(),
            Value::Day(d) => weekday_name(*d).to_owned(),
            Value::Array(elements) => {
                let parts: Vec<String> =
                    elements.borrow().iter().map(Value::render).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(map) => {
                let map = map.borrow();
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let parts: Vec<String> = keys
                    .into_iter()
                    .map(|k| format!("{k}: {}", map[k].render()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Table(table) => {
                let table = table.borrow();
                format!("table({} rows)", table.row_count())
            }
            Value::Quantity(q) => format!("{} {}", render_number(q.relative), q.subgroup),
            Value::Function(f) => format!("function {}", f.describe()),
            Value::Object(obj) => format!("{} object", obj.borrow().type_name),
        }
    }

    /// Sentinel extreme dates; the only two falsy dates.
    #[inline]
    pub fn is_sentinel_date(date: NaiveDateTime) -> bool {
        date == NaiveDateTime::MIN || date == NaiveDateTime::MAX
    }
}

/// Day number used when a `DayOfWeek` meets a comparison (Sunday = 0).
pub fn day_number(day: Weekday) -> f64 {
    f64::from(day.num_days_from_sunday())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Render a number the way scripts expect: integral values print without
/// a trailing `.0`.
pub fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let int = n as i64;
        int.to_string()
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Day(a), Value::Day(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.same(b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => a.same(b) || *a.borrow() == *b.borrow(),
            (Value::Table(a), Value::Table(b)) => a.same(b) || *a.borrow() == *b.borrow(),
            (Value::Quantity(a), Value::Quantity(b)) => a == b,
            // Functions and host objects compare by identity.
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Date(d) => write!(f, "Date({d})"),
            Value::Time(t) => write!(f, "Time({})", t.render()),
            Value::Day(d) => write!(f, "Day({d:?})"),
            Value::Array(a) => write!(f, "Array({:?})", &*a.borrow()),
            Value::Map(m) => write!(f, "Map({:?})", &*m.borrow()),
            Value::Table(t) => write!(f, "Table({} rows)", t.borrow().row_count()),
            Value::Quantity(q) => write!(f, "Quantity({q:?})"),
            Value::Function(func) => write!(f, "Function({})", func.describe()),
            Value::Object(o) => write!(f, "Object({})", o.borrow().type_name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_and_payload_agree() {
        assert_eq!(Value::Null.type_tag(), TypeTag::Null);
        assert_eq!(Value::Number(1.5).type_tag(), TypeTag::Number);
        assert_eq!(Value::string("x").type_tag(), TypeTag::String);
        assert_eq!(Value::array(vec![]).type_tag(), TypeTag::Array);
    }

    #[test]
    fn render_table() {
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::Bool(true).render(), "true");
        assert_eq!(Value::Bool(false).render(), "false");
        assert_eq!(Value::Number(3.0).render(), "3");
        assert_eq!(Value::Number(3.25).render(), "3.25");
        assert_eq!(
            Value::array(vec![Value::Number(1.0), Value::Number(2.0)]).render(),
            "[1, 2]"
        );
    }

    #[test]
    fn container_clones_alias() {
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = a.clone_for_arg();
        if let (Value::Array(x), Value::Array(y)) = (&a, &b) {
            assert!(x.same(y));
        } else {
            panic!("expected arrays");
        }
    }

    #[test]
    fn equality_compares_contents() {
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = Value::array(vec![Value::Number(1.0)]);
        assert_eq!(a, b);
        assert_ne!(a, Value::array(vec![Value::Number(2.0)]));
    }
}
