//! Composite value payloads: times, quantities, tables, functions, objects.

use std::rc::Rc;

use chrono::Duration;
use rustc_hash::FxHashMap;

use tally_ir::{Name, ParamRange, StmtId};

use crate::errors::EvalResult;
use crate::value::Value;

/// Signed duration payload of `Value::Time`.
///
/// Stores whole seconds; the scripting language has no sub-second time
/// arithmetic.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct TimeValue(Duration);

impl TimeValue {
    /// Zero-length duration.
    pub fn zero() -> Self {
        TimeValue(Duration::zero())
    }

    pub fn from_days(days: i64) -> Self {
        TimeValue(Duration::days(days))
    }

    pub fn from_hours(hours: i64) -> Self {
        TimeValue(Duration::hours(hours))
    }

    pub fn from_minutes(minutes: i64) -> Self {
        TimeValue(Duration::minutes(minutes))
    }

    pub fn from_parts(days: i64, hours: i64, minutes: i64) -> Self {
        TimeValue(Duration::days(days) + Duration::hours(hours) + Duration::minutes(minutes))
    }

    /// Whole-day component (`.Days` in the comparison rules).
    #[inline]
    pub fn days(self) -> i64 {
        self.0.num_days()
    }

    /// Hour component (0..24).
    #[inline]
    pub fn hours(self) -> i64 {
        self.0.num_hours() % 24
    }

    /// Minute component (0..60).
    #[inline]
    pub fn minutes(self) -> i64 {
        self.0.num_minutes() % 60
    }

    /// Total length in minutes.
    #[inline]
    pub fn total_minutes(self) -> i64 {
        self.0.num_minutes()
    }

    /// Total length in days, fractional.
    pub fn total_days(self) -> f64 {
        self.0.num_seconds() as f64 / 86_400.0
    }

    pub fn checked_add(self, other: TimeValue) -> Option<TimeValue> {
        self.0.checked_add(&other.0).map(TimeValue)
    }

    pub fn checked_sub(self, other: TimeValue) -> Option<TimeValue> {
        self.0.checked_sub(&other.0).map(TimeValue)
    }

    /// Wrap a raw duration (used by date subtraction).
    pub fn from_duration(d: Duration) -> Self {
        TimeValue(d)
    }

    /// Textual form: `d.hh:mm:ss` when a day component exists, else
    /// `hh:mm:ss`.
    pub fn render(self) -> String {
        let days = self.0.num_days();
        let hours = self.0.num_hours() % 24;
        let minutes = self.0.num_minutes() % 60;
        let seconds = self.0.num_seconds() % 60;
        if days == 0 {
            format!("{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            format!("{days}.{:02}:{:02}:{:02}", hours.abs(), minutes.abs(), seconds.abs())
        }
    }
}

/// Payload of `Value::Quantity`: a unit-of-measure magnitude.
///
/// `relative` is the magnitude in `subgroup` units; `base` is the same
/// magnitude expressed in the group's base unit. Both are carried so
/// arithmetic can work on base magnitudes and re-tag the result without
/// consulting the unit table twice.
#[derive(Clone, PartialEq, Debug)]
pub struct UnitValue {
    pub relative: f64,
    pub base: f64,
    pub group: Rc<str>,
    pub subgroup: Rc<str>,
}

impl UnitValue {
    pub fn new(relative: f64, base: f64, group: &str, subgroup: &str) -> Self {
        UnitValue {
            relative,
            base,
            group: Rc::from(group),
            subgroup: Rc::from(subgroup),
        }
    }
}

/// Payload of `Value::Table`: named columns over rows of values.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TableValue {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableValue {
    /// Create a table with the given column names and no rows.
    pub fn new(columns: Vec<String>) -> Self {
        TableValue {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a row. Short rows are padded with Null; long rows are
    /// truncated to the column count.
    pub fn add_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Replace a row. Returns `false` when the index is out of range.
    pub fn set_row(&mut self, index: usize, mut row: Vec<Value>) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        row.resize(self.columns.len(), Value::Null);
        self.rows[index] = row;
        true
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Host function implementation.
pub type HostFn = fn(&[Value]) -> EvalResult;

/// Payload of `Value::Function`.
#[derive(Debug)]
pub enum FunctionValue {
    /// Script-defined function or lambda. The body is a statement id
    /// into the script's AST arena.
    User {
        name: Name,
        params: ParamRange,
        body: StmtId,
    },
    /// Host-registered function.
    Host { name: &'static str, f: HostFn },
}

impl FunctionValue {
    /// Short description for rendering and diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FunctionValue::User { name, .. } => format!("#{}", name.raw()),
            FunctionValue::Host { name, .. } => (*name).to_owned(),
        }
    }
}

/// Payload of `Value::Object`: a host object with named, typed fields.
///
/// The evaluator treats the tag of a field's current value as its
/// declared type when converting assigned values.
#[derive(Clone, PartialEq, Debug)]
pub struct ObjectValue {
    pub type_name: String,
    fields: FxHashMap<String, Value>,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        ObjectValue {
            type_name: type_name.into(),
            fields: FxHashMap::default(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_components() {
        let t = TimeValue::from_parts(2, 3, 30);
        assert_eq!(t.days(), 2);
        assert_eq!(t.hours(), 3);
        assert_eq!(t.minutes(), 30);
        assert_eq!(t.total_minutes(), 2 * 24 * 60 + 3 * 60 + 30);
    }

    #[test]
    fn time_render() {
        assert_eq!(TimeValue::from_parts(0, 2, 5).render(), "02:05:00");
        assert_eq!(TimeValue::from_parts(1, 2, 5).render(), "1.02:05:00");
    }

    #[test]
    fn table_rows_pad_to_columns() {
        let mut t = TableValue::new(vec!["name".into(), "price".into()]);
        t.add_row(vec![Value::string("soup")]);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.row(0).unwrap()[1], Value::Null);
    }

    #[test]
    fn table_set_row_bounds() {
        let mut t = TableValue::new(vec!["a".into()]);
        assert!(!t.set_row(0, vec![Value::Null]));
        t.add_row(vec![Value::Number(1.0)]);
        assert!(t.set_row(0, vec![Value::Number(2.0)]));
        assert_eq!(t.row(0).unwrap()[0], Value::Number(2.0));
    }
}
