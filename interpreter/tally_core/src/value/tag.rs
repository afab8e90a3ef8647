//! Type tags for the value model.

use std::fmt;

/// Discriminant identifying a [`Value`](crate::Value)'s kind.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TypeTag {
    Null,
    Bool,
    Number,
    String,
    Date,
    Time,
    DayOfWeek,
    Array,
    Map,
    Table,
    Unit,
    Function,
    Object,
}

impl TypeTag {
    /// All tags, in declaration order. Used to seed the type registry.
    pub const ALL: [TypeTag; 13] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Date,
        TypeTag::Time,
        TypeTag::DayOfWeek,
        TypeTag::Array,
        TypeTag::Map,
        TypeTag::Table,
        TypeTag::Unit,
        TypeTag::Function,
        TypeTag::Object,
    ];

    /// Script-facing name.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::DayOfWeek => "dayofweek",
            TypeTag::Array => "array",
            TypeTag::Map => "map",
            TypeTag::Table => "table",
            TypeTag::Unit => "unit",
            TypeTag::Function => "function",
            TypeTag::Object => "object",
        }
    }

    /// True for Null and the six scalar tags (Bool through DayOfWeek).
    #[inline]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeTag::Null
                | TypeTag::Bool
                | TypeTag::Number
                | TypeTag::String
                | TypeTag::Date
                | TypeTag::Time
                | TypeTag::DayOfWeek
        )
    }

    /// True for primitives plus Table.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.is_primitive() || matches!(self, TypeTag::Table)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_split() {
        assert!(TypeTag::Null.is_primitive());
        assert!(TypeTag::Time.is_primitive());
        assert!(!TypeTag::Array.is_primitive());
        assert!(!TypeTag::Table.is_primitive());
    }

    #[test]
    fn builtin_includes_table() {
        assert!(TypeTag::Table.is_builtin());
        assert!(TypeTag::String.is_builtin());
        assert!(!TypeTag::Array.is_builtin());
        assert!(!TypeTag::Object.is_builtin());
    }
}
