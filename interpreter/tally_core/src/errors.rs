//! Error taxonomy and factory constructors for the evaluator.
//!
//! Every failure the engine can produce is an [`EvalError`] carrying one
//! of the eight [`ErrorKind`]s from the design's taxonomy. Call sites use
//! the factory functions below rather than spelling out messages, so the
//! wording lives in one place.
//!
//! Two kinds are *fatal*: `LimitExceeded` and `Fail`. Script-level
//! try/catch must let them propagate; everything else is catchable and
//! converts to a structured error value via [`EvalError::to_value`].

use std::fmt;

use tally_ir::Span;

use crate::value::Value;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Malformed unary/compound-operator usage detected at evaluation time.
    #[error("SyntaxError")]
    Syntax,
    /// Generic evaluation failure (missing variable, member, index, ...).
    #[error("RuntimeError")]
    Runtime,
    /// Invalid conversion or invalid operand types to an operator.
    #[error("TypeError")]
    Type,
    /// Method/constructor argument-count or shape mismatch.
    #[error("ArgumentError")]
    Argument,
    /// Mismatched unit groups.
    #[error("UnitError")]
    Unit,
    /// Resource-governor trip; never caught by script try/catch.
    #[error("LimitExceeded")]
    LimitExceeded,
    /// break/continue/return with no enclosing loop/function.
    #[error("ControlFlowError")]
    ControlFlow,
    /// Explicit `fail`; never caught by script try/catch.
    #[error("ScriptFailure")]
    Fail,
}

/// Evaluation error.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    /// Structured category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Source location of the originating AST node, when known.
    pub span: Option<Span>,
}

/// Result of evaluating one node.
pub type EvalResult = Result<Value, EvalError>;

impl EvalError {
    /// Create an error from a kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            span: None,
        }
    }

    /// Attach a span if none is recorded yet.
    ///
    /// The innermost node that knows its location wins; outer frames
    /// calling `with_span` do not overwrite it.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    /// Returns `true` for the two kinds that always propagate uncaught.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::LimitExceeded | ErrorKind::Fail)
    }

    /// Convert to the structured error value bound to a catch variable.
    ///
    /// The resulting map exposes `name`, `message`, `source`, `line`, and
    /// `stack` to the catch body.
    pub fn to_value(&self, source: &str, stack: String) -> Value {
        let mut map = rustc_hash::FxHashMap::default();
        map.insert("name".to_owned(), Value::string(self.kind.to_string()));
        map.insert("message".to_owned(), Value::string(self.message.clone()));
        map.insert("source".to_owned(), Value::string(source.to_owned()));
        map.insert(
            "line".to_owned(),
            Value::Number(self.span.map_or(0.0, |s| f64::from(s.line))),
        );
        map.insert("stack".to_owned(), Value::string(stack));
        Value::map(map)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Syntax errors

/// Compound operator applied to a type that only supports `+=`.
pub fn invalid_compound_op(op: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Syntax,
        format!("operator '{op}' cannot be applied to {type_name}"),
    )
}

// Runtime errors

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, format!("variable '{name}' is not defined"))
}

pub fn missing_member(member: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Runtime,
        format!("{type_name} has no member '{member}'"),
    )
}

pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Runtime,
        format!("index {index} out of bounds (length {len})"),
    )
}

pub fn key_not_found(key: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, format!("key '{key}' not found"))
}

pub fn null_access() -> EvalError {
    EvalError::new(ErrorKind::Runtime, "cannot access a member of null")
}

pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, format!("{type_name} is not callable"))
}

pub fn unknown_conversion(src: &str, dst: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Runtime,
        format!("no conversion registered from {src} to {dst}"),
    )
}

pub fn unknown_type(name: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, format!("unknown type '{name}'"))
}

pub fn invalid_assignment_target() -> EvalError {
    EvalError::new(ErrorKind::Runtime, "invalid assignment target")
}

/// Date or time arithmetic left the representable range.
pub fn arithmetic_overflow(what: &str) -> EvalError {
    EvalError::new(ErrorKind::Runtime, format!("{what} arithmetic overflowed"))
}

// Type errors

pub fn invalid_operator(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Type,
        format!("operator '{op}' is not defined for {left} and {right}"),
    )
}

pub fn invalid_negation(type_name: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("cannot negate {type_name}"))
}

pub fn unsupported_time_op(op: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("operator '{op}' is not defined for times"))
}

pub fn unsupported_date_op(op: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("operator '{op}' is not defined for dates"))
}

pub fn cannot_index(target: &str, index: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("cannot index {target} with {index}"))
}

pub fn not_a_number(type_name: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("expected a number, got {type_name}"))
}

pub fn invalid_conversion(src: &str, dst: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("cannot convert {src} to {dst}"))
}

pub fn not_iterable(type_name: &str) -> EvalError {
    EvalError::new(ErrorKind::Type, format!("{type_name} is not iterable"))
}

// Argument errors

pub fn no_such_method(method: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("{type_name} has no method '{method}'"),
    )
}

pub fn no_such_property(property: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("{type_name} has no property '{property}'"),
    )
}

pub fn wrong_arg_count(method: &str, expected: usize, actual: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("{method} expects {expected} argument(s), got {actual}"),
    )
}

pub fn wrong_arg_type(method: &str, expected: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("{method} expects a {expected} argument"),
    )
}

pub fn property_not_readable(property: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("property '{property}' of {type_name} is not readable"),
    )
}

pub fn property_not_writable(property: &str, type_name: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("property '{property}' of {type_name} is not writable"),
    )
}

pub fn no_matching_constructor(type_name: &str, argc: usize) -> EvalError {
    EvalError::new(
        ErrorKind::Argument,
        format!("no constructor of {type_name} takes {argc} argument(s)"),
    )
}

pub fn invalid_date_components() -> EvalError {
    EvalError::new(ErrorKind::Argument, "arguments do not form a valid date")
}

// Unit errors

pub fn unit_group_mismatch(left: &str, right: &str) -> EvalError {
    EvalError::new(
        ErrorKind::Unit,
        format!("cannot combine units from group '{left}' with group '{right}'"),
    )
}

pub fn unknown_unit(name: &str) -> EvalError {
    EvalError::new(ErrorKind::Unit, format!("unknown unit '{name}'"))
}

// Limit errors

pub fn loop_limit_exceeded(max: u64) -> EvalError {
    EvalError::new(
        ErrorKind::LimitExceeded,
        format!("loop budget of {max} statements exceeded"),
    )
}

pub fn string_limit_exceeded(len: usize, max: usize) -> EvalError {
    EvalError::new(
        ErrorKind::LimitExceeded,
        format!("string of {len} bytes exceeds limit of {max}"),
    )
}

pub fn scope_string_limit_exceeded(max: usize) -> EvalError {
    EvalError::new(
        ErrorKind::LimitExceeded,
        format!("scope string budget of {max} bytes exceeded"),
    )
}

pub fn scope_limit_exceeded(max: usize) -> EvalError {
    EvalError::new(
        ErrorKind::LimitExceeded,
        format!("scope depth limit of {max} exceeded"),
    )
}

pub fn exception_limit_exceeded(max: u32) -> EvalError {
    EvalError::new(
        ErrorKind::LimitExceeded,
        format!("caught-exception budget of {max} exceeded"),
    )
}

// Control flow errors

pub fn no_enclosing_function() -> EvalError {
    EvalError::new(ErrorKind::ControlFlow, "'return' outside of a function")
}

pub fn no_enclosing_loop(keyword: &str) -> EvalError {
    EvalError::new(
        ErrorKind::ControlFlow,
        format!("'{keyword}' outside of a loop"),
    )
}

// Explicit failure

pub fn script_failure(message: &str) -> EvalError {
    EvalError::new(ErrorKind::Fail, message.to_owned())
}
