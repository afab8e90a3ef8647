//! Tally Eval - tree-walking evaluator for the Tally script engine.
//!
//! This crate executes a parsed [`tally_ir::Ast`] against the value model
//! in `tally_core`.
//!
//! # Architecture
//!
//! - `Environment`: variable scoping with a scope stack plus the
//!   function-symbol table
//! - `evaluate_binary` / `evaluate_compare`: direct enum-based operator
//!   dispatch over the fixed type set
//! - `unary`: increments, truthiness, negation, logical not, indexing
//! - `MethodRegistry`: per-type method/property dispatch with
//!   positional/variadic/default argument binding
//! - `Interpreter`: the AST visitor; control flow is a `Flow` signal
//!   threaded through the call stack, never an exception
//!
//! The registries (types, units, methods) are populated once at startup
//! and read-only afterwards; independent evaluations may share them.

mod context;
mod convert;
mod environment;
pub mod interpreter;
pub mod methods;
mod operators;
mod shared;
mod stack;
mod unary;

#[cfg(test)]
mod tests;

pub use context::{CallFrame, CallStack, EvalContext};
pub use convert::convert_value;
pub use environment::{Environment, Scope};
pub use interpreter::{Flow, Interpreter};
pub use methods::{
    ArgKind, ArgSpec, HostCtx, MemberKind, MethodDescriptor, MethodKey, MethodRegistry,
};
pub use operators::{access_index, evaluate_binary, evaluate_compare};
pub use shared::SharedRegistry;
pub use stack::ensure_sufficient_stack;
pub use unary::{increment_number, increment_string, is_true, logical_not, negate};

// Re-export the core value types for convenience.
pub use tally_core::{
    ErrorKind, EvalError, EvalResult, FunctionValue, Limiter, Limits, ObjectValue, TableValue,
    TimeValue, TypeRegistry, TypeTag, UnitTable, UnitValue, Value,
};
