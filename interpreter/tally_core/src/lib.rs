//! Tally Core - runtime value model for the Tally script engine.
//!
//! This crate holds everything the evaluator needs that is not the
//! evaluator itself:
//!
//! - `Value`: the closed tagged union of runtime values
//! - `TypeTag` / `TypeRegistry`: type descriptors and the conversion matrix
//! - `UnitTable`: the physical-units conversion engine
//! - `Limiter`: the host-configurable resource governor
//! - `EvalError` / `EvalResult`: the error taxonomy and its factory
//!   constructors

pub mod errors;
mod limits;
mod shared;
mod types;
mod units;
mod value;

pub use errors::{ErrorKind, EvalError, EvalResult};
pub use limits::{Limiter, Limits};
pub use shared::Shared;
pub use types::{ConversionMode, TypeDescriptor, TypeRegistry};
pub use units::{UnitGroup, UnitTable};
pub use value::{
    day_number, render_number, FunctionValue, HostFn, ObjectValue, TableValue, TimeValue, TypeTag,
    UnitValue, Value,
};
