//! Tally IR - AST types for the Tally script engine.
//!
//! The evaluator consumes an already-parsed, validated AST. This crate
//! defines that AST plus the identifier interner shared between the
//! external parser and the evaluator.
//!
//! # Design Notes
//!
//! - No `Box<Expr>`; all children are `ExprId(u32)` / `StmtId(u32)` indices
//!   into a contiguous arena (`Ast`), for cache locality and cheap copies.
//! - Identifiers, member names, and string literals are interned `Name`s.
//! - The AST is immutable after construction. The evaluator never writes
//!   to it, so one parsed script can back any number of evaluations.

mod ast;
mod builder;
mod interner;
mod name;
mod ops;
mod span;

pub use ast::{
    Ast, Expr, ExprId, ExprKind, ExprRange, InterpPart, MapEntry, NameRange, Param, ParamRange,
    PartRange, Stmt, StmtId, StmtKind, StmtRange,
};
pub use builder::AstBuilder;
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use ops::{BinaryOp, CompareOp, IncrementOp, LogicalOp, UnaryOp};
pub use span::Span;
