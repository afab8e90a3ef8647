//! Arena-allocated AST.
//!
//! All expression and statement children are indices, not boxes. The
//! arena (`Ast`) owns contiguous arrays for nodes plus side tables for
//! variable-length payloads (argument lists, parameters, map entries,
//! interpolation parts).

use std::fmt;

use crate::ops::{BinaryOp, CompareOp, IncrementOp, LogicalOp, UnaryOp};
use crate::{Name, Span};

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel for "no node" (absent else-branch, bare declaration, ...).
            pub const INVALID: $name = $name(u32::MAX);

            /// Create from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            /// Raw index value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Returns `true` unless this is the `INVALID` sentinel.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "(INVALID)"))
                }
            }
        }
    };
}

arena_id! {
    /// Index of an expression node in the arena.
    ExprId
}
arena_id! {
    /// Index of a statement node in the arena.
    StmtId
}

macro_rules! arena_range {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            /// The empty range.
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            /// Number of elements in the range.
            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            /// Returns `true` for the empty range.
            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }
        }
    };
}

arena_range! {
    /// Contiguous run of `ExprId`s in the arena's expression-list table.
    ExprRange
}
arena_range! {
    /// Contiguous run of `StmtId`s in the arena's statement-list table.
    StmtRange
}
arena_range! {
    /// Contiguous run of `Param`s in the arena's parameter table.
    ParamRange
}
arena_range! {
    /// Contiguous run of `MapEntry`s in the arena's map-entry table.
    MapEntryRange
}
arena_range! {
    /// Contiguous run of `Name`s in the arena's name table.
    NameRange
}
arena_range! {
    /// Contiguous run of `InterpPart`s in the arena's interpolation table.
    PartRange
}

/// Declared function or lambda parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
}

/// One key/value pair of a map literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MapEntry {
    pub key: Name,
    pub value: ExprId,
}

/// One interpolation segment of an interpolated string.
///
/// The literal text before the first segment lives on the `Interp`
/// expression itself (`head`); each part holds one interpolated
/// expression and the literal text after it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct InterpPart {
    pub expr: ExprId,
    pub text_after: Name,
}

/// Expression node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression variants.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ExprKind {
    /// Number literal: 42, 3.14
    Number(f64),

    /// String literal (interned)
    Str(Name),

    /// Boolean literal: true, false
    Bool(bool),

    /// Null literal
    Null,

    /// Variable reference
    Ident(Name),

    /// Interpolated string: `"total is {a + b} units"`
    Interp { head: Name, parts: PartRange },

    /// Binary arithmetic: left op right
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Comparison: left op right
    Compare {
        op: CompareOp,
        left: ExprId,
        right: ExprId,
    },

    /// Short-circuit logical: left op right
    Logical {
        op: LogicalOp,
        left: ExprId,
        right: ExprId,
    },

    /// Unary operation: op operand
    Unary { op: UnaryOp, operand: ExprId },

    /// Increment / compound assignment on an lvalue.
    ///
    /// `operand` is `ExprId::INVALID` for the implicit-step forms
    /// (`++`, `--`).
    Increment {
        op: IncrementOp,
        target: ExprId,
        operand: ExprId,
    },

    /// Assignment. `value` is `ExprId::INVALID` for a bare declaration,
    /// which binds Null.
    Assign { target: ExprId, value: ExprId },

    /// Member access: receiver.member
    Member { receiver: ExprId, member: Name },

    /// Index access: `receiver[index]`
    Index { receiver: ExprId, index: ExprId },

    /// Call: callee(args...). The callee may be an identifier or a
    /// member access; the evaluator routes each shape separately.
    Call { callee: ExprId, args: ExprRange },

    /// Lambda: function(params) { body }
    Lambda { params: ParamRange, body: StmtId },

    /// Array literal: [a, b, c]
    Array(ExprRange),

    /// Map literal: { key: value, ... }
    MapLit(MapEntryRange),

    /// Table literal: named columns plus row expressions (each row is an
    /// array expression).
    TableLit { columns: NameRange, rows: ExprRange },

    /// Construction: new `TypeName`(args...)
    New { type_name: Name, args: ExprRange },
}

/// Statement node.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// Statement variants.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// Expression statement.
    Expr(ExprId),

    /// Block: { stmts }
    Block(StmtRange),

    /// Conditional. `else_block` is `StmtId::INVALID` when absent.
    If {
        cond: ExprId,
        then_block: StmtId,
        else_block: StmtId,
    },

    /// While loop.
    While { cond: ExprId, body: StmtId },

    /// C-style for loop. `init` and `step` may be `ExprId::INVALID`.
    For {
        init: ExprId,
        cond: ExprId,
        step: ExprId,
        body: StmtId,
    },

    /// For-each loop over array elements, map keys, or table rows.
    ForEach {
        binding: Name,
        iter: ExprId,
        body: StmtId,
    },

    /// Function declaration.
    FuncDecl {
        name: Name,
        params: ParamRange,
        body: StmtId,
    },

    /// Return. `ExprId::INVALID` returns Null.
    Return(ExprId),

    /// Break out of the nearest enclosing loop.
    Break,

    /// Continue the nearest enclosing loop.
    Continue,

    /// Try/catch. `handler` runs with `catch_name` bound to the error value.
    TryCatch {
        body: StmtId,
        catch_name: Name,
        handler: StmtId,
    },

    /// Explicit failure; never caught by script-level try/catch.
    /// `ExprId::INVALID` fails with a default message.
    Fail(ExprId),
}

/// AST arena.
///
/// Owns every node of one parsed script. Node lists (call arguments,
/// block statements, ...) are stored as contiguous runs in side tables
/// and referenced by range.
#[derive(Default, Debug)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    params: Vec<Param>,
    map_entries: Vec<MapEntry>,
    names: Vec<Name>,
    parts: Vec<InterpPart>,
}

impl Ast {
    /// Create an empty arena.
    pub fn new() -> Self {
        Ast::default()
    }

    /// Allocate an expression node.
    pub fn push_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(Expr { kind, span });
        id
    }

    /// Allocate a statement node.
    pub fn push_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId::new(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX));
        self.stmts.push(Stmt { kind, span });
        id
    }

    /// Get an expression node.
    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.raw() as usize]
    }

    /// Copy out an expression kind (releases the arena borrow for
    /// recursive evaluation).
    #[inline]
    pub fn expr_kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.raw() as usize].kind
    }

    /// Get the span of an expression.
    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.exprs[id.raw() as usize].span
    }

    /// Get a statement node.
    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.raw() as usize]
    }

    /// Copy out a statement kind.
    #[inline]
    pub fn stmt_kind(&self, id: StmtId) -> StmtKind {
        self.stmts[id.raw() as usize].kind
    }

    /// Get the span of a statement.
    #[inline]
    pub fn stmt_span(&self, id: StmtId) -> Span {
        self.stmts[id.raw() as usize].span
    }

    /// Store a list of expression ids, returning its range.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len()).unwrap_or(u32::MAX);
        self.expr_lists.extend_from_slice(ids);
        ExprRange {
            start,
            len: u32::try_from(ids.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve an expression-list range.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.start as usize..(range.start + range.len) as usize]
    }

    /// Store a list of statement ids, returning its range.
    pub fn push_stmt_list(&mut self, ids: &[StmtId]) -> StmtRange {
        let start = u32::try_from(self.stmt_lists.len()).unwrap_or(u32::MAX);
        self.stmt_lists.extend_from_slice(ids);
        StmtRange {
            start,
            len: u32::try_from(ids.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve a statement-list range.
    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.start as usize..(range.start + range.len) as usize]
    }

    /// Store a parameter list, returning its range.
    pub fn push_params(&mut self, params: &[Param]) -> ParamRange {
        let start = u32::try_from(self.params.len()).unwrap_or(u32::MAX);
        self.params.extend_from_slice(params);
        ParamRange {
            start,
            len: u32::try_from(params.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve a parameter range.
    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.start as usize..(range.start + range.len) as usize]
    }

    /// Store map-literal entries, returning their range.
    pub fn push_map_entries(&mut self, entries: &[MapEntry]) -> MapEntryRange {
        let start = u32::try_from(self.map_entries.len()).unwrap_or(u32::MAX);
        self.map_entries.extend_from_slice(entries);
        MapEntryRange {
            start,
            len: u32::try_from(entries.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve a map-entry range.
    #[inline]
    pub fn map_entries(&self, range: MapEntryRange) -> &[MapEntry] {
        &self.map_entries[range.start as usize..(range.start + range.len) as usize]
    }

    /// Store a name list, returning its range.
    pub fn push_names(&mut self, names: &[Name]) -> NameRange {
        let start = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        self.names.extend_from_slice(names);
        NameRange {
            start,
            len: u32::try_from(names.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve a name range.
    #[inline]
    pub fn names(&self, range: NameRange) -> &[Name] {
        &self.names[range.start as usize..(range.start + range.len) as usize]
    }

    /// Store interpolation parts, returning their range.
    pub fn push_parts(&mut self, parts: &[InterpPart]) -> PartRange {
        let start = u32::try_from(self.parts.len()).unwrap_or(u32::MAX);
        self.parts.extend_from_slice(parts);
        PartRange {
            start,
            len: u32::try_from(parts.len()).unwrap_or(u32::MAX),
        }
    }

    /// Resolve an interpolation-part range.
    #[inline]
    pub fn parts(&self, range: PartRange) -> &[InterpPart] {
        &self.parts[range.start as usize..(range.start + range.len) as usize]
    }

    /// Number of expression nodes in the arena.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Number of statement nodes in the arena.
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_read_back() {
        let mut ast = Ast::new();
        let a = ast.push_expr(ExprKind::Number(1.0), Span::DUMMY);
        let b = ast.push_expr(ExprKind::Number(2.0), Span::DUMMY);
        let sum = ast.push_expr(
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: a,
                right: b,
            },
            Span::new(3, 1),
        );
        assert_eq!(ast.expr_count(), 3);
        assert_eq!(ast.expr_span(sum), Span::new(3, 1));
        match ast.expr_kind(sum) {
            ExprKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOp::Add);
                assert_eq!(left, a);
                assert_eq!(right, b);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn ranges_resolve_to_pushed_slices() {
        let mut ast = Ast::new();
        let a = ast.push_expr(ExprKind::Null, Span::DUMMY);
        let b = ast.push_expr(ExprKind::Bool(true), Span::DUMMY);
        let range = ast.push_expr_list(&[a, b]);
        assert_eq!(ast.expr_list(range), &[a, b]);
        assert!(ExprRange::EMPTY.is_empty());
    }

    #[test]
    fn invalid_ids_are_not_valid() {
        assert!(!ExprId::INVALID.is_valid());
        assert!(!StmtId::INVALID.is_valid());
        assert!(ExprId::new(0).is_valid());
    }
}
