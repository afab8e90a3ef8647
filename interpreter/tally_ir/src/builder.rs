//! Programmatic AST construction.
//!
//! The production parser lives outside this workspace; `AstBuilder` is the
//! in-repo way to assemble the same arena shapes, used by the evaluator's
//! tests and by embedding hosts that synthesize scripts.

use crate::ast::{Ast, ExprId, ExprKind, InterpPart, MapEntry, Param, ParamRange, StmtId, StmtKind};
use crate::ops::{BinaryOp, CompareOp, IncrementOp, LogicalOp, UnaryOp};
use crate::{Name, SharedInterner, Span};

/// Builder over an [`Ast`] arena plus a shared interner.
pub struct AstBuilder {
    ast: Ast,
    interner: SharedInterner,
    program: Vec<StmtId>,
}

impl AstBuilder {
    /// Create a builder with a fresh arena over the given interner.
    pub fn new(interner: SharedInterner) -> Self {
        AstBuilder {
            ast: Ast::new(),
            interner,
            program: Vec::new(),
        }
    }

    /// Intern an identifier or string literal.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Finish, returning the arena and the top-level statement list.
    pub fn finish(self) -> (Ast, Vec<StmtId>) {
        (self.ast, self.program)
    }

    /// Append a statement to the top-level program.
    pub fn push_top(&mut self, stmt: StmtId) {
        self.program.push(stmt);
    }

    // Expressions

    pub fn number(&mut self, n: f64) -> ExprId {
        self.ast.push_expr(ExprKind::Number(n), Span::DUMMY)
    }

    pub fn string(&mut self, s: &str) -> ExprId {
        let name = self.name(s);
        self.ast.push_expr(ExprKind::Str(name), Span::DUMMY)
    }

    pub fn boolean(&mut self, b: bool) -> ExprId {
        self.ast.push_expr(ExprKind::Bool(b), Span::DUMMY)
    }

    pub fn null(&mut self) -> ExprId {
        self.ast.push_expr(ExprKind::Null, Span::DUMMY)
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.ast.push_expr(ExprKind::Ident(name), Span::DUMMY)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.ast
            .push_expr(ExprKind::Binary { op, left, right }, Span::DUMMY)
    }

    pub fn compare(&mut self, op: CompareOp, left: ExprId, right: ExprId) -> ExprId {
        self.ast
            .push_expr(ExprKind::Compare { op, left, right }, Span::DUMMY)
    }

    pub fn logical(&mut self, op: LogicalOp, left: ExprId, right: ExprId) -> ExprId {
        self.ast
            .push_expr(ExprKind::Logical { op, left, right }, Span::DUMMY)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.ast.push_expr(ExprKind::Unary { op, operand }, Span::DUMMY)
    }

    /// `target++` / `target--`
    pub fn increment(&mut self, op: IncrementOp, target: ExprId) -> ExprId {
        self.ast.push_expr(
            ExprKind::Increment {
                op,
                target,
                operand: ExprId::INVALID,
            },
            Span::DUMMY,
        )
    }

    /// `target op= operand`
    pub fn compound(&mut self, op: IncrementOp, target: ExprId, operand: ExprId) -> ExprId {
        self.ast.push_expr(
            ExprKind::Increment {
                op,
                target,
                operand,
            },
            Span::DUMMY,
        )
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.ast
            .push_expr(ExprKind::Assign { target, value }, Span::DUMMY)
    }

    /// `name = value` as a statement.
    pub fn assign_var(&mut self, name: &str, value: ExprId) -> StmtId {
        let target = self.ident(name);
        let assign = self.assign(target, value);
        self.expr_stmt(assign)
    }

    /// Bare declaration: `name;` binds Null.
    pub fn declare(&mut self, name: &str) -> StmtId {
        let target = self.ident(name);
        let assign = self
            .ast
            .push_expr(
                ExprKind::Assign {
                    target,
                    value: ExprId::INVALID,
                },
                Span::DUMMY,
            );
        self.expr_stmt(assign)
    }

    /// Interpolated string: literal head, then (expression, trailing
    /// literal) pairs.
    pub fn interp(&mut self, head: &str, parts: &[(ExprId, &str)]) -> ExprId {
        let head = self.name(head);
        let parts: Vec<InterpPart> = parts
            .iter()
            .map(|(expr, text)| InterpPart {
                expr: *expr,
                text_after: self.interner.intern(text),
            })
            .collect();
        let parts = self.ast.push_parts(&parts);
        self.ast.push_expr(ExprKind::Interp { head, parts }, Span::DUMMY)
    }

    pub fn member(&mut self, receiver: ExprId, member: &str) -> ExprId {
        let member = self.name(member);
        self.ast
            .push_expr(ExprKind::Member { receiver, member }, Span::DUMMY)
    }

    pub fn index(&mut self, receiver: ExprId, index: ExprId) -> ExprId {
        self.ast
            .push_expr(ExprKind::Index { receiver, index }, Span::DUMMY)
    }

    pub fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.ast.push_expr_list(args);
        self.ast.push_expr(ExprKind::Call { callee, args }, Span::DUMMY)
    }

    /// Call a free function by name.
    pub fn call_named(&mut self, name: &str, args: &[ExprId]) -> ExprId {
        let callee = self.ident(name);
        self.call(callee, args)
    }

    /// Call a method on a receiver.
    pub fn call_method(&mut self, receiver: ExprId, method: &str, args: &[ExprId]) -> ExprId {
        let callee = self.member(receiver, method);
        self.call(callee, args)
    }

    pub fn lambda(&mut self, params: &[&str], body: StmtId) -> ExprId {
        let params = self.param_range(params);
        self.ast.push_expr(ExprKind::Lambda { params, body }, Span::DUMMY)
    }

    pub fn array(&mut self, elements: &[ExprId]) -> ExprId {
        let range = self.ast.push_expr_list(elements);
        self.ast.push_expr(ExprKind::Array(range), Span::DUMMY)
    }

    pub fn map(&mut self, entries: &[(&str, ExprId)]) -> ExprId {
        let entries: Vec<MapEntry> = entries
            .iter()
            .map(|(k, v)| MapEntry {
                key: self.interner.intern(k),
                value: *v,
            })
            .collect();
        let range = self.ast.push_map_entries(&entries);
        self.ast.push_expr(ExprKind::MapLit(range), Span::DUMMY)
    }

    pub fn table(&mut self, columns: &[&str], rows: &[ExprId]) -> ExprId {
        let columns: Vec<Name> = columns.iter().map(|c| self.interner.intern(c)).collect();
        let columns = self.ast.push_names(&columns);
        let rows = self.ast.push_expr_list(rows);
        self.ast
            .push_expr(ExprKind::TableLit { columns, rows }, Span::DUMMY)
    }

    pub fn new_object(&mut self, type_name: &str, args: &[ExprId]) -> ExprId {
        let type_name = self.name(type_name);
        let args = self.ast.push_expr_list(args);
        self.ast
            .push_expr(ExprKind::New { type_name, args }, Span::DUMMY)
    }

    // Statements

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.ast.push_stmt(StmtKind::Expr(expr), Span::DUMMY)
    }

    pub fn block(&mut self, stmts: &[StmtId]) -> StmtId {
        let range = self.ast.push_stmt_list(stmts);
        self.ast.push_stmt(StmtKind::Block(range), Span::DUMMY)
    }

    pub fn if_stmt(&mut self, cond: ExprId, then_block: StmtId, else_block: Option<StmtId>) -> StmtId {
        self.ast.push_stmt(
            StmtKind::If {
                cond,
                then_block,
                else_block: else_block.unwrap_or(StmtId::INVALID),
            },
            Span::DUMMY,
        )
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: StmtId) -> StmtId {
        self.ast.push_stmt(StmtKind::While { cond, body }, Span::DUMMY)
    }

    pub fn for_stmt(
        &mut self,
        init: Option<ExprId>,
        cond: ExprId,
        step: Option<ExprId>,
        body: StmtId,
    ) -> StmtId {
        self.ast.push_stmt(
            StmtKind::For {
                init: init.unwrap_or(ExprId::INVALID),
                cond,
                step: step.unwrap_or(ExprId::INVALID),
                body,
            },
            Span::DUMMY,
        )
    }

    pub fn for_each(&mut self, binding: &str, iter: ExprId, body: StmtId) -> StmtId {
        let binding = self.name(binding);
        self.ast
            .push_stmt(StmtKind::ForEach { binding, iter, body }, Span::DUMMY)
    }

    pub fn func_decl(&mut self, name: &str, params: &[&str], body: StmtId) -> StmtId {
        let name = self.name(name);
        let params = self.param_range(params);
        self.ast
            .push_stmt(StmtKind::FuncDecl { name, params, body }, Span::DUMMY)
    }

    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        self.ast.push_stmt(
            StmtKind::Return(value.unwrap_or(ExprId::INVALID)),
            Span::DUMMY,
        )
    }

    pub fn break_stmt(&mut self) -> StmtId {
        self.ast.push_stmt(StmtKind::Break, Span::DUMMY)
    }

    pub fn continue_stmt(&mut self) -> StmtId {
        self.ast.push_stmt(StmtKind::Continue, Span::DUMMY)
    }

    pub fn try_catch(&mut self, body: StmtId, catch_name: &str, handler: StmtId) -> StmtId {
        let catch_name = self.name(catch_name);
        self.ast.push_stmt(
            StmtKind::TryCatch {
                body,
                catch_name,
                handler,
            },
            Span::DUMMY,
        )
    }

    pub fn fail_stmt(&mut self, message: Option<ExprId>) -> StmtId {
        self.ast.push_stmt(
            StmtKind::Fail(message.unwrap_or(ExprId::INVALID)),
            Span::DUMMY,
        )
    }

    fn param_range(&mut self, params: &[&str]) -> ParamRange {
        let params: Vec<Param> = params
            .iter()
            .map(|p| Param {
                name: self.interner.intern(p),
            })
            .collect();
        self.ast.push_params(&params)
    }
}
