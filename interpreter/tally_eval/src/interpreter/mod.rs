//! Tree-walking evaluator.
//!
//! # Architecture
//!
//! One [`Interpreter`] walks a shared, immutable AST arena against one
//! mutable [`EvalContext`]. Control flow is a [`Flow`] signal threaded
//! through the statement results rather than an exception or a flag on
//! the AST node, so the same parsed script can be evaluated concurrently
//! by independent contexts.
//!
//! Loops charge the limiter after every body statement; scope pushes
//! charge the depth budget; string building charges the length budget.
//! The two fatal error kinds (limit trips and explicit `fail`) pass
//! through `try/catch` untouched.

mod assign;
mod call;

use tally_ir::{Ast, ExprId, ExprKind, LogicalOp, Name, Span, StmtId, StmtKind, UnaryOp};
use tally_core::errors::{
    missing_member, no_enclosing_function, no_enclosing_loop, no_such_property, not_iterable,
    null_access, script_failure, undefined_variable, unknown_type, wrong_arg_type, EvalError,
};
use tally_core::{EvalResult, FunctionValue, TableValue, Value};

use crate::context::EvalContext;
use crate::methods::HostCtx;
use crate::operators::{access_index, evaluate_binary, evaluate_compare};
use crate::stack::ensure_sufficient_stack;
use crate::unary::{is_true, logical_not, negate};

/// Result of executing one statement.
///
/// `Break`, `Continue`, and `Return` travel up the call stack until the
/// construct that consumes them; reaching the top level without one is a
/// control-flow error.
#[derive(Debug)]
pub enum Flow {
    Normal(Value),
    Break,
    Continue,
    Return(Value),
}

/// How one loop-body pass ended.
enum BodyExit {
    Finished,
    Break,
    Return(Value),
}

/// The AST visitor.
pub struct Interpreter<'a> {
    ast: &'a Ast,
    ctx: &'a mut EvalContext,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a Ast, ctx: &'a mut EvalContext) -> Self {
        Interpreter { ast, ctx }
    }

    /// Execute a top-level statement list, returning the last statement's
    /// value.
    #[tracing::instrument(skip_all, fields(statements = program.len()))]
    pub fn run(&mut self, program: &[StmtId]) -> EvalResult {
        let mut last = Value::Null;
        for &stmt in program {
            match self.exec_stmt(stmt)? {
                Flow::Normal(value) => last = value,
                Flow::Break => return Err(no_enclosing_loop("break")),
                Flow::Continue => return Err(no_enclosing_loop("continue")),
                Flow::Return(_) => return Err(no_enclosing_function()),
            }
        }
        Ok(last)
    }

    /// Evaluate one expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let ast = self.ast;
        let span = ast.expr_span(id);
        match ast.expr_kind(id) {
            ExprKind::Number(n) => Ok(Value::Number(n)),
            ExprKind::Str(name) => Ok(Value::string(self.ctx.interner.lookup(name))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Ident(name) => self.ctx.env.get(name).ok_or_else(|| {
                undefined_variable(self.ctx.interner.lookup(name)).with_span(span)
            }),
            ExprKind::Interp { head, parts } => {
                let mut out = self.ctx.interner.lookup(head).to_owned();
                for &part in ast.parts(parts) {
                    let value = self.eval(part.expr)?;
                    out.push_str(&value.render());
                    out.push_str(self.ctx.interner.lookup(part.text_after));
                    self.ctx
                        .limiter
                        .check_string_length(out.len())
                        .map_err(|e| e.with_span(span))?;
                }
                Ok(Value::string(out))
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                evaluate_binary(op, &lhs, &rhs, &self.ctx.units, &self.ctx.limiter)
                    .map_err(|e| e.with_span(span))
            }
            ExprKind::Compare { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                evaluate_compare(op, &lhs, &rhs)
                    .map(Value::Bool)
                    .map_err(|e| e.with_span(span))
            }
            ExprKind::Logical { op, left, right } => {
                let lhs = self.eval(left)?;
                match op {
                    LogicalOp::And => {
                        if is_true(&lhs) {
                            let rhs = self.eval(right)?;
                            Ok(Value::Bool(is_true(&rhs)))
                        } else {
                            Ok(Value::Bool(false))
                        }
                    }
                    LogicalOp::Or => {
                        if is_true(&lhs) {
                            Ok(Value::Bool(true))
                        } else {
                            let rhs = self.eval(right)?;
                            Ok(Value::Bool(is_true(&rhs)))
                        }
                    }
                }
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Not => Ok(logical_not(&value)),
                    UnaryOp::Neg => negate(&value).map_err(|e| e.with_span(span)),
                }
            }
            ExprKind::Increment {
                op,
                target,
                operand,
            } => self.eval_increment(op, target, operand, span),
            ExprKind::Assign { target, value } => self.eval_assign(target, value, span),
            ExprKind::Member { receiver, member } => self.eval_member(receiver, member, span),
            ExprKind::Index { receiver, index } => {
                let target = self.eval(receiver)?;
                let idx = self.eval(index)?;
                access_index(&target, &idx).map_err(|e| e.with_span(span))
            }
            ExprKind::Call { callee, args } => self.eval_call(callee, args, span),
            ExprKind::Lambda { params, body } => Ok(Value::function(FunctionValue::User {
                name: Name::EMPTY,
                params,
                body,
            })),
            ExprKind::Array(range) => {
                let mut elements = Vec::with_capacity(range.len());
                for &element in ast.expr_list(range) {
                    elements.push(self.eval(element)?);
                }
                Ok(Value::array(elements))
            }
            ExprKind::MapLit(range) => {
                let mut entries = rustc_hash::FxHashMap::default();
                for &entry in ast.map_entries(range) {
                    let key = self.ctx.interner.lookup(entry.key).to_owned();
                    let value = self.eval(entry.value)?;
                    entries.insert(key, value);
                }
                Ok(Value::map(entries))
            }
            ExprKind::TableLit { columns, rows } => {
                let column_names: Vec<String> = ast
                    .names(columns)
                    .iter()
                    .map(|&name| self.ctx.interner.lookup(name).to_owned())
                    .collect();
                let mut table = TableValue::new(column_names);
                for &row in ast.expr_list(rows) {
                    match self.eval(row)? {
                        Value::Array(cells) => table.add_row(cells.borrow().clone()),
                        _ => return Err(wrong_arg_type("table row", "array").with_span(span)),
                    }
                }
                Ok(Value::table(table))
            }
            ExprKind::New { type_name, args } => {
                let name = self.ctx.interner.lookup(type_name);
                if !self.ctx.methods.is_constructible(name) {
                    return Err(unknown_type(name).with_span(span));
                }
                let mut actuals = Vec::with_capacity(args.len());
                for &arg in ast.expr_list(args) {
                    actuals.push(self.eval(arg)?);
                }
                let methods = self.ctx.methods.clone();
                let hctx = self.host_ctx();
                methods
                    .construct(&hctx, name, &actuals)
                    .map_err(|e| e.with_span(span))
            }
        }
    }

    /// Member read: registry property first, then raw map entries and
    /// object fields.
    fn eval_member(&mut self, receiver: ExprId, member: Name, span: Span) -> EvalResult {
        let recv = self.eval(receiver)?;
        if matches!(recv, Value::Null) {
            return Err(null_access().with_span(span));
        }
        let tag = recv.type_tag();
        if self.ctx.methods.has_property(tag, member) {
            let methods = self.ctx.methods.clone();
            let hctx = self.host_ctx();
            return methods
                .get_property(&hctx, &recv, member)
                .map_err(|e| e.with_span(span));
        }
        let member_str = self.ctx.interner.lookup(member);
        match &recv {
            // A map member read is a key lookup; absent keys read as Null
            // so assignment through the same path can create them.
            Value::Map(map) => Ok(map.borrow().get(member_str).cloned().unwrap_or(Value::Null)),
            Value::Object(obj) => obj
                .borrow()
                .get_field(member_str)
                .cloned()
                .ok_or_else(|| missing_member(member_str, recv.type_name()).with_span(span)),
            _ => {
                if self.ctx.methods.has_method(tag, member) {
                    // A method slot read without parentheses.
                    Err(no_such_property(member_str, recv.type_name()).with_span(span))
                } else {
                    Err(missing_member(member_str, recv.type_name()).with_span(span))
                }
            }
        }
    }

    fn exec_stmt(&mut self, id: StmtId) -> Result<Flow, EvalError> {
        let ast = self.ast;
        let span = ast.stmt_span(id);
        match ast.stmt_kind(id) {
            StmtKind::Expr(expr) => Ok(Flow::Normal(self.eval(expr)?)),
            StmtKind::Block(range) => {
                self.push_scope(span)?;
                let result = self.exec_block(range);
                self.ctx.env.pop_scope();
                result
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                let condition = self.eval(cond)?;
                if is_true(&condition) {
                    self.exec_stmt(then_block)
                } else if else_block.is_valid() {
                    self.exec_stmt(else_block)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            }
            StmtKind::While { cond, body } => {
                loop {
                    let condition = self.eval(cond)?;
                    if !is_true(&condition) {
                        break;
                    }
                    match self.run_loop_body(body, None, span)? {
                        BodyExit::Finished => {}
                        BodyExit::Break => break,
                        BodyExit::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Normal(Value::Null))
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                if init.is_valid() {
                    self.eval(init)?;
                }
                loop {
                    if cond.is_valid() {
                        let condition = self.eval(cond)?;
                        if !is_true(&condition) {
                            break;
                        }
                    }
                    match self.run_loop_body(body, None, span)? {
                        // The step runs after a completed pass, including
                        // one cut short by `continue`.
                        BodyExit::Finished => {
                            if step.is_valid() {
                                self.eval(step)?;
                            }
                        }
                        BodyExit::Break => break,
                        BodyExit::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Normal(Value::Null))
            }
            StmtKind::ForEach {
                binding,
                iter,
                body,
            } => {
                let iterable = self.eval(iter)?;
                let items = iteration_items(&iterable)
                    .ok_or_else(|| not_iterable(iterable.type_name()).with_span(span))?;
                for item in items {
                    match self.run_loop_body(body, Some((binding, item)), span)? {
                        BodyExit::Finished => {}
                        BodyExit::Break => break,
                        BodyExit::Return(value) => return Ok(Flow::Return(value)),
                    }
                }
                Ok(Flow::Normal(Value::Null))
            }
            StmtKind::FuncDecl { name, params, body } => {
                let func = Value::function(FunctionValue::User { name, params, body });
                self.ctx.env.define(name, func);
                self.ctx.env.mark_function(name);
                Ok(Flow::Normal(Value::Null))
            }
            StmtKind::Return(expr) => {
                let value = if expr.is_valid() {
                    self.eval(expr)?
                } else {
                    Value::Null
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::TryCatch {
                body,
                catch_name,
                handler,
            } => match self.exec_stmt(body) {
                Ok(flow) => Ok(flow),
                // Limit trips and explicit failures are never caught.
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => {
                    self.ctx.limiter.check_exceptions()?;
                    let error_value =
                        err.to_value(&self.ctx.source, self.ctx.call_stack.render());
                    self.push_scope(span)?;
                    self.ctx.env.define(catch_name, error_value);
                    let result = self.exec_stmt(handler);
                    // The catch scope is torn down even when the handler
                    // itself throws.
                    self.ctx.env.pop_scope();
                    result
                }
            },
            StmtKind::Fail(expr) => {
                let message = if expr.is_valid() {
                    self.eval(expr)?.render()
                } else {
                    "script failure".to_owned()
                };
                Err(script_failure(&message).with_span(span))
            }
        }
    }

    fn exec_block(&mut self, range: tally_ir::StmtRange) -> Result<Flow, EvalError> {
        let ast = self.ast;
        for &stmt in ast.stmt_list(range) {
            match self.exec_stmt(stmt)? {
                Flow::Normal(_) => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal(Value::Null))
    }

    /// Run one pass of a loop body in its own scope, charging the loop
    /// budget after every body statement.
    fn run_loop_body(
        &mut self,
        body: StmtId,
        binding: Option<(Name, Value)>,
        span: Span,
    ) -> Result<BodyExit, EvalError> {
        self.push_scope(span)?;
        let result = self.run_loop_body_inner(body, binding);
        self.ctx.env.pop_scope();
        result
    }

    fn run_loop_body_inner(
        &mut self,
        body: StmtId,
        binding: Option<(Name, Value)>,
    ) -> Result<BodyExit, EvalError> {
        if let Some((name, value)) = binding {
            self.ctx.env.define(name, value);
        }
        let ast = self.ast;
        match ast.stmt_kind(body) {
            StmtKind::Block(range) => {
                for &stmt in ast.stmt_list(range) {
                    let flow = self.exec_stmt(stmt)?;
                    self.ctx.limiter.check_loop()?;
                    match flow {
                        Flow::Normal(_) => {}
                        Flow::Break => return Ok(BodyExit::Break),
                        // Skip the rest of this pass; the loop re-tests
                        // its condition.
                        Flow::Continue => return Ok(BodyExit::Finished),
                        Flow::Return(value) => return Ok(BodyExit::Return(value)),
                    }
                }
                Ok(BodyExit::Finished)
            }
            _ => {
                let flow = self.exec_stmt(body)?;
                self.ctx.limiter.check_loop()?;
                Ok(match flow {
                    Flow::Break => BodyExit::Break,
                    Flow::Return(value) => BodyExit::Return(value),
                    Flow::Normal(_) | Flow::Continue => BodyExit::Finished,
                })
            }
        }
    }

    fn push_scope(&mut self, span: Span) -> Result<(), EvalError> {
        self.ctx
            .limiter
            .check_scope_count(self.ctx.env.depth() + 1)
            .map_err(|e| e.with_span(span))?;
        self.ctx.env.push_scope();
        Ok(())
    }

    fn host_ctx(&self) -> HostCtx<'_> {
        HostCtx {
            units: &*self.ctx.units,
            limiter: &self.ctx.limiter,
            interner: &*self.ctx.interner,
        }
    }
}

/// Snapshot the items a `for-each` drives: array elements, map keys
/// (sorted for determinism over the unordered storage), or table rows.
fn iteration_items(iterable: &Value) -> Option<Vec<Value>> {
    match iterable {
        Value::Array(items) => Some(items.borrow().clone()),
        Value::Map(map) => {
            let map = map.borrow();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            Some(keys.into_iter().cloned().map(Value::string).collect())
        }
        Value::Table(table) => {
            let table = table.borrow();
            Some(
                (0..table.row_count())
                    .map(|i| {
                        Value::array(table.row(i).map(<[Value]>::to_vec).unwrap_or_default())
                    })
                    .collect(),
            )
        }
        _ => None,
    }
}
