//! Call-site routing and user-function invocation.
//!
//! A call expression is resolved by the shape of its callee: a plain
//! identifier looks up a binding, a member access tries the method
//! registry first and falls back to a function stored in a map entry or
//! object field, and anything else is evaluated and must yield a
//! function value.

use smallvec::SmallVec;

use tally_ir::{ExprId, ExprKind, ExprRange, ParamRange, Span, StmtId};
use tally_core::errors::{
    no_enclosing_loop, no_such_method, not_callable, null_access, undefined_variable, EvalError,
};
use tally_core::{EvalResult, FunctionValue, Value};

use super::{Flow, Interpreter};

impl Interpreter<'_> {
    pub(super) fn eval_call(&mut self, callee: ExprId, args: ExprRange, span: Span) -> EvalResult {
        let ast = self.ast;
        match ast.expr_kind(callee) {
            ExprKind::Ident(name) => {
                let Some(value) = self.ctx.env.get(name) else {
                    return Err(
                        undefined_variable(self.ctx.interner.lookup(name)).with_span(span)
                    );
                };
                match value {
                    Value::Function(func) => {
                        let actuals = self.eval_args(args)?;
                        self.call_function(&func, self.ctx.interner.lookup(name), &actuals, span)
                    }
                    other => Err(not_callable(other.type_name()).with_span(span)),
                }
            }
            ExprKind::Member { receiver, member } => {
                let recv = self.eval(receiver)?;
                if matches!(recv, Value::Null) {
                    return Err(null_access().with_span(span));
                }
                if self.ctx.methods.has_method(recv.type_tag(), member) {
                    let actuals = self.eval_args(args)?;
                    let methods = self.ctx.methods.clone();
                    let hctx = self.host_ctx();
                    return methods
                        .invoke(&hctx, &recv, member, &actuals)
                        .map_err(|e| e.with_span(span));
                }
                let member_str = self.ctx.interner.lookup(member);
                let stored = match &recv {
                    Value::Map(map) => map.borrow().get(member_str).cloned(),
                    Value::Object(obj) => obj.borrow().get_field(member_str).cloned(),
                    _ => None,
                };
                match stored {
                    Some(Value::Function(func)) => {
                        let actuals = self.eval_args(args)?;
                        self.call_function(&func, member_str, &actuals, span)
                    }
                    Some(other) => Err(not_callable(other.type_name()).with_span(span)),
                    None => Err(no_such_method(member_str, recv.type_name()).with_span(span)),
                }
            }
            _ => {
                let value = self.eval(callee)?;
                match value {
                    Value::Function(func) => {
                        let actuals = self.eval_args(args)?;
                        self.call_function(&func, "<anonymous>", &actuals, span)
                    }
                    other => Err(not_callable(other.type_name()).with_span(span)),
                }
            }
        }
    }

    fn eval_args(&mut self, args: ExprRange) -> Result<SmallVec<[Value; 8]>, EvalError> {
        let ast = self.ast;
        let mut actuals = SmallVec::new();
        for &arg in ast.expr_list(args) {
            actuals.push(self.eval(arg)?);
        }
        Ok(actuals)
    }

    pub(super) fn call_function(
        &mut self,
        func: &FunctionValue,
        name: &str,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        match func {
            FunctionValue::Host { f, .. } => f(args),
            FunctionValue::User { params, body, .. } => {
                self.call_user(name, *params, *body, args, span)
            }
        }
    }

    #[tracing::instrument(skip_all, fields(function = name, args = args.len()))]
    fn call_user(
        &mut self,
        name: &str,
        params: ParamRange,
        body: StmtId,
        args: &[Value],
        span: Span,
    ) -> EvalResult {
        self.ctx.bump_counter();
        self.ctx
            .limiter
            .check_scope_count(self.ctx.env.depth() + 1)
            .map_err(|e| e.with_span(span))?;
        self.ctx.call_stack.push(name, span);
        self.ctx.env.push_scope();
        let result = self.run_user_body(params, body, args);
        // Unwind frame state on the error path too, so an error caught
        // further out sees a consistent stack.
        self.ctx.env.pop_scope();
        self.ctx.call_stack.pop();
        result
    }

    fn run_user_body(&mut self, params: ParamRange, body: StmtId, args: &[Value]) -> EvalResult {
        let ast = self.ast;
        let declared = ast.params(params);
        for (i, param) in declared.iter().enumerate() {
            let value = args.get(i).map_or(Value::Null, Value::clone_for_arg);
            if let Value::Str(s) = &value {
                self.ctx.limiter.check_scope_string_length(s.len())?;
            }
            self.ctx.env.define(param.name, value);
        }
        // Extra positionals land in an implicit `arguments` array unless
        // a declared parameter claims that name.
        let arguments_name = self.ctx.interner.intern("arguments");
        if !declared.iter().any(|p| p.name == arguments_name) {
            let extras: Vec<Value> = args
                .get(declared.len()..)
                .unwrap_or(&[])
                .iter()
                .map(Value::clone_for_arg)
                .collect();
            self.ctx.env.define(arguments_name, Value::array(extras));
        }
        match self.exec_stmt(body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Null),
            Flow::Break => Err(no_enclosing_loop("break")),
            Flow::Continue => Err(no_enclosing_loop("continue")),
        }
    }
}
