//! Assignment targets and compound updates.
//!
//! The right-hand side is evaluated exactly once, then routed into the
//! target: a variable slot, a map entry or object field behind a member
//! access, or an element behind an index. Writing through a Null
//! receiver is a silent no-op, matching the read side where a missing
//! map key reads as Null.

use tally_ir::{ExprId, ExprKind, IncrementOp, Span};
use tally_core::errors::{
    cannot_index, invalid_assignment_target, invalid_compound_op, missing_member, not_a_number,
    EvalError,
};
use tally_core::{EvalResult, TypeTag, Value};

use crate::convert::convert_value;
use crate::operators::index_to_offset;
use crate::unary::{increment_number, increment_string};

use super::Interpreter;

impl Interpreter<'_> {
    pub(super) fn eval_assign(&mut self, target: ExprId, value: ExprId, span: Span) -> EvalResult {
        let rhs = if value.is_valid() {
            self.eval(value)?
        } else {
            Value::Null
        };
        self.store_into_target(target, rhs.clone(), span)?;
        Ok(rhs)
    }

    pub(super) fn store_into_target(
        &mut self,
        target: ExprId,
        value: Value,
        span: Span,
    ) -> Result<(), EvalError> {
        let ast = self.ast;
        if let Value::Str(s) = &value {
            self.ctx
                .limiter
                .check_string_length(s.len())
                .map_err(|e| e.with_span(span))?;
        }
        match ast.expr_kind(target) {
            ExprKind::Ident(name) => {
                if matches!(value, Value::Function(_)) {
                    self.ctx.env.mark_function(name);
                }
                if let Value::Str(s) = &value {
                    self.ctx
                        .limiter
                        .check_scope_string_length(s.len())
                        .map_err(|e| e.with_span(span))?;
                }
                self.ctx.env.set_value(name, value);
                Ok(())
            }
            ExprKind::Member { receiver, member } => {
                let recv = self.eval(receiver)?;
                let member_str = self.ctx.interner.lookup(member);
                match &recv {
                    Value::Null => Ok(()),
                    Value::Map(map) => {
                        map.borrow_mut().insert(member_str.to_owned(), value);
                        Ok(())
                    }
                    Value::Object(obj) => {
                        // An existing field fixes the declared type; the
                        // incoming value is converted to it.
                        let declared = obj.borrow().get_field(member_str).map(Value::type_tag);
                        let converted = match declared {
                            Some(tag) if tag != TypeTag::Null && tag != value.type_tag() => {
                                convert_value(&self.ctx.types, &value, tag)
                                    .map_err(|e| e.with_span(span))?
                            }
                            _ => value,
                        };
                        obj.borrow_mut().set_field(member_str, converted);
                        Ok(())
                    }
                    _ => {
                        if self.ctx.methods.has_property(recv.type_tag(), member) {
                            let methods = self.ctx.methods.clone();
                            let hctx = self.host_ctx();
                            methods
                                .set_property(&hctx, &recv, member, value)
                                .map(|_| ())
                                .map_err(|e| e.with_span(span))
                        } else {
                            Err(missing_member(member_str, recv.type_name()).with_span(span))
                        }
                    }
                }
            }
            ExprKind::Index { receiver, index } => {
                let recv = self.eval(receiver)?;
                let idx = self.eval(index)?;
                match &recv {
                    Value::Null => Ok(()),
                    Value::Array(items) => {
                        let Value::Number(n) = idx else {
                            return Err(not_a_number(idx.type_name()).with_span(span));
                        };
                        let mut items = items.borrow_mut();
                        let offset =
                            index_to_offset(n, items.len()).map_err(|e| e.with_span(span))?;
                        items[offset] = value;
                        Ok(())
                    }
                    Value::Table(table) => {
                        let Value::Number(n) = idx else {
                            return Err(not_a_number(idx.type_name()).with_span(span));
                        };
                        let cells = match value {
                            Value::Array(cells) => cells.borrow().clone(),
                            other => vec![other],
                        };
                        let mut table = table.borrow_mut();
                        let offset = index_to_offset(n, table.row_count())
                            .map_err(|e| e.with_span(span))?;
                        table.set_row(offset, cells);
                        Ok(())
                    }
                    // Any index value keys a map by its rendering.
                    Value::Map(map) => {
                        map.borrow_mut().insert(idx.render(), value);
                        Ok(())
                    }
                    other => {
                        Err(cannot_index(other.type_name(), idx.type_name()).with_span(span))
                    }
                }
            }
            _ => Err(invalid_assignment_target().with_span(span)),
        }
    }

    pub(super) fn eval_increment(
        &mut self,
        op: IncrementOp,
        target: ExprId,
        operand: ExprId,
        span: Span,
    ) -> EvalResult {
        let current = self.eval(target)?;
        let step = if operand.is_valid() {
            self.eval(operand)?
        } else {
            Value::Number(1.0)
        };
        let updated = match &current {
            Value::Number(n) => {
                let step = match step {
                    Value::Number(s) => s,
                    Value::Bool(b) => f64::from(u8::from(b)),
                    other => return Err(not_a_number(other.type_name()).with_span(span)),
                };
                Value::Number(increment_number(op, *n, step))
            }
            Value::Str(s) => increment_string(op, s, &step.render(), &self.ctx.limiter)
                .map_err(|e| e.with_span(span))?,
            other => {
                return Err(invalid_compound_op(op.symbol(), other.type_name()).with_span(span))
            }
        };
        self.store_into_target(target, updated.clone(), span)?;
        Ok(updated)
    }
}
