//! Mutable evaluation context.
//!
//! One `EvalContext` holds everything a single evaluation mutates (the
//! environment, the limiter counters, the call stack) plus shared handles
//! to the read-only registries. Independent evaluations of different
//! scripts may clone the registry handles but never share a context.

use std::cell::Cell;

use tally_ir::{Name, SharedInterner, Span};
use tally_core::{FunctionValue, HostFn, Limiter, Limits, TypeRegistry, UnitTable, Value};

use crate::environment::Environment;
use crate::methods::MethodRegistry;
use crate::shared::SharedRegistry;

/// One entry of the script-level call stack.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Function name as written in the script.
    pub name: String,
    /// Call-site location.
    pub span: Span,
}

/// Script-level call stack, rendered into caught error values.
#[derive(Default, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, name: impl Into<String>, span: Span) {
        self.frames.push(CallFrame {
            name: name.into(),
            span,
        });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Render the stack innermost-first, one frame per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for frame in self.frames.iter().rev() {
            out.push_str("at ");
            out.push_str(&frame.name);
            if !frame.span.is_dummy() {
                out.push_str(&format!(" ({})", frame.span));
            }
            out.push('\n');
        }
        out
    }
}

/// Everything one evaluation reads and mutates.
pub struct EvalContext {
    /// Variable bindings.
    pub env: Environment,
    /// Resource governor.
    pub limiter: Limiter,
    /// Interner shared with the parser that produced the AST.
    pub interner: SharedInterner,
    /// Unit conversion table.
    pub units: SharedRegistry<UnitTable>,
    /// Type descriptors and the conversion matrix.
    pub types: SharedRegistry<TypeRegistry>,
    /// Per-type method and property tables.
    pub methods: SharedRegistry<MethodRegistry>,
    /// Script-level call stack.
    pub call_stack: CallStack,
    /// Execution counter, bumped per user-function call; wraps at the max.
    pub counter: Cell<u32>,
    /// Script name reported in caught error values.
    pub source: String,
}

impl EvalContext {
    /// Create a context over the interner the AST was built with,
    /// using default limits and the built-in registries.
    pub fn new(interner: SharedInterner) -> Self {
        EvalContext::with_limits(interner, Limits::default())
    }

    /// Create a context with explicit resource budgets.
    pub fn with_limits(interner: SharedInterner, limits: Limits) -> Self {
        let methods = MethodRegistry::with_builtins(&interner);
        EvalContext {
            env: Environment::new(),
            limiter: Limiter::new(limits),
            units: SharedRegistry::new(UnitTable::with_builtins()),
            types: SharedRegistry::new(TypeRegistry::with_builtins()),
            methods: SharedRegistry::new(methods),
            call_stack: CallStack::new(),
            counter: Cell::new(0),
            source: String::new(),
            interner,
        }
    }

    /// Bind a host function into the global scope.
    pub fn register_host_fn(&mut self, name: &'static str, f: HostFn) {
        let symbol = self.interner.intern(name);
        self.env
            .define_global(symbol, Value::function(FunctionValue::Host { name, f }));
        self.env.mark_function(symbol);
    }

    /// Intern helper for hosts assembling names at registration time.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Bump the execution counter, wrapping at the numeric max.
    #[inline]
    pub fn bump_counter(&self) {
        self.counter.set(self.counter.get().wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_stack_renders_innermost_first() {
        let mut stack = CallStack::new();
        stack.push("outer", Span::new(1, 1));
        stack.push("inner", Span::new(5, 3));
        let rendered = stack.render();
        let first = rendered.lines().next().unwrap();
        assert_eq!(first, "at inner (5:3)");
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn host_fn_registration_marks_function() {
        let interner = SharedInterner::new();
        let mut ctx = EvalContext::new(interner.clone());
        ctx.register_host_fn("ping", |_args| Ok(Value::string("pong")));
        let name = interner.intern("ping");
        assert!(ctx.env.is_function(name));
        assert!(matches!(ctx.env.get(name), Some(Value::Function(_))));
    }

    #[test]
    fn counter_wraps() {
        let ctx = EvalContext::new(SharedInterner::new());
        ctx.counter.set(u32::MAX);
        ctx.bump_counter();
        assert_eq!(ctx.counter.get(), 0);
    }
}
