//! Environment for variable scoping in the interpreter.
//!
//! Uses a scope stack (not cloning) for efficient scope management. On
//! top of the bindings, the environment keeps the function-symbol set
//! the original's symbol table provided: assignment of a function value
//! marks its name so later lookups know the name is callable.

use rustc_hash::{FxHashMap, FxHashSet};

use tally_ir::Name;
use tally_core::{Shared, Value};

/// A single scope containing variable bindings.
#[derive(Default)]
pub struct Scope {
    /// Variable bindings in this scope.
    bindings: FxHashMap<Name, Value>,
    /// Parent scope (for lexical scoping).
    parent: Option<Shared<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: Shared<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define a variable in this scope, shadowing any parent binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a variable by name, walking parents.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Rebind an existing variable. Returns `false` when no scope in the
    /// chain holds the name.
    pub fn rebind(&mut self, name: Name, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return true;
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().rebind(name, value);
        }
        false
    }

    /// Remove a binding from the nearest scope holding it.
    pub fn remove(&mut self, name: Name) -> bool {
        if self.bindings.remove(&name).is_some() {
            return true;
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().remove(name);
        }
        false
    }
}

/// Environment for the interpreter using a scope stack.
pub struct Environment {
    /// Stack of scopes, with the current scope at the top.
    scopes: Vec<Shared<Scope>>,
    /// Global scope (always at the bottom).
    global: Shared<Scope>,
    /// Names known to be bound to functions.
    function_symbols: FxHashSet<Name>,
}

impl Environment {
    /// Create a new environment with a global scope.
    pub fn new() -> Self {
        let global = Shared::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
            function_symbols: FxHashSet::default(),
        }
    }

    /// Current scope depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a new scope onto the stack.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(Shared::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope from the stack. The global scope stays.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> Shared<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    /// Define a variable in the current scope.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value);
    }

    /// Define a variable in the global scope.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global.borrow_mut().define(name, value);
    }

    /// Look up a variable.
    #[inline]
    pub fn get(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Assign to a variable: rebinds the nearest existing slot, or
    /// defines in the current scope when the name is new.
    pub fn set_value(&mut self, name: Name, value: Value) {
        let current = self.current_scope();
        if !current.borrow_mut().rebind(name, value.clone()) {
            current.borrow_mut().define(name, value);
        }
    }

    /// Returns `true` if the name resolves in any visible scope.
    pub fn contains(&self, name: Name) -> bool {
        self.get(name).is_some()
    }

    /// Remove a binding from the nearest scope holding it.
    pub fn remove(&mut self, name: Name) -> bool {
        let removed = self.current_scope().borrow_mut().remove(name);
        if removed {
            self.function_symbols.remove(&name);
        }
        removed
    }

    /// Mark a name as a function symbol.
    pub fn mark_function(&mut self, name: Name) {
        self.function_symbols.insert(name);
    }

    /// Returns `true` if the name was marked as a function symbol.
    pub fn is_function(&self, name: Name) -> bool {
        self.function_symbols.contains(&name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ir::SharedInterner;

    #[test]
    fn define_and_get() {
        let interner = SharedInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::Number(1.0));
        assert_eq!(env.get(x), Some(Value::Number(1.0)));
        assert!(env.contains(x));
    }

    #[test]
    fn inner_scopes_see_outer_bindings() {
        let interner = SharedInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::Number(1.0));
        env.push_scope();
        assert_eq!(env.get(x), Some(Value::Number(1.0)));
        env.pop_scope();
    }

    #[test]
    fn set_value_rebinds_outer_slot() {
        let interner = SharedInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::Number(1.0));
        env.push_scope();
        env.set_value(x, Value::Number(2.0));
        env.pop_scope();
        assert_eq!(env.get(x), Some(Value::Number(2.0)));
    }

    #[test]
    fn pop_discards_inner_bindings() {
        let interner = SharedInterner::new();
        let y = interner.intern("y");
        let mut env = Environment::new();
        env.push_scope();
        env.define(y, Value::Bool(true));
        env.pop_scope();
        assert_eq!(env.get(y), None);
    }

    #[test]
    fn function_symbols() {
        let interner = SharedInterner::new();
        let f = interner.intern("f");
        let mut env = Environment::new();
        assert!(!env.is_function(f));
        env.mark_function(f);
        assert!(env.is_function(f));
    }

    #[test]
    fn remove_unmarks_function() {
        let interner = SharedInterner::new();
        let f = interner.intern("f");
        let mut env = Environment::new();
        env.define(f, Value::Number(0.0));
        env.mark_function(f);
        assert!(env.remove(f));
        assert!(!env.is_function(f));
        assert!(!env.remove(f));
    }
}
