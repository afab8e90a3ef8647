//! Host-configurable resource governor.
//!
//! Governance is cooperative: the evaluator consults the limiter after
//! every loop-body statement, before every string mutation, and before
//! every scope push. A trip raises `LimitExceeded`, which script-level
//! try/catch never swallows.

use std::cell::Cell;

use crate::errors::{
    exception_limit_exceeded, loop_limit_exceeded, scope_limit_exceeded,
    scope_string_limit_exceeded, string_limit_exceeded, EvalError,
};

/// Configured budgets.
#[derive(Copy, Clone, Debug)]
pub struct Limits {
    /// Total loop-body statements across the whole evaluation.
    pub max_loop_statements: u64,
    /// Longest string a script may build, in bytes.
    pub max_string_length: usize,
    /// Deepest scope stack (blocks, calls, catch bodies).
    pub max_scope_depth: usize,
    /// Total bytes of string values bound into scope slots.
    pub max_scope_string_length: usize,
    /// Most exceptions a script may catch before being stopped.
    pub max_caught_exceptions: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_loop_statements: 1_000_000,
            max_string_length: 1_000_000,
            max_scope_depth: 256,
            max_scope_string_length: 10_000_000,
            max_caught_exceptions: 10_000,
        }
    }
}

/// Runtime counters over a [`Limits`] configuration.
///
/// Interior mutability lets the evaluator consult the limiter through a
/// shared context reference.
#[derive(Debug)]
pub struct Limiter {
    limits: Limits,
    loop_statements: Cell<u64>,
    scope_string_bytes: Cell<usize>,
    caught_exceptions: Cell<u32>,
}

impl Limiter {
    /// Create a limiter over the given budgets.
    pub fn new(limits: Limits) -> Self {
        Limiter {
            limits,
            loop_statements: Cell::new(0),
            scope_string_bytes: Cell::new(0),
            caught_exceptions: Cell::new(0),
        }
    }

    /// Charge one loop-body statement against the budget.
    pub fn check_loop(&self) -> Result<(), EvalError> {
        let used = self.loop_statements.get() + 1;
        self.loop_statements.set(used);
        if used > self.limits.max_loop_statements {
            return Err(loop_limit_exceeded(self.limits.max_loop_statements));
        }
        Ok(())
    }

    /// Check a string the script is about to build or store.
    pub fn check_string_length(&self, len: usize) -> Result<(), EvalError> {
        if len > self.limits.max_string_length {
            return Err(string_limit_exceeded(len, self.limits.max_string_length));
        }
        Ok(())
    }

    /// Charge the bytes of a string being bound into a scope slot.
    ///
    /// Unlike [`Self::check_string_length`], which bounds any single
    /// string, this is an aggregate: every bind adds to a running total
    /// for the whole evaluation.
    pub fn check_scope_string_length(&self, len: usize) -> Result<(), EvalError> {
        let used = self.scope_string_bytes.get().saturating_add(len);
        self.scope_string_bytes.set(used);
        if used > self.limits.max_scope_string_length {
            return Err(scope_string_limit_exceeded(
                self.limits.max_scope_string_length,
            ));
        }
        Ok(())
    }

    /// Check the scope depth the evaluator is about to reach.
    pub fn check_scope_count(&self, depth: usize) -> Result<(), EvalError> {
        if depth > self.limits.max_scope_depth {
            return Err(scope_limit_exceeded(self.limits.max_scope_depth));
        }
        Ok(())
    }

    /// Charge one caught exception against the budget.
    pub fn check_exceptions(&self) -> Result<(), EvalError> {
        let used = self.caught_exceptions.get() + 1;
        self.caught_exceptions.set(used);
        if used > self.limits.max_caught_exceptions {
            return Err(exception_limit_exceeded(self.limits.max_caught_exceptions));
        }
        Ok(())
    }

    /// Reset counters between top-level evaluations of the same context.
    pub fn reset(&self) {
        self.loop_statements.set(0);
        self.scope_string_bytes.set(0);
        self.caught_exceptions.set(0);
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Limiter::new(Limits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn loop_budget_trips_fatally() {
        let limiter = Limiter::new(Limits {
            max_loop_statements: 2,
            ..Limits::default()
        });
        assert!(limiter.check_loop().is_ok());
        assert!(limiter.check_loop().is_ok());
        let err = limiter.check_loop().unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
        assert!(err.is_fatal());
    }

    #[test]
    fn string_budget() {
        let limiter = Limiter::new(Limits {
            max_string_length: 4,
            ..Limits::default()
        });
        assert!(limiter.check_string_length(4).is_ok());
        assert!(limiter.check_string_length(5).is_err());
    }

    #[test]
    fn scope_string_budget_accumulates() {
        let limiter = Limiter::new(Limits {
            max_scope_string_length: 10,
            ..Limits::default()
        });
        assert!(limiter.check_scope_string_length(4).is_ok());
        assert!(limiter.check_scope_string_length(4).is_ok());
        let err = limiter.check_scope_string_length(4).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
        limiter.reset();
        assert!(limiter.check_scope_string_length(4).is_ok());
    }

    #[test]
    fn reset_clears_counters() {
        let limiter = Limiter::new(Limits {
            max_loop_statements: 1,
            ..Limits::default()
        });
        assert!(limiter.check_loop().is_ok());
        assert!(limiter.check_loop().is_err());
        limiter.reset();
        assert!(limiter.check_loop().is_ok());
    }
}
