//! Operator enums shared between the parser and the evaluator.

use std::fmt;

/// Binary arithmetic operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Source-level symbol for error messages.
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Source-level symbol for error messages.
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }

    /// Apply this comparison to an already-computed ordering.
    pub fn apply(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            CompareOp::Eq => ord == Equal,
            CompareOp::NotEq => ord != Equal,
            CompareOp::Lt => ord == Less,
            CompareOp::LtEq => matches!(ord, Less | Equal),
            CompareOp::Gt => ord == Greater,
            CompareOp::GtEq => matches!(ord, Greater | Equal),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Short-circuit logical operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
}

/// Unary operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Logical not: `!x`
    Not,
    /// Arithmetic negation: `-x`
    Neg,
}

/// Increment / compound-assignment operator.
///
/// `Inc`/`Dec` carry an implicit step of 1; the assign forms carry an
/// explicit operand expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IncrementOp {
    /// `x++`
    Inc,
    /// `x--`
    Dec,
    /// `x += e`
    AddAssign,
    /// `x -= e`
    SubAssign,
    /// `x *= e`
    MulAssign,
    /// `x /= e`
    DivAssign,
}

impl IncrementOp {
    /// Source-level symbol for error messages.
    pub const fn symbol(self) -> &'static str {
        match self {
            IncrementOp::Inc => "++",
            IncrementOp::Dec => "--",
            IncrementOp::AddAssign => "+=",
            IncrementOp::SubAssign => "-=",
            IncrementOp::MulAssign => "*=",
            IncrementOp::DivAssign => "/=",
        }
    }
}

impl fmt::Display for IncrementOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
