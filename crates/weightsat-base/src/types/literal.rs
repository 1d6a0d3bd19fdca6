//! Literals: a variable with optional negation.

use super::VarId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal is a variable with optional negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// The underlying variable (1-based).
    pub var: VarId,
    /// Whether this literal is negated.
    pub negated: bool,
}

impl Literal {
    /// Creates a positive literal.
    #[must_use]
    pub const fn pos(var: VarId) -> Self {
        Self { var, negated: false }
    }

    /// Creates a negated literal.
    #[must_use]
    pub const fn neg(var: VarId) -> Self {
        Self { var, negated: true }
    }

    /// Negates this literal.
    #[must_use]
    pub const fn negate(&self) -> Self {
        Self {
            var: self.var,
            negated: !self.negated,
        }
    }

    /// Whether the literal is true when its variable takes `value`.
    #[must_use]
    pub const fn is_true_under(&self, value: bool) -> bool {
        value != self.negated
    }

    /// Builds a literal from its DIMACS form. Returns `None` for `0`.
    #[must_use]
    pub fn from_dimacs(lit: i64) -> Option<Self> {
        if lit == 0 {
            return None;
        }
        Some(Self {
            var: lit.unsigned_abs() as VarId,
            negated: lit < 0,
        })
    }

    /// Converts to DIMACS format (positive = var, negative = -var).
    #[must_use]
    pub fn to_dimacs(&self) -> i64 {
        let base = self.var as i64;
        if self.negated { -base } else { base }
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "¬x{}", self.var)
        } else {
            write!(f, "x{}", self.var)
        }
    }
}
