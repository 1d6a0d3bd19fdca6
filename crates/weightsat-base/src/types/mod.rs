//! Identifier and literal types.
//!
//! Variables are numbered from 1 as in DIMACS. Clauses are numbered from 0 in
//! the order they appear in the formula.

mod literal;

pub use literal::Literal;

/// Identifier of a boolean variable, in `1..=n_vars`.
pub type VarId = usize;

/// Index of a clause within its formula.
pub type ClauseId = usize;

/// Non-negative weight carried by a variable.
pub type Weight = u64;
