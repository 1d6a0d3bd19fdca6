//! Solver results.

use serde::Serialize;
use weightsat_base::Weight;
use weightsat_format::{Assignment, Formula};

/// An assignment together with how well it does on its formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Sum of weights of the variables set true.
    pub weight: Weight,
    /// Clauses the assignment satisfies.
    pub satisfied_clauses: usize,
    /// Clauses in the formula.
    pub num_clauses: usize,
    /// The assignment itself.
    pub assignment: Assignment,
}

impl Solution {
    /// Evaluates `assignment` against `formula` from scratch.
    pub fn evaluate(formula: &Formula, assignment: Assignment) -> Self {
        Self {
            weight: formula.weight_of(&assignment),
            satisfied_clauses: formula.count_satisfied(&assignment),
            num_clauses: formula.num_clauses(),
            assignment,
        }
    }

    /// Whether every clause is satisfied.
    pub fn is_satisfying(&self) -> bool {
        self.satisfied_clauses == self.num_clauses
    }
}
