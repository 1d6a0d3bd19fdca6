//! Weighted CNF formula model.
//!
//! A [`Formula`] is a conjunction of [`Clause`]s over variables `1..=n_vars`,
//! each variable carrying a non-negative weight. Formulas are immutable once
//! built; solvers only ever borrow them.

use crate::assignment::Assignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use weightsat_base::{Error, Literal, Result, VarId, Weight};

/// Largest score any assignment may reach, `2^53`.
///
/// Scores are `(total_weight + 1) * satisfied_clauses + true_weight`, so
/// [`Formula::score_bound`] must not exceed this for every score to be exact
/// in `u64` and in `f64`.
pub const MAX_SCORE: u64 = 1 << 53;

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a clause, dropping repeated copies of the same literal.
    ///
    /// The first occurrence keeps its position. A variable appearing with both
    /// polarities is kept as is.
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let mut kept: Vec<Literal> = Vec::new();
        for lit in literals {
            if !kept.contains(&lit) {
                kept.push(lit);
            }
        }
        Self { literals: kept }
    }

    /// Creates a clause from DIMACS literals, skipping zeros.
    pub fn from_dimacs(literals: &[i64]) -> Self {
        Self::new(literals.iter().filter_map(|&l| Literal::from_dimacs(l)))
    }

    /// Literals in the clause.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals.
    pub fn size(&self) -> usize {
        self.literals.len()
    }

    /// Whether some literal is true under `assignment`.
    ///
    /// # Panics
    ///
    /// Panics if `assignment` does not cover every variable of the clause.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|lit| lit.is_true_under(assignment.value(lit.var)))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

/// A CNF formula with weighted variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    n_vars: usize,
    /// Indexed by variable; slot 0 is unused and always zero.
    weights: Vec<Weight>,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula, checking that `weights` has one entry per variable
    /// and that every literal refers to a variable in `1..=n_vars`.
    ///
    /// `weights[i]` is the weight of variable `i + 1`.
    pub fn new(n_vars: usize, weights: Vec<Weight>, clauses: Vec<Clause>) -> Result<Self> {
        if weights.len() != n_vars {
            return Err(Error::InvalidFormula(format!(
                "expected {n_vars} weights, got {}",
                weights.len()
            )));
        }
        for (idx, clause) in clauses.iter().enumerate() {
            if let Some(lit) = clause
                .literals()
                .iter()
                .find(|lit| lit.var == 0 || lit.var > n_vars)
            {
                return Err(Error::InvalidFormula(format!(
                    "clause {idx} references variable {} outside 1..={n_vars}",
                    lit.var
                )));
            }
        }
        if Self::score_bound(&weights, clauses.len()).is_none() {
            return Err(Error::InvalidFormula(format!(
                "weights sum to more than the supported maximum score of {MAX_SCORE}"
            )));
        }
        Ok(Self::from_parts(n_vars, weights, clauses))
    }

    /// `(total_weight + 1) * (num_clauses + 1)`, an upper bound on every
    /// score, or `None` if it overflows or exceeds [`MAX_SCORE`].
    pub fn score_bound(weights: &[Weight], num_clauses: usize) -> Option<u64> {
        let total = weights
            .iter()
            .try_fold(0u64, |sum, &w| sum.checked_add(w))?;
        let clauses = u64::try_from(num_clauses).ok()?.checked_add(1)?;
        total
            .checked_add(1)?
            .checked_mul(clauses)
            .filter(|&bound| bound <= MAX_SCORE)
    }

    /// Assembles an already validated formula.
    pub(crate) fn from_parts(n_vars: usize, weights: Vec<Weight>, clauses: Vec<Clause>) -> Self {
        let mut indexed = Vec::with_capacity(n_vars + 1);
        indexed.push(0);
        indexed.extend(weights);
        Self {
            n_vars,
            weights: indexed,
            clauses,
        }
    }

    /// Number of declared variables.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// All variable identifiers, `1..=n_vars`.
    pub fn variables(&self) -> RangeInclusive<VarId> {
        1..=self.n_vars
    }

    /// Weight of `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var > n_vars`.
    pub fn weight(&self, var: VarId) -> Weight {
        self.weights[var]
    }

    /// Weights indexed by variable; index 0 is zero.
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Sum of all variable weights. Never overflows: construction rejects
    /// weights whose [`score_bound`](Self::score_bound) is out of range.
    pub fn total_weight(&self) -> Weight {
        self.weights.iter().sum()
    }

    /// Clauses in input order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Number of clauses satisfied by `assignment`.
    ///
    /// # Panics
    ///
    /// Panics if `assignment` covers fewer than `n_vars` variables.
    pub fn count_satisfied(&self, assignment: &Assignment) -> usize {
        debug_assert!(assignment.len() >= self.n_vars, "assignment too short");
        self.clauses
            .iter()
            .filter(|c| c.is_satisfied_by(assignment))
            .count()
    }

    /// Whether `assignment` satisfies every clause.
    ///
    /// # Panics
    ///
    /// Panics if `assignment` covers fewer than `n_vars` variables.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        debug_assert!(assignment.len() >= self.n_vars, "assignment too short");
        self.clauses.iter().all(|c| c.is_satisfied_by(assignment))
    }

    /// Sum of weights of the variables `assignment` sets true.
    ///
    /// # Panics
    ///
    /// Panics if `assignment` covers fewer than `n_vars` variables.
    pub fn weight_of(&self, assignment: &Assignment) -> Weight {
        debug_assert!(assignment.len() >= self.n_vars, "assignment too short");
        self.variables()
            .filter(|&v| assignment.value(v))
            .map(|v| self.weights[v])
            .sum()
    }

    /// Serializes to weighted DIMACS.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("p cnf {} {}\n", self.n_vars, self.clauses.len()));
        out.push('w');
        for w in &self.weights[1..] {
            out.push_str(&format!(" {w}"));
        }
        out.push_str(" 0\n");
        for clause in &self.clauses {
            for lit in clause.literals() {
                out.push_str(&format!("{} ", lit.to_dimacs()));
            }
            out.push_str("0\n");
        }
        out
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Formula {
        Formula::new(
            3,
            vec![5, 1, 10],
            vec![
                Clause::from_dimacs(&[1, 2]),
                Clause::from_dimacs(&[-1, 3]),
                Clause::from_dimacs(&[-2, -3]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_weights_beyond_max_score() {
        let err = Formula::new(2, vec![u64::MAX, 1], vec![Clause::from_dimacs(&[1, 2])]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormula(_)));

        // (2^52 - 1 + 1) * (1 + 1) = 2^53 is still exact.
        let edge = Formula::new(1, vec![(1 << 52) - 1], vec![Clause::from_dimacs(&[1])]).unwrap();
        assert_eq!(Formula::score_bound(edge.weights(), edge.num_clauses()), Some(MAX_SCORE));
        assert!(Formula::new(1, vec![1 << 52], vec![Clause::from_dimacs(&[1])]).is_err());
    }

    #[test]
    #[should_panic]
    fn test_short_assignment_panics() {
        let f = example();
        f.weight_of(&Assignment::from_values(vec![true]));
    }

    #[test]
    fn test_weights_are_one_based() {
        let f = example();
        assert_eq!(f.weight(1), 5);
        assert_eq!(f.weight(3), 10);
        assert_eq!(f.weights()[0], 0);
        assert_eq!(f.total_weight(), 16);
    }

    #[test]
    fn test_clause_dedup_keeps_tautology() {
        let c = Clause::from_dimacs(&[2, 2, -2, 3]);
        assert_eq!(c.size(), 3);
        assert_eq!(c.literals()[1], Literal::neg(2));
    }

    #[test]
    fn test_evaluate_assignment() {
        let f = example();
        let a = Assignment::from_values(vec![true, false, true]);
        assert!(f.is_satisfied_by(&a));
        assert_eq!(f.weight_of(&a), 15);

        let b = Assignment::from_values(vec![true, true, true]);
        assert!(!f.is_satisfied_by(&b));
        assert_eq!(f.count_satisfied(&b), 2);
    }

    #[test]
    fn test_rejects_out_of_range_variable() {
        let err = Formula::new(2, vec![1, 1], vec![Clause::from_dimacs(&[1, 3])]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormula(_)));
    }

    #[test]
    fn test_rejects_wrong_weight_count() {
        assert!(Formula::new(2, vec![1], vec![]).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(example().to_string(), "(x1 ∨ x2) ∧ (¬x1 ∨ x3) ∧ (¬x2 ∨ ¬x3)");
    }
}
