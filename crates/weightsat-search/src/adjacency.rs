//! Per-variable clause occurrence lists.

use weightsat_base::{ClauseId, VarId, Weight};
use weightsat_format::Formula;

/// For each variable, the clauses it occurs in, split by polarity.
///
/// Built once per formula and read-only afterwards; search states share it
/// through an `Arc`. A clause appears in exactly one list of every variable
/// it mentions, except a tautological clause (`x ∨ ¬x`) which appears in both
/// lists of `x`.
///
/// The index also caches clause sizes and variable weights, which is all the
/// incremental state needs from the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyIndex {
    /// Indexed by variable; slot 0 is empty.
    positive: Vec<Vec<ClauseId>>,
    /// Indexed by variable; slot 0 is empty.
    negative: Vec<Vec<ClauseId>>,
    clause_sizes: Vec<usize>,
    weights: Vec<Weight>,
}

impl AdjacencyIndex {
    /// Builds the index in a single pass over the clauses.
    pub fn new(formula: &Formula) -> Self {
        let slots = formula.n_vars() + 1;
        let mut positive = vec![Vec::new(); slots];
        let mut negative = vec![Vec::new(); slots];

        for (id, clause) in formula.clauses().iter().enumerate() {
            for lit in clause.literals() {
                if lit.negated {
                    negative[lit.var].push(id);
                } else {
                    positive[lit.var].push(id);
                }
            }
        }

        Self {
            positive,
            negative,
            clause_sizes: formula.clauses().iter().map(|c| c.size()).collect(),
            weights: formula.weights().to_vec(),
        }
    }

    /// Clauses in which `var` occurs un-negated.
    pub fn positive(&self, var: VarId) -> &[ClauseId] {
        &self.positive[var]
    }

    /// Clauses in which `var` occurs negated.
    pub fn negative(&self, var: VarId) -> &[ClauseId] {
        &self.negative[var]
    }

    /// Number of variables.
    pub fn n_vars(&self) -> usize {
        self.positive.len() - 1
    }

    /// Number of clauses.
    pub fn num_clauses(&self) -> usize {
        self.clause_sizes.len()
    }

    /// Literal count of each clause.
    pub fn clause_sizes(&self) -> &[usize] {
        &self.clause_sizes
    }

    /// Weight of `var`.
    pub fn weight(&self, var: VarId) -> Weight {
        self.weights[var]
    }

    /// Total number of occurrences of `var`.
    pub fn degree(&self, var: VarId) -> usize {
        self.positive[var].len() + self.negative[var].len()
    }
}
