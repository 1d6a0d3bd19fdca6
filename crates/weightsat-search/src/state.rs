//! Assignment state with incremental clause counters.
//!
//! Every clause keeps a running count of its literals that are currently true
//! and currently false. Assigning, unassigning or flipping a variable touches
//! only the clauses in its occurrence lists, so each operation costs
//! O(degree) instead of a rescan of the formula.

use crate::adjacency::AdjacencyIndex;
use serde::Serialize;
use std::sync::Arc;
use weightsat_base::{ClauseId, VarId, Weight};
use weightsat_format::Assignment;

/// Literal tallies of a single clause.
///
/// `true_count + false_count <= size` always holds, with equality once every
/// variable of the clause is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClauseCounter {
    /// Literals currently true.
    pub true_count: u32,
    /// Literals currently false.
    pub false_count: u32,
    /// Literals in the clause.
    pub size: u32,
}

impl ClauseCounter {
    /// Creates a counter for a clause with no assigned literal.
    pub const fn new(size: u32) -> Self {
        Self {
            true_count: 0,
            false_count: 0,
            size,
        }
    }

    /// At least one literal is true.
    pub const fn is_satisfied(&self) -> bool {
        self.true_count > 0
    }

    /// Every literal is false; no completion can satisfy the clause.
    pub const fn is_conflict(&self) -> bool {
        self.false_count == self.size
    }
}

/// Satisfied/conflicting clause totals, kept in step with the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Totals {
    satisfied: usize,
    conflicts: usize,
}

impl Totals {
    fn literal_true(&mut self, counter: &mut ClauseCounter) {
        counter.true_count += 1;
        if counter.true_count == 1 {
            self.satisfied += 1;
        }
    }

    fn literal_false(&mut self, counter: &mut ClauseCounter) {
        counter.false_count += 1;
        if counter.false_count == counter.size {
            self.conflicts += 1;
        }
    }

    fn retract_true(&mut self, counter: &mut ClauseCounter) {
        debug_assert!(counter.true_count > 0);
        counter.true_count -= 1;
        if counter.true_count == 0 {
            self.satisfied -= 1;
        }
    }

    fn retract_false(&mut self, counter: &mut ClauseCounter) {
        debug_assert!(counter.false_count > 0);
        if counter.false_count == counter.size {
            self.conflicts -= 1;
        }
        counter.false_count -= 1;
    }
}

/// A (possibly partial) assignment paired with the clause counters that
/// describe it.
///
/// The two are only ever updated together, so the counters always reflect
/// exactly the current values.
#[derive(Debug, Clone)]
pub struct AssignmentState {
    index: Arc<AdjacencyIndex>,
    /// Indexed by variable; slot 0 is unused.
    values: Vec<Option<bool>>,
    counters: Vec<ClauseCounter>,
    totals: Totals,
    true_weight: Weight,
}

impl AssignmentState {
    /// Creates a state with every variable unassigned.
    pub fn new(index: Arc<AdjacencyIndex>) -> Self {
        let counters: Vec<ClauseCounter> = index
            .clause_sizes()
            .iter()
            .map(|&size| ClauseCounter::new(size as u32))
            .collect();
        // An empty clause is false from the start.
        let conflicts = counters.iter().filter(|c| c.is_conflict()).count();

        Self {
            values: vec![None; index.n_vars() + 1],
            counters,
            totals: Totals {
                satisfied: 0,
                conflicts,
            },
            true_weight: 0,
            index,
        }
    }

    /// Creates a total state; `values[i]` is the value of variable `i + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per variable.
    pub fn with_values(index: Arc<AdjacencyIndex>, values: &[bool]) -> Self {
        assert_eq!(values.len(), index.n_vars(), "one value per variable");
        let mut state = Self::new(index);
        for (i, &value) in values.iter().enumerate() {
            state.assign(i + 1, value);
        }
        state
    }

    /// Assigns `value` to the unassigned variable `var`.
    pub fn assign(&mut self, var: VarId, value: bool) {
        debug_assert!(self.values[var].is_none(), "x{var} is already assigned");
        let Self {
            index,
            values,
            counters,
            totals,
            true_weight,
        } = self;

        values[var] = Some(value);
        for &c in index.positive(var) {
            if value {
                totals.literal_true(&mut counters[c]);
            } else {
                totals.literal_false(&mut counters[c]);
            }
        }
        for &c in index.negative(var) {
            if value {
                totals.literal_false(&mut counters[c]);
            } else {
                totals.literal_true(&mut counters[c]);
            }
        }
        if value {
            *true_weight += index.weight(var);
        }
    }

    /// Reverts the last assignment of `var`. No-op if `var` is unassigned.
    pub fn unassign(&mut self, var: VarId) {
        let Self {
            index,
            values,
            counters,
            totals,
            true_weight,
        } = self;

        let Some(value) = values[var].take() else {
            debug_assert!(false, "x{var} is not assigned");
            return;
        };
        for &c in index.positive(var) {
            if value {
                totals.retract_true(&mut counters[c]);
            } else {
                totals.retract_false(&mut counters[c]);
            }
        }
        for &c in index.negative(var) {
            if value {
                totals.retract_false(&mut counters[c]);
            } else {
                totals.retract_true(&mut counters[c]);
            }
        }
        if value {
            *true_weight -= index.weight(var);
        }
    }

    /// Toggles an assigned variable, moving each touched literal between the
    /// true and false buckets in one pass. No-op if `var` is unassigned.
    pub fn flip(&mut self, var: VarId) {
        let Self {
            index,
            values,
            counters,
            totals,
            true_weight,
        } = self;

        let Some(old) = values[var] else {
            debug_assert!(false, "x{var} is not assigned");
            return;
        };
        values[var] = Some(!old);

        // Positive literals of `var` were true iff `old`; negative ones iff `!old`.
        for &c in index.positive(var) {
            let counter = &mut counters[c];
            if old {
                totals.retract_true(counter);
                totals.literal_false(counter);
            } else {
                totals.retract_false(counter);
                totals.literal_true(counter);
            }
        }
        for &c in index.negative(var) {
            let counter = &mut counters[c];
            if old {
                totals.retract_false(counter);
                totals.literal_true(counter);
            } else {
                totals.retract_true(counter);
                totals.literal_false(counter);
            }
        }

        let w = index.weight(var);
        if old {
            *true_weight -= w;
        } else {
            *true_weight += w;
        }
    }

    /// Every clause has a true literal.
    pub fn is_satisfied(&self) -> bool {
        self.totals.satisfied == self.counters.len()
    }

    /// Some clause has all of its literals false.
    pub fn has_conflict(&self) -> bool {
        self.totals.conflicts > 0
    }

    /// Number of clauses with a true literal.
    pub fn satisfied_count(&self) -> usize {
        self.totals.satisfied
    }

    /// Clauses without a true literal, in clause order.
    pub fn unsatisfied_clauses(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.counters
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied())
            .map(|(id, _)| id)
    }

    /// Sum of weights of the variables currently true.
    pub fn true_weight(&self) -> Weight {
        self.true_weight
    }

    /// Current value of `var`, `None` if unassigned.
    pub fn value(&self, var: VarId) -> Option<bool> {
        self.values[var]
    }

    /// Counter of clause `clause`.
    pub fn counter(&self, clause: ClauseId) -> ClauseCounter {
        self.counters[clause]
    }

    /// All counters, in clause order.
    pub fn counters(&self) -> &[ClauseCounter] {
        &self.counters
    }

    /// The shared occurrence index.
    pub fn index(&self) -> &Arc<AdjacencyIndex> {
        &self.index
    }

    /// Number of variables.
    pub fn n_vars(&self) -> usize {
        self.values.len() - 1
    }

    /// Total assignment view; unassigned variables read as false.
    pub fn to_assignment(&self) -> Assignment {
        Assignment::from_values(
            self.values[1..]
                .iter()
                .map(|v| v.unwrap_or(false))
                .collect(),
        )
    }
}

impl PartialEq for AssignmentState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.index, &other.index)
            && self.values == other.values
            && self.counters == other.counters
            && self.true_weight == other.true_weight
    }
}

impl Eq for AssignmentState {}
