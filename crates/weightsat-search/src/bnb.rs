//! Exact branch-and-bound search.
//!
//! Variables are decided in ascending order, `false` before `true`. A node is
//! pruned when its partial assignment already falsifies a clause, or when
//! even setting every remaining variable true could not beat the incumbent.
//! The depth-first walk runs on an explicit frame stack, so the search depth
//! (one level per variable) is not limited by the thread's call stack.

use crate::adjacency::AdjacencyIndex;
use crate::solution::Solution;
use crate::state::AssignmentState;
use serde::Serialize;
use std::sync::Arc;
use weightsat_base::{VarId, Weight};
use weightsat_format::{Assignment, Formula};

/// The result of a branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BnbOutcome {
    /// A maximum-weight satisfying assignment.
    Optimal(Solution),
    /// No assignment satisfies every clause.
    Unsatisfiable,
}

impl BnbOutcome {
    /// Weight of the optimum, if the formula is satisfiable.
    pub fn weight(&self) -> Option<Weight> {
        self.solution().map(|s| s.weight)
    }

    /// The optimal solution, if any.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Optimal(solution) => Some(solution),
            Self::Unsatisfiable => None,
        }
    }
}

/// Branch-and-bound statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BnbStats {
    /// Search nodes entered.
    pub nodes: u64,
    /// Nodes cut because a clause was falsified.
    pub conflict_prunes: u64,
    /// Nodes cut by the weight bound.
    pub bound_prunes: u64,
    /// Nodes reached with every variable assigned.
    pub leaves: u64,
    /// Deepest level reached (number of assigned variables).
    pub max_depth: usize,
    /// Weight of each incumbent, in the order they were found.
    pub incumbent_trace: Vec<Weight>,
    /// Weight of the final incumbent.
    pub best_weight: Option<Weight>,
}

/// Which child a frame explores next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Enter,
    False,
    True,
    Done,
}

/// One level of the depth-first walk.
#[derive(Debug, Clone, Copy)]
struct Frame {
    var: VarId,
    /// Sum of weights of variables `var..=n_vars`.
    weight_remaining: Weight,
    current_weight: Weight,
    next: Branch,
}

impl Frame {
    fn new(var: VarId, weight_remaining: Weight, current_weight: Weight) -> Self {
        Self {
            var,
            weight_remaining,
            current_weight,
            next: Branch::Enter,
        }
    }
}

/// Exact maximum-weight solver.
pub struct BranchAndBound<'f> {
    formula: &'f Formula,
    index: Arc<AdjacencyIndex>,
    stats: BnbStats,
}

impl<'f> BranchAndBound<'f> {
    /// Creates a solver, building the occurrence index of `formula`.
    pub fn new(formula: &'f Formula) -> Self {
        Self::with_index(formula, Arc::new(AdjacencyIndex::new(formula)))
    }

    /// Creates a solver that reuses an existing index of `formula`.
    pub fn with_index(formula: &'f Formula, index: Arc<AdjacencyIndex>) -> Self {
        Self {
            formula,
            index,
            stats: BnbStats::default(),
        }
    }

    /// Runs the search to completion.
    pub fn run(&mut self) -> BnbOutcome {
        tracing::info!(
            "Branch and bound: {} vars, {} clauses",
            self.formula.n_vars(),
            self.formula.num_clauses()
        );
        self.stats = BnbStats::default();

        let n_vars = self.formula.n_vars();
        let mut state = AssignmentState::new(Arc::clone(&self.index));
        let mut incumbent: Option<(Weight, Assignment)> = None;
        let mut stack = Vec::with_capacity(n_vars + 1);
        stack.push(Frame::new(1, self.formula.total_weight(), 0));

        while let Some(frame) = stack.last_mut() {
            let var = frame.var;
            match frame.next {
                Branch::Enter => {
                    self.stats.nodes += 1;
                    self.stats.max_depth = self.stats.max_depth.max(var - 1);

                    if state.has_conflict() {
                        self.stats.conflict_prunes += 1;
                        stack.pop();
                        continue;
                    }

                    let improves = incumbent
                        .as_ref()
                        .map_or(true, |(best, _)| frame.current_weight > *best);
                    if improves && state.is_satisfied() {
                        tracing::debug!("New incumbent with weight {} at depth {}", frame.current_weight, var - 1);
                        self.stats.incumbent_trace.push(frame.current_weight);
                        incumbent = Some((frame.current_weight, state.to_assignment()));
                    }

                    if let Some((best, _)) = &incumbent {
                        if frame.current_weight + frame.weight_remaining <= *best {
                            self.stats.bound_prunes += 1;
                            stack.pop();
                            continue;
                        }
                    }

                    if var > n_vars {
                        self.stats.leaves += 1;
                        stack.pop();
                        continue;
                    }
                    frame.next = Branch::False;
                }
                Branch::False => {
                    let w = self.index.weight(var);
                    let child = Frame::new(var + 1, frame.weight_remaining - w, frame.current_weight);
                    frame.next = Branch::True;
                    state.assign(var, false);
                    stack.push(child);
                }
                Branch::True => {
                    let w = self.index.weight(var);
                    let child = Frame::new(var + 1, frame.weight_remaining - w, frame.current_weight + w);
                    frame.next = Branch::Done;
                    state.unassign(var);
                    state.assign(var, true);
                    stack.push(child);
                }
                Branch::Done => {
                    state.unassign(var);
                    stack.pop();
                }
            }
        }

        match incumbent {
            Some((weight, assignment)) => {
                self.stats.best_weight = Some(weight);
                tracing::info!("Optimum weight {} after {} nodes", weight, self.stats.nodes);
                BnbOutcome::Optimal(Solution::evaluate(self.formula, assignment))
            }
            None => {
                tracing::info!("No satisfying assignment after {} nodes", self.stats.nodes);
                BnbOutcome::Unsatisfiable
            }
        }
    }

    /// Statistics of the last run.
    pub fn stats(&self) -> &BnbStats {
        &self.stats
    }
}
