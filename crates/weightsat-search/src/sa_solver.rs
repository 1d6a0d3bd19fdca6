//! Simulated annealing solver for weighted SAT.

use crate::adjacency::AdjacencyIndex;
use crate::anneal::{Annealer, AnnealingStats};
use crate::config::AnnealingConfig;
use crate::heuristics::{Score, WeightedSat};
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use weightsat_base::Result;
use weightsat_format::{Assignment, Formula};

/// Best assignment found by annealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnealingResult {
    /// Score of the assignment (clauses first, then weight).
    pub score: Score,
    /// The assignment, evaluated against the formula.
    pub solution: Solution,
}

/// Heuristic maximum-weight solver. Not guaranteed to find the optimum, or
/// a satisfying assignment.
pub struct AnnealingSolver<'f> {
    formula: &'f Formula,
    problem: WeightedSat,
    annealer: Annealer,
    rng: StdRng,
    stats: AnnealingStats,
}

impl<'f> AnnealingSolver<'f> {
    /// Creates a solver, validating `config`.
    pub fn new(formula: &'f Formula, config: AnnealingConfig) -> Result<Self> {
        Self::with_index(formula, Arc::new(AdjacencyIndex::new(formula)), config)
    }

    /// Creates a solver that reuses an existing index of `formula`.
    pub fn with_index(
        formula: &'f Formula,
        index: Arc<AdjacencyIndex>,
        config: AnnealingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let problem = WeightedSat::new(
            formula,
            index,
            config.init,
            config.neighborhood,
            config.cooling(),
            config.temp_prob,
            config.temperature_samples,
        );

        Ok(Self {
            formula,
            problem,
            annealer: Annealer::new(config.run_limits()),
            rng,
            stats: AnnealingStats::default(),
        })
    }

    /// Runs every restart. Repeated calls continue the same random stream.
    pub fn run(&mut self) -> AnnealingResult {
        tracing::info!(
            "Simulated annealing: {} vars, {} clauses, {} restarts",
            self.formula.n_vars(),
            self.formula.num_clauses(),
            self.annealer.limits().restart_limit
        );

        let outcome = self.annealer.run(&self.problem, &mut self.rng);
        self.stats = outcome.stats;

        let (score, assignment) = match outcome.best_state {
            Some(state) => (self.problem.score(&state), state.to_assignment()),
            None => (0, Assignment::all_false(self.formula.n_vars())),
        };
        let solution = Solution::evaluate(self.formula, assignment);

        tracing::info!(
            "Best score {}: weight {}, {}/{} clauses satisfied",
            score,
            solution.weight,
            solution.satisfied_clauses,
            solution.num_clauses
        );
        AnnealingResult { score, solution }
    }

    /// The problem being annealed.
    pub fn problem(&self) -> &WeightedSat {
        &self.problem
    }

    /// Statistics of the last run.
    pub fn stats(&self) -> &AnnealingStats {
        &self.stats
    }
}
