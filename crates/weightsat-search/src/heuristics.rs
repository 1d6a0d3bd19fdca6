//! Weighted SAT as an annealing problem.
//!
//! The score puts clause satisfaction strictly ahead of weight:
//!
//! ```text
//! score = (total_weight + 1) * satisfied_clauses + weight_of_true_variables
//! ```
//!
//! Since the weight term never exceeds `total_weight`, one more satisfied
//! clause always outranks any change in weight.
//!
//! Every move is made with [`AssignmentState::flip`] on a copy of the current
//! state, so a rejected move leaves the current state untouched.

use crate::adjacency::AdjacencyIndex;
use crate::anneal::{AnnealingProblem, Move};
use crate::state::AssignmentState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use weightsat_base::{ClauseId, Error, VarId, Weight};
use weightsat_format::Formula;

/// Score of a total assignment.
pub type Score = u64;

/// How a restart picks its starting assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitStrategy {
    /// Every variable false.
    AllFalse,
    /// Every variable true.
    AllTrue,
    /// Each variable true with probability 1/2.
    Random,
    /// Each variable takes the polarity it occurs with most often.
    Greedy,
}

impl InitStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 4] = [Self::AllFalse, Self::AllTrue, Self::Random, Self::Greedy];

    /// Name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::AllFalse => "all-false",
            Self::AllTrue => "all-true",
            Self::Random => "random",
            Self::Greedy => "greedy",
        }
    }

    /// Builds a total starting state.
    pub fn produce_initial_state<R: Rng + ?Sized>(
        self,
        index: &Arc<AdjacencyIndex>,
        rng: &mut R,
    ) -> AssignmentState {
        let n = index.n_vars();
        let values: Vec<bool> = match self {
            Self::AllFalse => vec![false; n],
            Self::AllTrue => vec![true; n],
            Self::Random => (0..n).map(|_| rng.gen()).collect(),
            Self::Greedy => (1..=n)
                .map(|var| {
                    let pos = index.positive(var).len();
                    let neg = index.negative(var).len();
                    match pos.cmp(&neg) {
                        std::cmp::Ordering::Greater => true,
                        std::cmp::Ordering::Less => false,
                        std::cmp::Ordering::Equal => rng.gen(),
                    }
                })
                .collect(),
        };
        AssignmentState::with_values(Arc::clone(index), &values)
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown initialization strategy '{s}' (expected one of: all-false, all-true, random, greedy)"
                ))
            })
    }
}

/// How a neighbour of the current assignment is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborhoodStrategy {
    /// Flip one uniformly chosen variable.
    Random,
    /// Flip the best-scoring variable; stop when every flip is worse.
    Greedy,
    /// Flip the best-scoring variable only if it beats the current score.
    Greediest,
    /// Repair a random unsatisfied clause.
    #[serde(rename = "walksat")]
    WalkSat,
}

impl NeighborhoodStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 4] = [Self::Random, Self::Greedy, Self::Greediest, Self::WalkSat];

    /// Name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Greedy => "greedy",
            Self::Greediest => "greediest",
            Self::WalkSat => "walksat",
        }
    }

    /// Proposes a neighbour of `state` without modifying it.
    pub fn produce_neighbor<R: Rng + ?Sized>(
        self,
        problem: &WeightedSat,
        state: &AssignmentState,
        rng: &mut R,
    ) -> Move<AssignmentState> {
        match self {
            Self::Random => random_flip(state, rng),
            Self::Greedy => greedy_flip(problem, state, rng),
            Self::Greediest => greediest_flip(problem, state, rng),
            Self::WalkSat => walksat_flip(problem, state, rng),
        }
    }
}

impl fmt::Display for NeighborhoodStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeighborhoodStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown neighborhood strategy '{s}' (expected one of: random, greedy, greediest, walksat)"
                ))
            })
    }
}

/// Geometric-plus-linear cooling, `T' = alpha * T + beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolingSchedule {
    pub alpha: f64,
    pub beta: f64,
}

impl CoolingSchedule {
    /// One cooling step.
    pub fn cool(&self, temperature: f64) -> f64 {
        self.alpha * temperature + self.beta
    }
}

/// Literal-weighted SAT over a shared occurrence index.
#[derive(Debug, Clone)]
pub struct WeightedSat {
    index: Arc<AdjacencyIndex>,
    /// Distinct variables of each clause.
    clause_vars: Vec<Vec<VarId>>,
    clause_weight: Weight,
    init: InitStrategy,
    neighborhood: NeighborhoodStrategy,
    cooling: CoolingSchedule,
    temp_prob: f64,
    temperature_samples: usize,
}

impl WeightedSat {
    /// Creates the problem for `formula`.
    ///
    /// `temp_prob` is the probability with which the average sampled score
    /// change should be accepted at the initial temperature.
    pub fn new(
        formula: &Formula,
        index: Arc<AdjacencyIndex>,
        init: InitStrategy,
        neighborhood: NeighborhoodStrategy,
        cooling: CoolingSchedule,
        temp_prob: f64,
        temperature_samples: usize,
    ) -> Self {
        let clause_vars = formula
            .clauses()
            .iter()
            .map(|clause| {
                let mut vars: Vec<VarId> = clause.literals().iter().map(|l| l.var).collect();
                vars.sort_unstable();
                vars.dedup();
                vars
            })
            .collect();

        Self {
            clause_weight: formula.total_weight() + 1,
            index,
            clause_vars,
            init,
            neighborhood,
            cooling,
            temp_prob,
            temperature_samples,
        }
    }

    /// Weight of one satisfied clause in the score.
    pub fn clause_weight(&self) -> Weight {
        self.clause_weight
    }

    /// The shared occurrence index.
    pub fn index(&self) -> &Arc<AdjacencyIndex> {
        &self.index
    }

    /// Distinct variables of `clause`, ascending.
    pub fn clause_vars(&self, clause: ClauseId) -> &[VarId] {
        &self.clause_vars[clause]
    }

    /// Score of `state`.
    pub fn score(&self, state: &AssignmentState) -> Score {
        self.clause_weight * state.satisfied_count() as Score + state.true_weight()
    }

    /// Flips each candidate in turn and returns the best resulting score with
    /// every candidate that reaches it. `state` is restored before returning.
    fn best_flips(
        &self,
        state: &mut AssignmentState,
        candidates: impl IntoIterator<Item = VarId>,
    ) -> Option<(Score, Vec<VarId>)> {
        let mut best: Option<(Score, Vec<VarId>)> = None;
        for var in candidates {
            state.flip(var);
            let score = self.score(state);
            state.flip(var);

            match &mut best {
                Some((best_score, ties)) if score == *best_score => ties.push(var),
                Some((best_score, _)) if score < *best_score => {}
                _ => best = Some((score, vec![var])),
            }
        }
        best
    }
}

/// Flips one uniformly chosen variable.
fn random_flip<R: Rng + ?Sized>(state: &AssignmentState, rng: &mut R) -> Move<AssignmentState> {
    let mut next = state.clone();
    let n = next.n_vars();
    if n == 0 {
        return Move::stop(next);
    }
    next.flip(rng.gen_range(1..=n));
    Move::go(next)
}

/// Moves to the best single flip, ties broken uniformly. Signals stop when
/// every flip is worse than staying put.
fn greedy_flip<R: Rng + ?Sized>(
    problem: &WeightedSat,
    state: &AssignmentState,
    rng: &mut R,
) -> Move<AssignmentState> {
    let current = problem.score(state);
    let mut next = state.clone();
    let n = next.n_vars();
    let Some((best, ties)) = problem.best_flips(&mut next, 1..=n) else {
        return Move::stop(next);
    };

    next.flip(ties[rng.gen_range(0..ties.len())]);
    if best < current {
        Move::stop(next)
    } else {
        Move::go(next)
    }
}

/// Like [`greedy_flip`], but only a strict improvement is taken; otherwise the
/// state is returned unchanged with the stop signal.
fn greediest_flip<R: Rng + ?Sized>(
    problem: &WeightedSat,
    state: &AssignmentState,
    rng: &mut R,
) -> Move<AssignmentState> {
    let current = problem.score(state);
    let mut next = state.clone();
    let n = next.n_vars();
    match problem.best_flips(&mut next, 1..=n) {
        Some((best, ties)) if best > current => {
            next.flip(ties[rng.gen_range(0..ties.len())]);
            Move::go(next)
        }
        _ => Move::stop(next),
    }
}

/// Picks a random unsatisfied clause and flips one of its variables: a random
/// one half of the time, otherwise the best one if it improves the score.
/// Falls back to [`greedy_flip`] when nothing is unsatisfied.
fn walksat_flip<R: Rng + ?Sized>(
    problem: &WeightedSat,
    state: &AssignmentState,
    rng: &mut R,
) -> Move<AssignmentState> {
    let unsatisfied: Vec<ClauseId> = state.unsatisfied_clauses().collect();
    if unsatisfied.is_empty() {
        return greedy_flip(problem, state, rng);
    }

    let clause = unsatisfied[rng.gen_range(0..unsatisfied.len())];
    let vars = problem.clause_vars(clause);
    if vars.is_empty() {
        // An empty clause cannot be repaired.
        return greedy_flip(problem, state, rng);
    }

    let mut next = state.clone();
    if rng.gen_bool(0.5) {
        next.flip(vars[rng.gen_range(0..vars.len())]);
        return Move::go(next);
    }

    let current = problem.score(state);
    let var = match problem.best_flips(&mut next, vars.iter().copied()) {
        Some((best, ties)) if best > current => ties[rng.gen_range(0..ties.len())],
        _ => vars[rng.gen_range(0..vars.len())],
    };
    next.flip(var);
    Move::go(next)
}

impl AnnealingProblem for WeightedSat {
    type State = AssignmentState;

    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> AssignmentState {
        self.init.produce_initial_state(&self.index, rng)
    }

    fn evaluate(&self, state: &AssignmentState) -> f64 {
        self.score(state) as f64
    }

    fn neighbor<R: Rng + ?Sized>(
        &self,
        state: &AssignmentState,
        rng: &mut R,
    ) -> Move<AssignmentState> {
        self.neighborhood.produce_neighbor(self, state, rng)
    }

    /// Samples random states and random flips of them, and picks the
    /// temperature at which the mean absolute score change is accepted with
    /// probability `temp_prob`: `T0 = |mean / ln(temp_prob)|`.
    fn initial_temperature<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut total = 0.0;
        for _ in 0..self.temperature_samples {
            let start = InitStrategy::Random.produce_initial_state(&self.index, rng);
            let moved = random_flip(&start, rng);
            total += (self.evaluate(&moved.state) - self.evaluate(&start)).abs();
        }
        let mean = total / self.temperature_samples as f64;
        let temperature = (mean / self.temp_prob.ln()).abs();

        if temperature.is_finite() && temperature > 0.0 {
            temperature
        } else {
            1.0
        }
    }

    fn cool(&self, temperature: f64) -> f64 {
        self.cooling.cool(temperature)
    }
}
