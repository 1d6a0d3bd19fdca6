//! # weightsat-search
//!
//! Search algorithms for literal-weighted SAT: find a satisfying assignment
//! whose true variables carry the largest total weight.
//!
//! - [`BranchAndBound`]: exact depth-first search with weight-bound pruning
//! - [`AnnealingSolver`]: simulated annealing with restarts, for formulas too
//!   large to solve exactly
//!
//! Both run on an [`AssignmentState`], which keeps per-clause literal
//! counters up to date under single-variable changes.

pub mod adjacency;
pub mod anneal;
pub mod bnb;
pub mod config;
pub mod heuristics;
pub mod sa_solver;
pub mod solution;
pub mod state;

pub use adjacency::AdjacencyIndex;
pub use bnb::{BnbOutcome, BnbStats, BranchAndBound};
pub use config::AnnealingConfig;
pub use heuristics::{CoolingSchedule, InitStrategy, NeighborhoodStrategy, Score, WeightedSat};
pub use sa_solver::{AnnealingResult, AnnealingSolver};
pub use solution::Solution;
pub use state::{AssignmentState, ClauseCounter};
