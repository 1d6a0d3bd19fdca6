//! Simulated annealing (SA).
//!
//! A problem-agnostic driver: the search space, scoring function, move
//! operator and temperature schedule come from an [`AnnealingProblem`]. The
//! driver runs independent restarts, accepts worsening moves with the
//! Metropolis probability `exp(Δ / T)`, and ends a restart once its recent
//! score history has gone flat.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod runner;
mod stagnation;
mod types;

pub use runner::{Annealer, AnnealingOutcome, AnnealingStats, RestartStats, RunLimits, StopReason};
pub use stagnation::StagnationWindow;
pub use types::{AnnealingProblem, Move};
