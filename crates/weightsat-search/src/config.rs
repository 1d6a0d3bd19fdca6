//! Annealing configuration.

use crate::anneal::RunLimits;
use crate::heuristics::{CoolingSchedule, InitStrategy, NeighborhoodStrategy};
use serde::{Deserialize, Serialize};
use weightsat_base::{Error, Result};

/// Settings of the simulated annealing solver.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnealingConfig {
    /// Size of the stagnation window.
    pub iter_limit: usize,
    /// Number of independent restarts.
    pub restart_limit: usize,
    /// Geometric cooling factor.
    pub alpha: f64,
    /// Linear cooling term.
    pub beta: f64,
    /// Acceptance probability of an average move at the initial temperature.
    pub temp_prob: f64,
    /// Random moves sampled to pick the initial temperature.
    pub temperature_samples: usize,
    /// A restart ends once the mean score change over a full window drops
    /// below this.
    pub stagnation_threshold: f64,
    /// Hard cap on iterations per restart.
    pub max_steps: Option<u64>,
    /// How each restart starts.
    pub init: InitStrategy,
    /// How neighbours are proposed.
    pub neighborhood: NeighborhoodStrategy,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iter_limit: 100,
            restart_limit: 1,
            alpha: 0.99,
            beta: 0.0,
            temp_prob: 0.5,
            temperature_samples: 100,
            stagnation_threshold: 1.0,
            max_steps: Some(100_000),
            init: InitStrategy::Random,
            neighborhood: NeighborhoodStrategy::WalkSat,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    /// Sets both strategies by name.
    pub fn with_strategies(mut self, init: &str, neighborhood: &str) -> Result<Self> {
        self.init = init.parse()?;
        self.neighborhood = neighborhood.parse()?;
        Ok(self)
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.iter_limit == 0 {
            return Err(Error::Config("iter_limit must be at least 1".into()));
        }
        if self.restart_limit == 0 {
            return Err(Error::Config("restart_limit must be at least 1".into()));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::Config(format!("alpha must be in (0, 1], got {}", self.alpha)));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(Error::Config(format!("beta must be finite and non-negative, got {}", self.beta)));
        }
        if !(self.temp_prob > 0.0 && self.temp_prob < 1.0) {
            return Err(Error::Config(format!("temp_prob must be in (0, 1), got {}", self.temp_prob)));
        }
        if self.temperature_samples == 0 {
            return Err(Error::Config("temperature_samples must be at least 1".into()));
        }
        if !(self.stagnation_threshold.is_finite() && self.stagnation_threshold >= 0.0) {
            return Err(Error::Config(format!(
                "stagnation_threshold must be finite and non-negative, got {}",
                self.stagnation_threshold
            )));
        }
        if self.max_steps == Some(0) {
            return Err(Error::Config("max_steps must be at least 1".into()));
        }
        Ok(())
    }

    /// Limits handed to the annealing driver.
    pub fn run_limits(&self) -> RunLimits {
        RunLimits {
            iter_limit: self.iter_limit,
            restart_limit: self.restart_limit,
            stagnation_threshold: self.stagnation_threshold,
            max_steps: self.max_steps,
        }
    }

    /// Cooling schedule built from `alpha` and `beta`.
    pub fn cooling(&self) -> CoolingSchedule {
        CoolingSchedule {
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}
