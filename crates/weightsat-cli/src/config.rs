//! Annealing configuration from file and flags.

use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use weightsat_base::Error;
use weightsat_search::{AnnealingConfig, InitStrategy, NeighborhoodStrategy};

/// Flags that override fields of the annealing configuration.
#[derive(Args, Debug, Default)]
pub struct AnnealingArgs {
    /// JSON file with an annealing configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of restarts
    #[arg(long)]
    pub restarts: Option<usize>,

    /// Stagnation window size
    #[arg(long)]
    pub iter_limit: Option<usize>,

    /// Iteration cap per restart
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Geometric cooling factor
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Linear cooling term
    #[arg(long)]
    pub beta: Option<f64>,

    /// Acceptance probability of an average move at the initial temperature
    #[arg(long)]
    pub temp_prob: Option<f64>,

    /// Random moves sampled to pick the initial temperature
    #[arg(long)]
    pub temperature_samples: Option<usize>,

    /// Mean score change below which a full window counts as stagnant
    #[arg(long)]
    pub stagnation_threshold: Option<f64>,

    /// Initialization strategy (all-false, all-true, random, greedy)
    #[arg(long)]
    pub init: Option<InitStrategy>,

    /// Neighborhood strategy (random, greedy, greediest, walksat)
    #[arg(long)]
    pub neighborhood: Option<NeighborhoodStrategy>,
}

impl AnnealingArgs {
    /// Loads the configuration file, if any, then applies the flags.
    pub fn load(&self) -> anyhow::Result<AnnealingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .map_err(|e| Error::Serialization(e.to_string()))
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => AnnealingConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(restarts) = self.restarts {
            config.restart_limit = restarts;
        }
        if let Some(iter_limit) = self.iter_limit {
            config.iter_limit = iter_limit;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = Some(max_steps);
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            config.beta = beta;
        }
        if let Some(temp_prob) = self.temp_prob {
            config.temp_prob = temp_prob;
        }
        if let Some(samples) = self.temperature_samples {
            config.temperature_samples = samples;
        }
        if let Some(threshold) = self.stagnation_threshold {
            config.stagnation_threshold = threshold;
        }
        if let Some(init) = self.init {
            config.init = init;
        }
        if let Some(neighborhood) = self.neighborhood {
            config.neighborhood = neighborhood;
        }

        config.validate()?;
        tracing::debug!("Annealing config: {:?}", config);
        Ok(config)
    }
}
