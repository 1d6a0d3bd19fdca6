//! The restart loop and Metropolis acceptance.

use super::stagnation::StagnationWindow;
use super::types::{AnnealingProblem, Move};
use rand::Rng;
use serde::Serialize;

/// Termination settings of the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLimits {
    /// Size of the stagnation window.
    pub iter_limit: usize,
    /// Number of independent restarts.
    pub restart_limit: usize,
    /// A full window whose mean per-iteration change is below this ends the
    /// restart.
    pub stagnation_threshold: f64,
    /// Hard cap on iterations per restart (None = unbounded).
    pub max_steps: Option<u64>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            iter_limit: 100,
            restart_limit: 1,
            stagnation_threshold: 1.0,
            max_steps: Some(100_000),
        }
    }
}

/// Why a restart ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// The score history went flat.
    Stagnation,
    /// The move operator asked to stop.
    Signal,
    /// `max_steps` iterations were run.
    StepLimit,
}

/// What happened during one restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartStats {
    /// Score of the starting state.
    pub initial_score: f64,
    /// Score of the state the restart ended in.
    pub final_score: f64,
    /// Best score seen within this restart.
    pub best_score: f64,
    /// Temperature the restart started at.
    pub initial_temperature: f64,
    /// Neighbours generated.
    pub iterations: u64,
    /// Neighbours accepted.
    pub accepted: u64,
    /// Why the restart ended.
    pub stop_reason: StopReason,
}

/// Driver statistics, one entry per restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnealingStats {
    /// Per-restart records, in order.
    pub restarts: Vec<RestartStats>,
    /// Iterations summed over all restarts.
    pub total_iterations: u64,
}

impl AnnealingStats {
    /// Score of each restart's starting state.
    pub fn initial_scores(&self) -> Vec<f64> {
        self.restarts.iter().map(|r| r.initial_score).collect()
    }
}

/// Best state found over all restarts.
#[derive(Debug, Clone)]
pub struct AnnealingOutcome<S> {
    /// Score of `best_state`.
    pub best_score: f64,
    /// `None` only when no restart ran.
    pub best_state: Option<S>,
    /// Driver statistics.
    pub stats: AnnealingStats,
}

/// Simulated annealing driver.
#[derive(Debug, Clone, Default)]
pub struct Annealer {
    limits: RunLimits,
}

impl Annealer {
    /// Creates a driver with the given limits.
    pub fn new(limits: RunLimits) -> Self {
        Self { limits }
    }

    /// The driver's limits.
    pub fn limits(&self) -> &RunLimits {
        &self.limits
    }

    /// Runs every restart and returns the best state seen.
    pub fn run<P, R>(&self, problem: &P, rng: &mut R) -> AnnealingOutcome<P::State>
    where
        P: AnnealingProblem,
        R: Rng + ?Sized,
    {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_state = None;
        let mut stats = AnnealingStats::default();

        for restart in 0..self.limits.restart_limit {
            let mut current = problem.initial_state(rng);
            let mut current_score = problem.evaluate(&current);
            let initial_temperature = problem.initial_temperature(rng);
            let mut temperature = initial_temperature;
            let mut window = StagnationWindow::new(self.limits.iter_limit);

            let mut record = RestartStats {
                initial_score: current_score,
                final_score: current_score,
                best_score: current_score,
                initial_temperature,
                iterations: 0,
                accepted: 0,
                stop_reason: StopReason::Stagnation,
            };
            if current_score > best_score {
                best_score = current_score;
                best_state = Some(current.clone());
            }

            loop {
                if self.limits.max_steps.is_some_and(|max| record.iterations >= max) {
                    record.stop_reason = StopReason::StepLimit;
                    break;
                }

                let Move { state: next, stop } = problem.neighbor(&current, rng);
                let next_score = problem.evaluate(&next);
                record.iterations += 1;

                if accept(current_score, next_score, temperature, rng) {
                    current = next;
                    current_score = next_score;
                    record.accepted += 1;
                    tracing::trace!("Accepted move to score {}", current_score);

                    if current_score > record.best_score {
                        record.best_score = current_score;
                    }
                    if current_score > best_score {
                        best_score = current_score;
                        best_state = Some(current.clone());
                    }
                }

                window.push(current_score);
                temperature = problem.cool(temperature);

                if stop {
                    record.stop_reason = StopReason::Signal;
                    break;
                }
                if window.is_stagnant(self.limits.stagnation_threshold) {
                    record.stop_reason = StopReason::Stagnation;
                    break;
                }
            }

            record.final_score = current_score;
            tracing::debug!(
                "Restart {}: initial {} -> best {} in {} iterations ({:?})",
                restart,
                record.initial_score,
                record.best_score,
                record.iterations,
                record.stop_reason
            );
            stats.total_iterations += record.iterations;
            stats.restarts.push(record);
        }

        AnnealingOutcome {
            best_score,
            best_state,
            stats,
        }
    }
}

/// Metropolis criterion: improvements always pass, anything else passes with
/// probability `exp((next - current) / temperature)`.
fn accept<R: Rng + ?Sized>(current: f64, next: f64, temperature: f64, rng: &mut R) -> bool {
    if next > current {
        return true;
    }
    let p = ((next - current) / temperature).exp();
    rng.gen::<f64>() < p
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Maximize `-(x - 17)^2` over the integers with ±1 steps.
    struct Parabola;

    impl AnnealingProblem for Parabola {
        type State = i64;

        fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
            rng.gen_range(-50..50)
        }

        fn evaluate(&self, state: &i64) -> f64 {
            -((state - 17) * (state - 17)) as f64
        }

        fn neighbor<R: Rng + ?Sized>(&self, state: &i64, rng: &mut R) -> Move<i64> {
            Move::go(if rng.gen_bool(0.5) { state + 1 } else { state - 1 })
        }

        fn initial_temperature<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
            10.0
        }

        fn cool(&self, temperature: f64) -> f64 {
            temperature * 0.9
        }
    }

    /// Always proposes the same state and never moves.
    struct Frozen {
        stop: bool,
    }

    impl AnnealingProblem for Frozen {
        type State = u8;

        fn initial_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> u8 {
            3
        }

        fn evaluate(&self, state: &u8) -> f64 {
            f64::from(*state)
        }

        fn neighbor<R: Rng + ?Sized>(&self, state: &u8, _rng: &mut R) -> Move<u8> {
            Move { state: *state, stop: self.stop }
        }

        fn initial_temperature<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
            1.0
        }

        fn cool(&self, temperature: f64) -> f64 {
            temperature
        }
    }

    #[test]
    fn test_finds_parabola_peak() {
        let annealer = Annealer::new(RunLimits {
            iter_limit: 50,
            restart_limit: 3,
            stagnation_threshold: 0.1,
            max_steps: Some(10_000),
        });
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = annealer.run(&Parabola, &mut rng);
        assert_eq!(outcome.best_state, Some(17));
        assert_eq!(outcome.best_score, 0.0);
        assert_eq!(outcome.stats.restarts.len(), 3);
    }

    #[test]
    fn test_constant_score_stops_after_window_fills() {
        let annealer = Annealer::new(RunLimits {
            iter_limit: 8,
            restart_limit: 1,
            stagnation_threshold: 0.5,
            max_steps: None,
        });
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = annealer.run(&Frozen { stop: false }, &mut rng);
        let restart = &outcome.stats.restarts[0];
        assert_eq!(restart.stop_reason, StopReason::Stagnation);
        assert_eq!(restart.iterations, 8);
    }

    #[test]
    fn test_stop_signal_ends_restart() {
        let annealer = Annealer::new(RunLimits {
            iter_limit: 100,
            restart_limit: 2,
            stagnation_threshold: 0.5,
            max_steps: None,
        });
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = annealer.run(&Frozen { stop: true }, &mut rng);
        assert!(outcome
            .stats
            .restarts
            .iter()
            .all(|r| r.stop_reason == StopReason::Signal && r.iterations == 1));
        assert_eq!(outcome.stats.initial_scores(), vec![3.0, 3.0]);
        assert_eq!(outcome.stats.total_iterations, 2);
    }

    #[test]
    fn test_step_limit() {
        let annealer = Annealer::new(RunLimits {
            iter_limit: 100,
            restart_limit: 1,
            stagnation_threshold: 0.0,
            max_steps: Some(25),
        });
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = annealer.run(&Frozen { stop: false }, &mut rng);
        assert_eq!(outcome.stats.restarts[0].stop_reason, StopReason::StepLimit);
        assert_eq!(outcome.stats.restarts[0].iterations, 25);
    }

    #[test]
    fn test_no_restarts() {
        let annealer = Annealer::new(RunLimits {
            restart_limit: 0,
            ..RunLimits::default()
        });
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = annealer.run(&Parabola, &mut rng);
        assert!(outcome.best_state.is_none());
        assert!(outcome.stats.restarts.is_empty());
    }

    #[test]
    fn test_metropolis_accepts_ties_at_positive_temperature() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(accept(5.0, 6.0, 0.0, &mut rng));
        assert!(accept(5.0, 5.0, 1.0, &mut rng));
        assert!(!accept(5.0, 4.0, 0.0, &mut rng));
    }
}
