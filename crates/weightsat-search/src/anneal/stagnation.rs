//! Flat-history detection for ending a restart.

use std::collections::VecDeque;

/// The last `capacity` scores of a restart.
#[derive(Debug, Clone)]
pub struct StagnationWindow {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl StagnationWindow {
    /// Creates an empty window holding up to `capacity` scores.
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a score, evicting the oldest once full.
    pub fn push(&mut self, score: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Whether `capacity` scores have been seen.
    pub fn is_full(&self) -> bool {
        self.scores.len() == self.capacity
    }

    /// Number of scores held.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the window holds no score.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean of `|s[i] - s[i-1]|` over the window; zero with fewer than two
    /// scores.
    pub fn mean_abs_change(&self) -> f64 {
        if self.scores.len() < 2 {
            return 0.0;
        }
        let total: f64 = self
            .scores
            .iter()
            .zip(self.scores.iter().skip(1))
            .map(|(a, b)| (b - a).abs())
            .sum();
        total / (self.scores.len() - 1) as f64
    }

    /// Full, and moving less than `threshold` per iteration on average.
    pub fn is_stagnant(&self, threshold: f64) -> bool {
        self.is_full() && self.mean_abs_change() < threshold
    }
}
