//! The problem interface the annealing driver works against.

use rand::Rng;

/// A proposed move: the neighbouring state, plus whether the move operator
/// considers further search in the current restart futile.
#[derive(Debug, Clone, PartialEq)]
pub struct Move<S> {
    /// The neighbouring state.
    pub state: S,
    /// Ends the current restart after this move is considered.
    pub stop: bool,
}

impl<S> Move<S> {
    /// A move that lets the search continue.
    pub fn go(state: S) -> Self {
        Self { state, stop: false }
    }

    /// A move that ends the current restart.
    pub fn stop(state: S) -> Self {
        Self { state, stop: true }
    }
}

/// An optimization problem solved by maximizing [`evaluate`](Self::evaluate).
pub trait AnnealingProblem {
    /// A point of the search space.
    type State: Clone;

    /// Draws the starting state of a restart.
    fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State;

    /// Score to maximize.
    fn evaluate(&self, state: &Self::State) -> f64;

    /// Proposes a neighbour of `state`. `state` itself is left untouched so
    /// the move can be rejected.
    fn neighbor<R: Rng + ?Sized>(&self, state: &Self::State, rng: &mut R) -> Move<Self::State>;

    /// Temperature at the start of a restart.
    fn initial_temperature<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    /// One step of the cooling schedule.
    fn cool(&self, temperature: f64) -> f64;
}
