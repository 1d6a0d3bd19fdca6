//! Comprehensive tests for weightsat-search crate.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use weightsat_base::Error;
use weightsat_format::{Formula, MAX_SCORE};
use weightsat_search::anneal::{Annealer, AnnealingProblem, RunLimits, StopReason};
use weightsat_search::{
    AdjacencyIndex, AnnealingConfig, AnnealingSolver, AssignmentState, BnbOutcome, BranchAndBound,
    CoolingSchedule, InitStrategy, NeighborhoodStrategy, WeightedSat,
};

const EXAMPLE: &str = "\
c x1 = 5, x2 = 1, x3 = 10
p cnf 3 3
w 5 1 10 0
1 2 0
-1 3 0
-2 -3 0
";

fn example() -> Formula {
    EXAMPLE.parse().unwrap()
}

fn problem(formula: &Formula, init: InitStrategy, neighborhood: NeighborhoodStrategy) -> WeightedSat {
    WeightedSat::new(
        formula,
        Arc::new(AdjacencyIndex::new(formula)),
        init,
        neighborhood,
        CoolingSchedule { alpha: 0.95, beta: 0.0 },
        0.5,
        50,
    )
}

// =============================================================================
// Assignment State Tests
// =============================================================================

#[test]
fn test_state_tracks_example_formula() {
    let f = example();
    let index = Arc::new(AdjacencyIndex::new(&f));
    let mut state = AssignmentState::new(Arc::clone(&index));
    assert!(!state.is_satisfied());
    assert!(!state.has_conflict());

    state.assign(1, true);
    state.assign(2, false);
    assert!(!state.has_conflict());
    assert_eq!(state.true_weight(), 5);

    state.assign(3, true);
    assert!(state.is_satisfied());
    assert_eq!(state.true_weight(), 15);
    assert_eq!(state.satisfied_count(), 3);

    state.flip(3);
    assert!(state.has_conflict());
    assert_eq!(state.unsatisfied_clauses().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn test_unassign_restores_state() {
    let f = example();
    let index = Arc::new(AdjacencyIndex::new(&f));
    let mut state = AssignmentState::new(Arc::clone(&index));
    state.assign(2, true);
    let before = state.clone();

    state.assign(3, true);
    state.unassign(3);
    assert_eq!(state, before);
}

#[test]
fn test_counters_match_clause_sizes() {
    let f = example();
    let index = Arc::new(AdjacencyIndex::new(&f));
    let state = AssignmentState::with_values(Arc::clone(&index), &[true, true, false]);
    for (c, counter) in state.counters().iter().enumerate() {
        assert_eq!(counter.true_count + counter.false_count, counter.size);
        assert_eq!(counter.size as usize, f.clauses()[c].size());
    }
}

// =============================================================================
// Branch and Bound Tests
// =============================================================================

#[test]
fn test_bnb_example() {
    let f = example();
    let mut bnb = BranchAndBound::new(&f);
    let outcome = bnb.run();
    assert_eq!(outcome.weight(), Some(15));
    assert_eq!(
        outcome.solution().map(|s| s.assignment.to_dimacs()),
        Some(vec![1, -2, 3])
    );
    assert!(bnb.stats().nodes > 0);
}

#[test]
fn test_bnb_unsat_from_dimacs() {
    let f: Formula = "p cnf 2 4\nw 1 1 0\n1 2 0\n-1 2 0\n1 -2 0\n-1 -2 0\n".parse().unwrap();
    assert_eq!(BranchAndBound::new(&f).run(), BnbOutcome::Unsatisfiable);
}

#[test]
fn test_bnb_prefers_heavier_model() {
    // Exactly one of x1, x2; x2 is heavier.
    let f: Formula = "p cnf 2 2\nw 3 7 0\n1 2 0\n-1 -2 0\n".parse().unwrap();
    let outcome = BranchAndBound::new(&f).run();
    assert_eq!(outcome.weight(), Some(7));
    assert_eq!(outcome.solution().map(|s| s.assignment.value(2)), Some(true));
}

#[test]
fn test_bnb_tautology_is_always_satisfied() {
    let f: Formula = "p cnf 2 2\nw 2 3 0\n1 -1 0\n-2 0\n".parse().unwrap();
    assert_eq!(BranchAndBound::new(&f).run().weight(), Some(2));
}

// =============================================================================
// Heuristic Tests
// =============================================================================

#[test]
fn test_greedy_init_on_positive_formula_sets_everything_true() {
    let f: Formula = "p cnf 4 3\nw 1 1 1 1 0\n1 2 0\n3 4 0\n1 3 0\n".parse().unwrap();
    let p = problem(&f, InitStrategy::Greedy, NeighborhoodStrategy::Greedy);
    let mut rng = StdRng::seed_from_u64(0);
    let state = p.initial_state(&mut rng);
    assert_eq!(state.to_assignment().to_dimacs(), vec![1, 2, 3, 4]);
}

#[test]
fn test_walksat_equals_greedy_when_satisfied() {
    let f = example();
    let p = problem(&f, InitStrategy::AllFalse, NeighborhoodStrategy::WalkSat);
    let state = AssignmentState::with_values(Arc::clone(p.index()), &[true, false, true]);
    for seed in 0..10 {
        let mut a = StdRng::seed_from_u64(seed);
        let mut b = StdRng::seed_from_u64(seed);
        assert_eq!(
            NeighborhoodStrategy::WalkSat.produce_neighbor(&p, &state, &mut a),
            NeighborhoodStrategy::Greedy.produce_neighbor(&p, &state, &mut b)
        );
    }
}

#[test]
fn test_neighbors_leave_current_state_untouched() {
    let f = example();
    for neighborhood in NeighborhoodStrategy::ALL {
        let p = problem(&f, InitStrategy::AllFalse, neighborhood);
        let state = AssignmentState::with_values(Arc::clone(p.index()), &[false, true, true]);
        let snapshot = state.clone();
        let mut rng = StdRng::seed_from_u64(2);
        let _ = p.neighbor(&state, &mut rng);
        assert_eq!(state, snapshot, "{neighborhood}");
    }
}

#[test]
fn test_unknown_strategy_names() {
    assert!(matches!("simulated".parse::<InitStrategy>(), Err(Error::Config(_))));
    assert!(matches!("WalkSAT".parse::<NeighborhoodStrategy>(), Err(Error::Config(_))));
    assert!(AnnealingConfig::default().with_strategies("random", "novelty").is_err());
}

// =============================================================================
// Annealing Tests
// =============================================================================

#[test]
fn test_anneal_example_finds_optimum() {
    let f = example();
    let config = AnnealingConfig {
        restart_limit: 20,
        ..AnnealingConfig::default().with_seed(42)
    };
    let mut solver = AnnealingSolver::new(&f, config).unwrap();
    let result = solver.run();
    assert_eq!(result.solution.weight, 15);
    assert!(result.solution.is_satisfying());
    assert_eq!(solver.stats().restarts.len(), 20);
}

#[test]
fn test_anneal_never_beats_exact_optimum() {
    let f: Formula = "\
p cnf 6 7
w 4 2 9 1 6 3 0
1 2 3 0
-1 -3 0
-3 -5 0
2 4 0
-2 5 6 0
-4 -6 0
1 -6 0
"
    .parse()
    .unwrap();
    let exact = BranchAndBound::new(&f).run();
    let optimum = exact.weight().unwrap();

    let config = AnnealingConfig {
        restart_limit: 30,
        ..AnnealingConfig::default().with_seed(8)
    };
    let result = AnnealingSolver::new(&f, config).unwrap().run();
    if result.solution.is_satisfying() {
        assert!(result.solution.weight <= optimum);
    }
}

#[test]
fn test_greediest_annealer_stops_by_signal() {
    let f = example();
    let p = problem(&f, InitStrategy::AllFalse, NeighborhoodStrategy::Greediest);
    let annealer = Annealer::new(RunLimits {
        iter_limit: 1_000,
        restart_limit: 1,
        stagnation_threshold: 0.0,
        max_steps: None,
    });
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = annealer.run(&p, &mut rng);
    assert_eq!(outcome.stats.restarts[0].stop_reason, StopReason::Signal);
    assert!(outcome.best_state.is_some());
}

#[test]
fn test_empty_formula() {
    let f: Formula = "p cnf 0 0\nw 0\n".parse().unwrap();
    assert_eq!(BranchAndBound::new(&f).run().weight(), Some(0));

    let result = AnnealingSolver::new(&f, AnnealingConfig::default().with_seed(0))
        .unwrap()
        .run();
    assert_eq!(result.solution.weight, 0);
    assert!(result.solution.is_satisfying());
}

#[test]
fn test_largest_weights_score_exactly() {
    // Total weight 2^51 - 1 with three clauses puts the score bound at 2^53.
    let f: Formula = "p cnf 2 3\nw 2251799813685246 1 0\n1 2 0\n-1 2 0\n1 -2 0\n"
        .parse()
        .unwrap();
    assert_eq!(BranchAndBound::new(&f).run().weight(), Some(2251799813685247));

    let mut solver = AnnealingSolver::new(&f, AnnealingConfig::default().with_seed(6)).unwrap();
    let result = solver.run();
    assert!(result.score <= MAX_SCORE);
    assert_eq!(result.score as f64 as u64, result.score);
}

#[test]
fn test_weights_beyond_exact_scoring_rejected() {
    let err = "p cnf 2 2\nw 9223372036854775807 1 0\n1 2 0\n-1 0\n"
        .parse::<Formula>()
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}
