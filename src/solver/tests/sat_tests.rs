use crate::solver::{CoreSolver, LowLevelConfig, SolverConfig, Tristate};

use super::{add_clauses, assert_watch_consistency, check_model, pigeon_hole, random_3sat, solver_configs};

#[test]
fn test_empty_formula() {
    let mut solver = CoreSolver::new();
    assert_eq!(solver.solve().unwrap(), Tristate::True);
    assert!(solver.model().is_empty());
}

#[test]
fn test_single_unit() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[1]);
    assert_eq!(solver.solve().unwrap(), Tristate::True);
    assert_eq!(solver.model(), &[true]);
}

#[test]
fn test_unsat_pair() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[1]);
    solver.add_clause_from_dimacs(&[-1]);
    assert_eq!(solver.solve().unwrap(), Tristate::False);
    assert!(!solver.ok());
}

#[test]
fn test_two_clause_chain() {
    // propagation alone derives the contradiction
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &[vec![1, 2], vec![-1, 2], vec![-2]]);
    assert_eq!(solver.solve().unwrap(), Tristate::False);
}

#[test]
fn test_satisfiable_chain() {
    for config in solver_configs() {
        let mut solver = CoreSolver::new_with_config(config);
        let clauses = vec![vec![1, 2], vec![-1, 3], vec![-2, 3], vec![-3, 4]];
        add_clauses(&mut solver, &clauses);
        assert_eq!(solver.solve().unwrap(), Tristate::True);
        assert!(check_model(solver.model(), &clauses));
    }
}

#[test]
fn test_pigeon_hole_3_2() {
    for config in solver_configs() {
        let mut solver = CoreSolver::new_with_config(config);
        let clauses = pigeon_hole(3, 2);
        assert_eq!(clauses.len(), 9);
        add_clauses(&mut solver, &clauses);
        assert_eq!(solver.n_vars(), 6);
        assert_eq!(solver.solve().unwrap(), Tristate::False);
        assert!(solver.stats().conflicts > 0);
        assert!(solver.stats().starts >= 1);
    }
}

#[test]
fn test_pigeon_hole_5_4() {
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &pigeon_hole(5, 4));
    assert_eq!(solver.solve().unwrap(), Tristate::False);
    assert!(solver.stats().conflicts > 0);
}

#[test]
fn test_random_3sat_within_budget() {
    let mut solver = CoreSolver::new();
    let clauses = random_3sat(20, 80, 42);
    add_clauses(&mut solver, &clauses);
    solver.set_conf_budget(100_000);
    let result = solver.solve().unwrap();
    assert_ne!(result, Tristate::Undef);
    if result == Tristate::True {
        assert!(check_model(solver.model(), &clauses));
    }
}

#[test]
fn test_random_3sat_models_satisfy_all_clauses() {
    for seed in [7, 99, 1234] {
        let mut solver = CoreSolver::new();
        let clauses = random_3sat(15, 40, seed);
        add_clauses(&mut solver, &clauses);
        if solver.solve().unwrap() == Tristate::True {
            assert!(check_model(solver.model(), &clauses));
            assert_watch_consistency(&mut solver);
        }
    }
}

#[test]
fn test_conflict_budget_exhausted() {
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &pigeon_hole(4, 3));
    solver.set_conf_budget(0);
    assert_eq!(solver.solve().unwrap(), Tristate::Undef);
    // rewound to level 0, no partial assignment persists
    assert_eq!(solver.trail_lim.len(), 0);
    solver.budget_off();
    assert_eq!(solver.solve().unwrap(), Tristate::False);
}

#[test]
fn test_propagation_budget_exhausted() {
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &pigeon_hole(4, 3));
    solver.set_prop_budget(1);
    assert_eq!(solver.solve().unwrap(), Tristate::Undef);
}

#[test]
fn test_interrupt() {
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &pigeon_hole(4, 3));
    solver.interrupt();
    assert_eq!(solver.solve().unwrap(), Tristate::Undef);
    solver.clear_interrupt();
    assert_eq!(solver.solve().unwrap(), Tristate::False);
}

#[test]
fn test_proof_recorded_on_unsat() {
    let config = SolverConfig::default().with_proof_generation(true);
    let mut solver = CoreSolver::new_with_config(config);
    solver.add_clause_from_dimacs(&[1]);
    solver.add_clause_from_dimacs(&[-1]);
    assert_eq!(solver.solve().unwrap(), Tristate::False);
    assert!(!solver.proof().is_empty());
    assert_eq!(solver.proof().last().unwrap(), &vec![0]);
}

#[test]
fn test_proof_records_learnt_clauses() {
    let config = SolverConfig::default().with_proof_generation(true);
    let mut solver = CoreSolver::new_with_config(config);
    add_clauses(&mut solver, &pigeon_hole(3, 2));
    assert_eq!(solver.solve().unwrap(), Tristate::False);
    assert!(solver.proof().iter().any(|entry| entry.first() == Some(&1)));
    assert_eq!(solver.proof().last().unwrap(), &vec![0]);
}

#[test]
fn test_reduce_db_and_gc() {
    // aggressive reduction and collection thresholds to exercise both on
    // a small instance
    let low = LowLevelConfig::default()
        .with_first_reduce_db(5)
        .with_inc_reduce_db(5)
        .with_special_inc_reduce_db(5)
        .with_garbage_frac(0.0);
    let config = SolverConfig::default().with_low_level_config(low);
    let mut solver = CoreSolver::new_with_config(config);
    add_clauses(&mut solver, &pigeon_hole(5, 4));
    assert_eq!(solver.solve().unwrap(), Tristate::False);
    assert!(solver.stats().conflicts > 0);
}

#[test]
fn test_garbage_collect_keeps_references_valid() {
    let mut solver = CoreSolver::new();
    let clauses = vec![vec![1, 2, 3], vec![-1, 2, 4], vec![-2, -3, 4], vec![1, -4]];
    add_clauses(&mut solver, &clauses);
    solver.garbage_collect();
    assert_watch_consistency(&mut solver);
    assert_eq!(solver.solve().unwrap(), Tristate::True);
    assert!(check_model(solver.model(), &clauses));
}

#[test]
fn test_tautology_and_duplicates_dropped() {
    let mut solver = CoreSolver::new();
    // tautologous clause is dropped entirely
    assert!(solver.add_clause_from_dimacs(&[1, -1, 2]));
    assert_eq!(solver.n_clauses(), 0);
    // duplicate literals collapse
    assert!(solver.add_clause_from_dimacs(&[2, 2, 3]));
    assert_eq!(solver.n_clauses(), 1);
    assert_eq!(solver.solve().unwrap(), Tristate::True);
}

#[test]
fn test_level_zero_false_literals_dropped() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[-1]);
    // shrinks to the unit [2] and propagates immediately
    solver.add_clause_from_dimacs(&[1, 2]);
    assert_eq!(solver.solve().unwrap(), Tristate::True);
    let model = solver.model();
    assert!(!model[0]);
    assert!(model[1]);
}

#[test]
fn test_random_decisions() {
    let low = LowLevelConfig::default().with_random_var_freq(0.5);
    let config = SolverConfig::default().with_low_level_config(low);
    let mut solver = CoreSolver::new_with_config(config);
    let clauses = random_3sat(15, 40, 3);
    add_clauses(&mut solver, &clauses);
    let result = solver.solve().unwrap();
    assert_ne!(result, Tristate::Undef);
    if result == Tristate::True {
        assert!(check_model(solver.model(), &clauses));
    }
}

#[test]
fn test_purgatory_promotion() {
    use crate::solver::{mk_lit, Var};

    let low = LowLevelConfig::default().with_use_unary_watches(true);
    let config = SolverConfig::default().with_low_level_config(low);
    let mut solver = CoreSolver::new_with_config(config);
    solver.ensure_vars(3);
    // one-watched clause (x1 | x2 | x3) in the purgatory; default phases
    // drive all three variables to false, so it must conflict and graduate
    solver.add_imported_clause(vec![mk_lit(Var(0), false), mk_lit(Var(1), false), mk_lit(Var(2), false)], 2);
    assert_eq!(solver.solve().unwrap(), Tristate::True);
    assert!(solver.stats().nb_promoted >= 1);
    assert!(solver.model().iter().any(|&b| b));
}

#[test]
fn test_incremental_with_proof_rejected() {
    let config = SolverConfig::default().with_incremental(true).with_proof_generation(true);
    let mut solver = CoreSolver::new_with_config(config);
    solver.add_clause_from_dimacs(&[1]);
    assert!(solver.solve().is_err());
}
