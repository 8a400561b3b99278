use crate::solver::{mk_lit, not, CoreSolver, SolverConfig, Tristate, Var};

use super::add_clauses;

#[test]
fn test_assumption_sat() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[1, 2]);
    let result = solver.solve_with_assumptions(vec![mk_lit(Var(0), true)]).unwrap();
    assert_eq!(result, Tristate::True);
    assert!(!solver.model()[0]);
    assert!(solver.model()[1]);
    // the solver stays usable without the assumption
    assert_eq!(solver.solve().unwrap(), Tristate::True);
}

#[test]
fn test_assumption_conflicts_with_unit() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[1]);
    let result = solver.solve_with_assumptions(vec![mk_lit(Var(0), true)]).unwrap();
    assert_eq!(result, Tristate::False);
    assert_eq!(solver.final_conflict(), &[mk_lit(Var(0), false)]);
    // the formula itself is still satisfiable
    assert!(solver.ok());
    assert_eq!(solver.solve().unwrap(), Tristate::True);
}

#[test]
fn test_assumption_conflict_set() {
    let mut solver = CoreSolver::new();
    // 1 -> 2 -> 3
    add_clauses(&mut solver, &[vec![-1, 2], vec![-2, 3]]);
    let assumptions = vec![mk_lit(Var(0), false), mk_lit(Var(2), true)];
    let result = solver.solve_with_assumptions(assumptions).unwrap();
    assert_eq!(result, Tristate::False);
    let conflict = solver.final_conflict();
    assert!(conflict.contains(&mk_lit(Var(2), false)));
    assert!(conflict.contains(&not(mk_lit(Var(0), false))));
}

#[test]
fn test_conflicting_assumptions() {
    let mut solver = CoreSolver::new();
    solver.add_clause_from_dimacs(&[1, 2]);
    let assumptions = vec![mk_lit(Var(0), false), mk_lit(Var(0), true)];
    assert_eq!(solver.solve_with_assumptions(assumptions).unwrap(), Tristate::False);
    assert!(!solver.final_conflict().is_empty());
}

#[test]
fn test_incremental_selectors() {
    let config = SolverConfig::default().with_incremental(true);
    let mut solver = CoreSolver::new_with_config(config);
    // three problem variables, then a selector guarding (1 | 2)
    solver.ensure_vars(3);
    solver.set_initial_var_count(3);
    let selector = solver.new_var(true, true);
    solver.add_clause(vec![not(mk_lit(selector, false)), mk_lit(Var(0), false), mk_lit(Var(1), false)]);
    solver.add_clause(vec![mk_lit(Var(0), true), mk_lit(Var(2), false)]);

    // selector on: the guarded clause is active
    let result = solver.solve_with_assumptions(vec![mk_lit(selector, false)]).unwrap();
    assert_eq!(result, Tristate::True);
    assert!(solver.model()[0] || solver.model()[1]);

    // selector off: the guarded clause is void
    let result = solver.solve_with_assumptions(vec![mk_lit(selector, true)]).unwrap();
    assert_eq!(result, Tristate::True);
}

#[test]
fn test_assumptions_repeated_calls() {
    let mut solver = CoreSolver::new();
    add_clauses(&mut solver, &[vec![1, 2], vec![-1, 3]]);
    for _ in 0..3 {
        assert_eq!(solver.solve_with_assumptions(vec![mk_lit(Var(0), false)]).unwrap(), Tristate::True);
        assert!(solver.model()[0]);
        assert!(solver.model()[2]);
        assert_eq!(solver.solve_with_assumptions(vec![mk_lit(Var(0), true)]).unwrap(), Tristate::True);
        assert!(!solver.model()[0]);
        assert!(solver.model()[1]);
    }
}
