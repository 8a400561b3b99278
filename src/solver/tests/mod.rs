use super::datastructures::not;
use super::{ClauseMinimization, CoreSolver, SolverConfig};

mod assume_tests;
mod sat_tests;

/// Configurations covering the clause-minimization modes and both
/// initial phases.
fn solver_configs() -> Vec<SolverConfig> {
    let mut configs = Vec::new();
    for minimization in [ClauseMinimization::None, ClauseMinimization::Basic, ClauseMinimization::Deep] {
        for initial_phase in [false, true] {
            configs.push(SolverConfig::default().with_clause_minimization(minimization).with_initial_phase(initial_phase));
        }
    }
    configs
}

fn add_clauses(solver: &mut CoreSolver, clauses: &[Vec<isize>]) {
    for clause in clauses {
        solver.add_clause_from_dimacs(clause);
    }
}

/// PHP(pigeons, holes): variable `p * holes + h + 1` says pigeon `p`
/// sits in hole `h`. Unsatisfiable whenever `pigeons > holes`.
fn pigeon_hole(pigeons: usize, holes: usize) -> Vec<Vec<isize>> {
    let lit = |p: usize, h: usize| (p * holes + h + 1) as isize;
    let mut clauses = Vec::new();
    for p in 0..pigeons {
        clauses.push((0..holes).map(|h| lit(p, h)).collect());
    }
    for h in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                clauses.push(vec![-lit(p1, h), -lit(p2, h)]);
            }
        }
    }
    clauses
}

fn random_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> Vec<Vec<isize>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut clauses = Vec::with_capacity(num_clauses);
    for _ in 0..num_clauses {
        let mut vars: Vec<usize> = Vec::with_capacity(3);
        while vars.len() < 3 {
            let v = rng.usize(1..=num_vars);
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
        clauses.push(vars.into_iter().map(|v| if rng.bool() { v as isize } else { -(v as isize) }).collect());
    }
    clauses
}

fn check_model(model: &[bool], clauses: &[Vec<isize>]) -> bool {
    clauses.iter().all(|clause| {
        clause.iter().any(|&l| {
            let v = l.unsigned_abs() - 1;
            if l > 0 {
                model[v]
            } else {
                !model[v]
            }
        })
    })
}

/// Every attached clause must appear exactly once in the watch list of
/// each of its two watched literals.
fn assert_watch_consistency(solver: &mut CoreSolver) {
    solver.watches.clean_all(&solver.arena);
    solver.watches_bin.clean_all(&solver.arena);
    for i in 0..solver.clauses.len() + solver.learnts.len() {
        let cref = if i < solver.clauses.len() { solver.clauses[i] } else { solver.learnts[i - solver.clauses.len()] };
        let c = solver.arena.get(cref);
        assert!(!c.deleted, "clause lists must not contain tombstones");
        let lists = if c.len() == 2 { &solver.watches_bin } else { &solver.watches };
        for &watched in &[c.get(0), c.get(1)] {
            let count = lists.get(not(watched)).iter().filter(|w| w.clause_ref == cref).count();
            assert_eq!(count, 1, "each watched literal must carry exactly one watcher for the clause");
        }
    }
}
