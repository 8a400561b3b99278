use super::core_solver::CoreSolver;
use super::datastructures::{ClauseRef, Lit};

/// Hook points for parallel clause exchange.
///
/// The core calls these at fixed program points of the search loop; the
/// default implementations do nothing, which yields the plain sequential
/// solver. A parallel driver implements this trait to inject and collect
/// clauses without the core depending on any concrete driver type.
pub trait ParallelHooks {
    /// Called at decision level 0 before propagation; may enqueue
    /// imported unit clauses.
    fn import_unary_clauses(&mut self, _solver: &mut CoreSolver) {}

    /// Called at decision level 0 after unit import; returns `true` if an
    /// imported clause made the formula unsatisfiable.
    fn import_clauses(&mut self, _solver: &mut CoreSolver) -> bool {
        false
    }

    /// Called for every learned unit clause.
    fn export_unary_clause(&mut self, _lit: Lit) {}

    /// Called for every installed learned clause.
    fn export_clause_during_search(&mut self, _solver: &CoreSolver, _clause: ClauseRef) {}

    /// Called for every learned clause traversed during conflict analysis.
    fn import_clause_during_analysis(&mut self, _solver: &mut CoreSolver, _clause: ClauseRef) {}

    /// Returns `true` when another worker finished the job and this
    /// search should stop with an undetermined result.
    fn job_finished(&self) -> bool {
        false
    }

    /// While `true`, the reducer keeps the clause-database growth limit
    /// fixed instead of relaxing it after each pass.
    fn panic_mode(&self) -> bool {
        false
    }
}

/// The no-op hook set used by the sequential solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl ParallelHooks for NoHooks {}
