//! A community-aware CDCL SAT solver core in the Glucose lineage.
//!
//! The solver decides satisfiability of CNF formulas with the classic
//! conflict-driven clause learning loop: two-watched-literal propagation,
//! First-UIP conflict analysis with LBD measurement, LBD-driven clause
//! database reduction, and dynamic restarts based on moving averages of
//! LBD and trail length.
//!
//! On top of the Glucose machinery sits a community-aware branching
//! modifier: given a partition of the variables into communities and a
//! per-community betweenness-centrality score, variables in the most
//! central communities receive inflated activity bumps during the early
//! phase of the search.
//!
//! ```
//! use centrisat::solver::{CoreSolver, Tristate};
//!
//! let mut solver = CoreSolver::new();
//! solver.add_clause_from_dimacs(&[1, 2]);
//! solver.add_clause_from_dimacs(&[-1]);
//! assert_eq!(solver.solve().unwrap(), Tristate::True);
//! assert!(solver.model()[1]);
//! ```
#![warn(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

mod collections;
/// Error types reported by the solver and the file readers.
pub mod error;
/// Readers for DIMACS CNF, community, and centrality files.
pub mod io;
/// The CDCL solver core.
pub mod solver;

pub use error::SolverError;
