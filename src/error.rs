use thiserror::Error;

/// Errors surfaced by the solver API and the input-file readers.
///
/// Internal invariant violations (watch-list desynchronization, stale
/// clause references) are bugs, not errors, and are guarded by
/// assertions instead.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A required input file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file was readable but malformed.
    #[error("malformed {kind} file, line {line}: {message}")]
    MalformedInput {
        /// Which file kind was being parsed (`"cnf"`, `"community"`, `"centrality"`).
        kind: &'static str,
        /// 1-based line number of the offending line.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// Incremental mode and proof generation cannot be combined.
    #[error("incremental mode and proof generation cannot be enabled together")]
    IncrementalWithProof,
}
