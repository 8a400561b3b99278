use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::error::SolverError;
use crate::solver::CoreSolver;

/// A CNF formula read from a DIMACS file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimacsFormula {
    /// Number of variables, from the problem line or the largest literal.
    pub num_vars: usize,
    /// Clauses as non-zero signed 1-based literals.
    pub clauses: Vec<Vec<isize>>,
}

/// Reads a DIMACS CNF file.
///
/// Every clause must be on its own line and end with `0`. Comment lines
/// start with `c`; a `p cnf <vars> <clauses>` problem line is honored but
/// not required, the variable count also grows with the literals seen.
pub fn read_cnf(file_path: &Path) -> Result<DimacsFormula, SolverError> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let separator = Regex::new(r"[ \t]+").unwrap();

    let mut num_vars = 0_usize;
    let mut clauses = Vec::new();
    for (index, l) in reader.lines().enumerate() {
        let line = l?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('p') {
            let fields: Vec<&str> = separator.split(trimmed).collect();
            num_vars = fields.get(2).and_then(|s| s.parse().ok()).ok_or_else(|| SolverError::MalformedInput {
                kind: "cnf",
                line: index + 1,
                message: format!("invalid problem line '{trimmed}'"),
            })?;
            continue;
        }
        let mut clause = Vec::new();
        let mut terminated = false;
        for token in separator.split(trimmed) {
            let lit: isize = token.parse().map_err(|_| SolverError::MalformedInput {
                kind: "cnf",
                line: index + 1,
                message: format!("invalid literal '{token}'"),
            })?;
            if lit == 0 {
                terminated = true;
                break;
            }
            num_vars = num_vars.max(lit.unsigned_abs());
            clause.push(lit);
        }
        if !terminated {
            return Err(SolverError::MalformedInput { kind: "cnf", line: index + 1, message: "clause not terminated by 0".to_string() });
        }
        clauses.push(clause);
    }
    Ok(DimacsFormula { num_vars, clauses })
}

/// Reads a DIMACS CNF file and adds its clauses to the solver. Returns
/// `false` when the clauses are already contradictory at level 0.
pub fn load_cnf(file_path: &Path, solver: &mut CoreSolver) -> Result<bool, SolverError> {
    let formula = read_cnf(file_path)?;
    solver.ensure_vars(formula.num_vars);
    for clause in &formula.clauses {
        solver.add_clause_from_dimacs(clause);
    }
    Ok(solver.ok())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::read_cnf;

    #[test]
    fn test_read_cnf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "c example").unwrap();
        writeln!(file, "p cnf 5 3").unwrap();
        writeln!(file, "-4 1 3 0").unwrap();
        writeln!(file, "2 -1 5 4 0").unwrap();
        writeln!(file, "-3 0").unwrap();
        let formula = read_cnf(file.path()).unwrap();
        assert_eq!(formula.num_vars, 5);
        assert_eq!(formula.clauses, vec![vec![-4, 1, 3], vec![2, -1, 5, 4], vec![-3]]);
    }

    #[test]
    fn test_unterminated_clause() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 2").unwrap();
        assert!(read_cnf(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(read_cnf(std::path::Path::new("does/not/exist.cnf")).is_err());
    }

    #[test]
    fn test_load_cnf_into_solver() {
        use crate::solver::{CoreSolver, Tristate};

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "p cnf 2 2").unwrap();
        writeln!(file, "1 2 0").unwrap();
        writeln!(file, "-1 0").unwrap();
        let mut solver = CoreSolver::new();
        assert!(super::load_cnf(file.path(), &mut solver).unwrap());
        assert_eq!(solver.solve().unwrap(), Tristate::True);
        assert!(!solver.model()[0]);
        assert!(solver.model()[1]);
    }
}
