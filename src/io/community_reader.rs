use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SolverError;

/// Reads a community file: one `<variable> <community>` pair per line,
/// both 0-based.
pub fn read_communities(file_path: &Path) -> Result<Vec<(usize, usize)>, SolverError> {
    read_pairs(file_path, "community", |token| token.parse::<usize>().ok())
}

/// Reads a centrality file: one `<community> <score>` pair per line.
/// Community ids in this file are 1-based; the solver shifts them when
/// projecting scores onto variables.
pub fn read_centrality(file_path: &Path) -> Result<Vec<(usize, f64)>, SolverError> {
    read_pairs(file_path, "centrality", |token| token.parse::<f64>().ok())
}

fn read_pairs<T>(file_path: &Path, kind: &'static str, parse_second: impl Fn(&str) -> Option<T>) -> Result<Vec<(usize, T)>, SolverError> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let mut pairs = Vec::new();
    for (index, l) in reader.lines().enumerate() {
        let line = l?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let malformed = || SolverError::MalformedInput { kind, line: index + 1, message: format!("expected two fields, got '{trimmed}'") };
        let mut fields = trimmed.split_whitespace();
        let first: usize = fields.next().and_then(|t| t.parse().ok()).ok_or_else(malformed)?;
        let second = fields.next().and_then(|t| parse_second(t)).ok_or_else(malformed)?;
        if fields.next().is_some() {
            return Err(malformed());
        }
        pairs.push((first, second));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{read_centrality, read_communities};

    #[test]
    fn test_read_communities() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0").unwrap();
        writeln!(file, "1 0").unwrap();
        writeln!(file, "2 1").unwrap();
        assert_eq!(read_communities(file.path()).unwrap(), vec![(0, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn test_read_centrality() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 0.75").unwrap();
        writeln!(file, "2 0.5").unwrap();
        let scores = read_centrality(file.path()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].0, 1);
        assert!((scores[0].1 - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 zero").unwrap();
        assert!(read_communities(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(read_communities(std::path::Path::new("does/not/exist.cmty")).is_err());
    }
}
