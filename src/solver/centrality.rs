use std::cmp::Ordering;
use std::path::Path;

use tracing::info;

use crate::error::SolverError;

use super::core_solver::CoreSolver;
use super::datastructures::var;

/// Aggregated per-community data derived from the community and
/// centrality input files.
#[derive(Clone, Debug, Default)]
pub struct CommunityStructure {
    /// Number of variables per community (0-based community ids).
    pub sizes: Vec<usize>,
    /// Number of bridge variables per community.
    pub bridges: Vec<usize>,
    /// Centrality score per community, indexed by the 1-based ids of the
    /// centrality file.
    pub scores: Vec<f64>,
    /// Decisions taken on variables of each community.
    pub decisions: Vec<u64>,
    /// True once `init_centrality` ran.
    pub loaded: bool,
}

impl CoreSolver {
    /// Reads the community and centrality files and installs the
    /// heuristic tables. Both files are required; a missing or malformed
    /// file is a fatal error.
    pub fn init_centrality_from_files(&mut self, community_file: &Path, centrality_file: &Path) -> Result<(), SolverError> {
        let assignment = crate::io::read_communities(community_file)?;
        let scores = crate::io::read_centrality(centrality_file)?;
        self.init_centrality(&assignment, &scores);
        Ok(())
    }

    /// Installs the community partition and the per-community centrality
    /// scores, then derives the per-variable heuristic flags. Call after
    /// all original clauses have been added and before solving.
    ///
    /// `assignment` holds `(variable, community)` pairs with 0-based
    /// community ids; `scores` holds `(community, score)` pairs with
    /// 1-based community ids, as produced by the centrality tool. The
    /// projection below shifts by one to align the two conventions.
    pub fn init_centrality(&mut self, assignment: &[(usize, usize)], scores: &[(usize, f64)]) {
        let n = self.n_vars();
        let max_community = assignment.iter().map(|&(_, c)| c).max().map_or(0, |c| c + 1);
        let mut sizes = vec![0_usize; max_community];
        for &(v, community) in assignment {
            if v < n {
                self.vars[v].community = community;
                sizes[community] += 1;
            }
        }

        // a variable is a bridge when it shares a clause with a variable of
        // another community
        let mut community_bridges = vec![0_usize; max_community];
        for ci in 0..self.clauses.len() {
            let c_ref = self.clauses[ci];
            let len = self.c(c_ref).len();
            for j in 0..len {
                let var_j = var(self.c(c_ref).get(j));
                for k in (j + 1)..len {
                    let var_k = var(self.c(c_ref).get(k));
                    if self.vars[var_j.0].community != self.vars[var_k.0].community {
                        if !self.vars[var_j.0].bridge {
                            community_bridges[self.vars[var_j.0].community] += 1;
                        }
                        if !self.vars[var_k.0].bridge {
                            community_bridges[self.vars[var_k.0].community] += 1;
                        }
                        self.vars[var_j.0].bridge = true;
                        self.vars[var_k.0].bridge = true;
                        self.vars[var_j.0].num_bridges += 1;
                        self.vars[var_k.0].num_bridges += 1;
                    }
                }
            }
        }

        // centrality table keyed by the 1-based file ids; the community file
        // numbers communities from 0, the centrality file from 1
        let max_file_id = scores.iter().map(|&(c, _)| c).max().unwrap_or(0);
        let mut table = vec![0.0_f64; max_file_id + 1];
        for &(c, score) in scores {
            table[c] = score;
        }
        for v in 0..n {
            let file_id = self.vars[v].community + 1;
            self.vars[v].centrality = table.get(file_id).copied().unwrap_or(0.0);
        }

        // the top tercile by centrality becomes the preferentially bumped set
        let mut by_score: Vec<usize> = (0..n).collect();
        by_score.sort_by(|&a, &b| self.vars[a].centrality.partial_cmp(&self.vars[b].centrality).unwrap_or(Ordering::Equal));
        for &v in &by_score[n - n / 3..] {
            self.vars[v].high_centrality = true;
        }

        let n_bridges = self.vars.iter().filter(|v| v.bridge).count();
        let n_highcenter = self.vars.iter().filter(|v| v.high_centrality).count();
        let n_mutual = self.vars.iter().filter(|v| v.high_centrality && v.bridge).count();
        info!(
            variables = n,
            bridges = n_bridges,
            highcenters = n_highcenter,
            bridge_highcenters = n_mutual,
            "community structure initialized"
        );

        self.communities =
            CommunityStructure { sizes, bridges: community_bridges, scores: table, decisions: vec![0; max_community], loaded: true };
    }

    /// Per-community aggregates (sizes, bridge counts, scores, decisions).
    pub const fn communities(&self) -> &CommunityStructure {
        &self.communities
    }
}
