use tracing::debug;

use super::core_solver::CoreSolver;
use super::datastructures::{mk_lit, var, ClauseArena, Var};

impl CoreSolver {
    /// Runs a collection when the wasted fraction of the arena exceeds
    /// the configured threshold.
    pub(crate) fn check_garbage(&mut self) {
        if self.arena.wasted() as f64 > self.arena.size() as f64 * self.config.low_level_config().garbage_frac() {
            self.garbage_collect();
        }
    }

    /// Relocates every live clause into a fresh arena and swaps the
    /// arenas. Must only run at decision level 0 or from `reduce_db` /
    /// `simplify` right after deletions, never concurrently with
    /// propagation.
    pub fn garbage_collect(&mut self) {
        let mut to = ClauseArena::with_capacity(self.arena.size() - self.arena.wasted());
        self.reloc_all(&mut to);
        debug!(before = self.arena.size(), after = to.size(), "garbage collection");
        self.arena = to;
    }

    fn reloc_all(&mut self, to: &mut ClauseArena) {
        self.watches.clean_all(&self.arena);
        self.watches_bin.clean_all(&self.arena);
        self.unary_watches.clean_all(&self.arena);

        // all watchers
        for v in 0..self.n_vars() {
            for s in 0..2 {
                let p = mk_lit(Var(v), s == 1);
                for i in 0..self.watches.get(p).len() {
                    let old = self.watches.get(p)[i].clause_ref;
                    let moved = self.arena.reloc(old, to);
                    self.watches.get_mut(p)[i].clause_ref = moved;
                }
                for i in 0..self.watches_bin.get(p).len() {
                    let old = self.watches_bin.get(p)[i].clause_ref;
                    let moved = self.arena.reloc(old, to);
                    self.watches_bin.get_mut(p)[i].clause_ref = moved;
                }
                for i in 0..self.unary_watches.get(p).len() {
                    let old = self.unary_watches.get(p)[i].clause_ref;
                    let moved = self.arena.reloc(old, to);
                    self.unary_watches.get_mut(p)[i].clause_ref = moved;
                }
            }
        }

        // all reasons still referenced from the trail
        for i in 0..self.trail.len() {
            let v = var(self.trail[i]);
            if let Some(reason) = self.vars[v.0].reason {
                if self.arena.get(reason).forward.is_some() || self.locked(reason) {
                    let moved = self.arena.reloc(reason, to);
                    self.vars[v.0].reason = Some(moved);
                }
            }
        }

        for i in 0..self.learnts.len() {
            let old = self.learnts[i];
            self.learnts[i] = self.arena.reloc(old, to);
        }
        for i in 0..self.clauses.len() {
            let old = self.clauses[i];
            self.clauses[i] = self.arena.reloc(old, to);
        }
        for i in 0..self.unary_watched_clauses.len() {
            let old = self.unary_watched_clauses[i];
            self.unary_watched_clauses[i] = self.arena.reloc(old, to);
        }
    }
}
