use super::core_solver::CoreSolver;
use super::datastructures::{not, var, ClauseRef, Lit, Tristate, Watcher};

impl CoreSolver {
    /// Propagates all enqueued facts. If a conflict arises the
    /// conflicting clause is returned; in that case `qhead` is advanced
    /// to the trail end so the propagation queue is empty either way.
    ///
    /// Binary implications of a literal are processed before its
    /// long-clause watchers, which in turn come before the purgatory.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn propagate(&mut self) -> Option<ClauseRef> {
        let mut confl: Option<ClauseRef> = None;
        let mut num_props: u64 = 0;
        self.watches.clean_all(&self.arena);
        self.watches_bin.clean_all(&self.arena);
        self.unary_watches.clean_all(&self.arena);
        'outer: while self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            num_props += 1;

            // binary fast path
            for k in 0..self.watches_bin.get(p).len() {
                let watcher_bin = self.watches_bin.get(p)[k];
                let imp = watcher_bin.blocker;
                match self.value(imp) {
                    Tristate::False => {
                        confl = Some(watcher_bin.clause_ref);
                        self.qhead = self.trail.len();
                        break 'outer;
                    }
                    Tristate::Undef => self.unchecked_enqueue(imp, Some(watcher_bin.clause_ref)),
                    Tristate::True => {}
                }
            }

            // two-watched long clauses, compacting the list in place
            let mut i_ind = 0;
            let mut j_ind = 0;
            while i_ind < self.watches.get(p).len() {
                let watcher = self.watches.get(p)[i_ind];
                let blocker = watcher.blocker;
                if self.value(blocker) == Tristate::True {
                    self.watches.get_mut(p)[j_ind] = watcher;
                    j_ind += 1;
                    i_ind += 1;
                    continue;
                }
                let c_ref = watcher.clause_ref;
                let false_lit = not(p);
                if self.c(c_ref).get(0) == false_lit {
                    self.c_mut(c_ref).swap(0, 1);
                }
                debug_assert_eq!(self.c(c_ref).get(1), false_lit);
                i_ind += 1;

                let first = self.c(c_ref).get(0);
                if first != blocker && self.value(first) == Tristate::True {
                    self.watches.get_mut(p)[j_ind] = Watcher { clause_ref: c_ref, blocker: first };
                    j_ind += 1;
                    continue;
                }

                let mut found_watch = false;
                for k in 2..self.c(c_ref).len() {
                    let k_lit = self.c(c_ref).get(k);
                    if self.value(k_lit) != Tristate::False {
                        self.c_mut(c_ref).set(1, k_lit);
                        self.c_mut(c_ref).set(k, false_lit);
                        self.watches.push(not(k_lit), Watcher { clause_ref: c_ref, blocker: first });
                        found_watch = true;
                        break;
                    }
                }
                if !found_watch {
                    // clause is unit or conflicting under the current assignment
                    self.watches.get_mut(p)[j_ind] = Watcher { clause_ref: c_ref, blocker: first };
                    j_ind += 1;
                    if self.value(first) == Tristate::False {
                        confl = Some(c_ref);
                        self.qhead = self.trail.len();
                        while i_ind < self.watches.get(p).len() {
                            self.watches.get_mut(p).swap(j_ind, i_ind);
                            j_ind += 1;
                            i_ind += 1;
                        }
                    } else {
                        self.unchecked_enqueue(first, Some(c_ref));
                    }
                }
            }
            self.watches.get_mut(p).truncate(j_ind);

            if self.config.low_level_config().use_unary_watches() && confl.is_none() {
                confl = self.propagate_unary_watches(p);
            }
        }

        self.stats.propagations += num_props;
        self.simp_db_props -= i64::try_from(num_props).unwrap_or(i64::MAX);
        confl
    }

    /// Propagates the one-watched clauses of the purgatory. A falsified
    /// purgatory clause is returned as a conflict and, if promotion is
    /// enabled, graduated into a regular two-watched clause.
    fn propagate_unary_watches(&mut self, p: Lit) -> Option<ClauseRef> {
        let mut confl: Option<ClauseRef> = None;
        let mut i_ind = 0;
        let mut j_ind = 0;
        while i_ind < self.unary_watches.get(p).len() {
            let watcher = self.unary_watches.get(p)[i_ind];
            if self.value(watcher.blocker) == Tristate::True {
                self.unary_watches.get_mut(p)[j_ind] = watcher;
                j_ind += 1;
                i_ind += 1;
                continue;
            }
            let c_ref = watcher.clause_ref;
            let false_lit = not(p);
            debug_assert!(self.c(c_ref).one_watched);
            debug_assert_eq!(self.c(c_ref).get(0), false_lit);
            i_ind += 1;

            let mut found_watch = false;
            for k in 1..self.c(c_ref).len() {
                let k_lit = self.c(c_ref).get(k);
                if self.value(k_lit) != Tristate::False {
                    self.c_mut(c_ref).set(0, k_lit);
                    self.c_mut(c_ref).set(k, false_lit);
                    self.unary_watches.push(not(k_lit), Watcher { clause_ref: c_ref, blocker: false_lit });
                    found_watch = true;
                    break;
                }
            }
            if !found_watch {
                // clause is falsified under the current assignment
                confl = Some(c_ref);
                self.qhead = self.trail.len();
                let promote = self.config.low_level_config().promote_one_watched();
                if !promote {
                    self.unary_watches.get_mut(p)[j_ind] = Watcher { clause_ref: c_ref, blocker: false_lit };
                    j_ind += 1;
                }
                while i_ind < self.unary_watches.get(p).len() {
                    self.unary_watches.get_mut(p).swap(j_ind, i_ind);
                    j_ind += 1;
                    i_ind += 1;
                }
                if promote {
                    self.unary_watches.get_mut(p).truncate(j_ind);
                    self.promote_one_watched_clause(c_ref);
                    return confl;
                }
            }
        }
        self.unary_watches.get_mut(p).truncate(j_ind);
        confl
    }

    /// Graduates a conflicting purgatory clause to the regular database:
    /// the two deepest-level literals move to the watched positions and
    /// the clause is attached two-watched. The purgatory watcher has
    /// already been dropped by the caller.
    fn promote_one_watched_clause(&mut self, c_ref: ClauseRef) {
        self.stats.nb_promoted += 1;
        let mut max_level = 0;
        let mut index = 1;
        for k in 1..self.c(c_ref).len() {
            let k_lit = self.c(c_ref).get(k);
            debug_assert_eq!(self.value(k_lit), Tristate::False);
            let level = self.vars[var(k_lit).0].level.unwrap_or(0);
            if level >= max_level {
                index = k;
                max_level = level;
            }
        }
        self.c_mut(c_ref).swap(1, index);
        self.c_mut(c_ref).one_watched = false;
        self.attach_clause(c_ref);
    }
}
