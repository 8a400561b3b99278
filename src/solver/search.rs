use std::cmp::{min, Ordering};
use std::mem;

use tracing::debug;

use crate::error::SolverError;

use super::core_solver::{dimacs_lit, CoreSolver, LB_BLOCKING_RESTART, RATIO_REMOVE_CLAUSES};
use super::datastructures::{mk_lit, not, var, Clause, Lit, Tristate, Var};
use super::hooks::{NoHooks, ParallelHooks};

impl CoreSolver {
    /// Decides satisfiability of the clauses on this solver.
    pub fn solve(&mut self) -> Result<Tristate, SolverError> {
        self.solve_with_hooks(&mut NoHooks)
    }

    /// Decides satisfiability under the given assumptions. On an
    /// unsatisfiable outcome caused by the assumptions, the final
    /// conflict is available via [`final_conflict`](Self::final_conflict).
    pub fn solve_with_assumptions(&mut self, assumptions: Vec<Lit>) -> Result<Tristate, SolverError> {
        self.assumptions = assumptions;
        let result = self.solve_with_hooks(&mut NoHooks);
        self.assumptions.clear();
        result
    }

    /// Decides satisfiability with a custom set of parallel hooks.
    ///
    /// Returns `Undef` when a budget ran out, the interrupt flag was set,
    /// or a hook reported the job as finished elsewhere. The assignment
    /// is rewound to level 0 in every case.
    pub fn solve_with_hooks(&mut self, hooks: &mut dyn ParallelHooks) -> Result<Tristate, SolverError> {
        if self.config.incremental() && self.config.proof_generation() {
            return Err(SolverError::IncrementalWithProof);
        }
        self.model.clear();
        self.conflict.clear();
        if !self.ok {
            return Ok(Tristate::False);
        }

        let mut status = Tristate::Undef;
        while status == Tristate::Undef {
            status = self.search(hooks);
            if !self.within_budget() {
                break;
            }
        }

        if self.config.proof_generation() && status == Tristate::False && self.conflict.is_empty() {
            self.proof.push(vec![0]);
        }
        if status == Tristate::True {
            self.model = self.vars.iter().map(|v| v.assignment == Tristate::True).collect();
        } else if status == Tristate::False && self.conflict.is_empty() {
            self.ok = false;
        }
        self.cancel_until(0);
        Ok(status)
    }

    /// One run of the CDCL loop, ending at a restart (`Undef`), a model
    /// (`True`), or an unsatisfiability proof (`False`).
    #[allow(clippy::too_many_lines)]
    pub(crate) fn search(&mut self, hooks: &mut dyn ParallelHooks) -> Tristate {
        debug_assert!(self.ok);
        self.stats.starts += 1;
        let mut blocked = false;
        loop {
            if self.decision_level() == 0 {
                hooks.import_unary_clauses(self);
                if hooks.import_clauses(self) {
                    return Tristate::False;
                }
            }
            if let Some(confl) = self.propagate() {
                if hooks.job_finished() {
                    return Tristate::Undef;
                }
                self.stats.sum_decision_levels += self.decision_level() as u64;
                self.stats.conflicts += 1;
                self.stats.conflicts_restarts += 1;
                if self.stats.conflicts % 5000 == 0 && self.var_decay < self.config.low_level_config().max_var_decay() {
                    self.var_decay += 0.01;
                }
                if self.decision_level() == 0 {
                    return Tristate::False;
                }
                self.trail_queue.push(self.trail.len());
                // block the restart while the search is deep in an assignment
                // that looks close to a model
                if self.stats.conflicts_restarts > LB_BLOCKING_RESTART
                    && self.lbd_queue.valid()
                    && self.trail.len() as f64 > self.config.low_level_config().factor_r() * self.trail_queue.avg() as f64
                {
                    self.lbd_queue.fast_clear();
                    self.stats.nb_stops_restarts += 1;
                    if !blocked {
                        blocked = true;
                        debug!(conflicts = self.stats.conflicts, "restart blocked");
                    }
                }
                let learnt_clause = self.analyze(confl, hooks);
                self.lbd_queue.push(self.analyze_lbd);
                self.sum_lbd += self.analyze_lbd as u64;
                self.cancel_until(self.analyze_bt_level);

                if self.config.proof_generation() {
                    let mut add = Vec::with_capacity(learnt_clause.len() + 1);
                    add.push(1);
                    add.extend(learnt_clause.iter().map(|&l| dimacs_lit(l)));
                    self.proof.push(add);
                }

                if learnt_clause.len() == 1 {
                    let learnt_lit = learnt_clause[0];
                    self.unchecked_enqueue(learnt_lit, None);
                    self.stats.nb_un += 1;
                    hooks.export_unary_clause(learnt_lit);
                } else {
                    let queue_lit = learnt_clause[0];
                    let size_without_selectors = self.analyze_sz_without_selectors;
                    let cref = self.arena.alloc(learnt_clause, true);
                    let clause = self.arena.get_mut(cref);
                    clause.lbd = self.analyze_lbd;
                    clause.one_watched = false;
                    clause.size_without_selectors = size_without_selectors;
                    if self.analyze_lbd <= 2 {
                        self.stats.nb_dl2 += 1;
                    }
                    if self.c(cref).len() == 2 {
                        self.stats.nb_bin += 1;
                    }
                    self.learnts.push(cref);
                    self.attach_clause(cref);
                    hooks.export_clause_during_search(self, cref);
                    self.cla_bump_activity(cref);
                    self.unchecked_enqueue(queue_lit, Some(cref));
                }
                self.var_decay_activities();
                self.cla_decay_activities();
            } else {
                // dynamic restart when the short-term LBD average degrades
                // against the long-term one
                if self.lbd_queue.valid()
                    && self.lbd_queue.avg() as f64 * self.config.low_level_config().factor_k()
                        > self.sum_lbd as f64 / self.stats.conflicts_restarts as f64
                {
                    self.lbd_queue.fast_clear();
                    debug!(conflicts = self.stats.conflicts, progress = self.progress_estimate(), "restart");
                    let bt = if self.config.incremental() { min(self.decision_level(), self.assumptions.len()) } else { 0 };
                    self.cancel_until(bt);
                    return Tristate::Undef;
                }
                if !self.within_budget() {
                    self.cancel_until(0);
                    return Tristate::Undef;
                }
                if self.decision_level() == 0 && !self.simplify() {
                    return Tristate::False;
                }
                if self.stats.conflicts >= (self.cur_restart * self.nb_clauses_before_reduce) as u64 && !self.learnts.is_empty() {
                    self.cur_restart = usize::try_from(self.stats.conflicts).unwrap_or(usize::MAX) / self.nb_clauses_before_reduce + 1;
                    self.reduce_db();
                    if !hooks.panic_mode() {
                        self.nb_clauses_before_reduce += self.config.low_level_config().inc_reduce_db();
                    }
                }

                let mut next = Lit::UNDEF;
                while self.decision_level() < self.assumptions.len() {
                    let p = self.assumptions[self.decision_level()];
                    match self.value(p) {
                        // dummy decision level
                        Tristate::True => self.trail_lim.push(self.trail.len()),
                        Tristate::False => {
                            self.analyze_final(not(p));
                            return Tristate::False;
                        }
                        Tristate::Undef => {
                            next = p;
                            break;
                        }
                    }
                }

                if next == Lit::UNDEF {
                    self.stats.decisions += 1;
                    next = self.pick_branch_lit();
                    if next == Lit::UNDEF {
                        return Tristate::True;
                    }
                    self.record_decision(next);
                }
                self.trail_lim.push(self.trail.len());
                self.unchecked_enqueue(next, None);
            }
        }
    }

    /// Picks the next branching literal: occasionally a random heap
    /// element, otherwise the unassigned decision variable of highest
    /// activity. Polarity comes from the saved phase unless random
    /// polarity mode is on.
    pub(crate) fn pick_branch_lit(&mut self) -> Lit {
        let random_var_freq = self.config.low_level_config().random_var_freq();
        let rnd_pol = self.config.low_level_config().rnd_pol();
        let mut next: Option<Var> = None;

        if random_var_freq > 0.0 && self.rng.f64() < random_var_freq && !self.order_heap.empty() {
            let candidate = self.order_heap[self.rng.usize(0..self.order_heap.len())];
            if self.vars[candidate.0].assignment == Tristate::Undef && self.vars[candidate.0].decision {
                self.stats.rnd_decisions += 1;
                next = Some(candidate);
            }
        }

        while next.is_none() || self.vars[next.unwrap().0].assignment != Tristate::Undef || !self.vars[next.unwrap().0].decision {
            if self.order_heap.empty() {
                return Lit::UNDEF;
            }
            next = Some(self.order_heap.remove_min(&self.vars));
        }
        let v = next.unwrap();
        let polarity = if rnd_pol { self.rng.bool() } else { self.vars[v.0].polarity };
        mk_lit(v, polarity)
    }

    fn record_decision(&mut self, next: Lit) {
        let v = var(next);
        self.vars[v.0].decisions += 1;
        if self.vars[v.0].bridge {
            self.stats.bridge_decisions += 1;
        }
        if self.vars[v.0].high_centrality {
            self.stats.highcenter_decisions += 1;
            if self.vars[v.0].bridge {
                self.stats.mutual_bridge_center_decisions += 1;
            }
        }
        let community = self.vars[v.0].community;
        if community < self.communities.decisions.len() {
            self.communities.decisions[community] += 1;
        }
    }

    /// Simplifies the clause database at level 0 by removing satisfied
    /// clauses, then rebuilds the order heap. Returns `false` when
    /// propagation at level 0 derives a contradiction.
    pub(crate) fn simplify(&mut self) -> bool {
        debug_assert_eq!(self.decision_level(), 0);
        if !self.ok || self.propagate().is_some() {
            self.ok = false;
            return false;
        }
        if self.n_assigns() as i64 == self.simp_db_assigns || self.simp_db_props > 0 {
            return true;
        }

        self.remove_satisfied_learnts();
        self.remove_satisfied_purgatory();
        if self.config.low_level_config().remove_satisfied() {
            self.remove_satisfied_originals();
        }
        self.check_garbage();
        self.rebuild_order_heap();

        self.simp_db_assigns = self.n_assigns() as i64;
        self.simp_db_props = i64::try_from(self.clauses_literals + self.learnts_literals).unwrap_or(i64::MAX);
        true
    }

    fn remove_satisfied_learnts(&mut self) {
        let mut cs = mem::take(&mut self.learnts);
        cs.retain(|&cr| {
            if self.satisfied(cr) {
                self.remove_clause(cr, false);
                false
            } else {
                true
            }
        });
        self.learnts = cs;
    }

    fn remove_satisfied_purgatory(&mut self) {
        let mut cs = mem::take(&mut self.unary_watched_clauses);
        cs.retain(|&cr| {
            if self.satisfied(cr) {
                let in_purgatory = self.c(cr).one_watched;
                self.remove_clause(cr, in_purgatory);
                false
            } else {
                true
            }
        });
        self.unary_watched_clauses = cs;
    }

    fn remove_satisfied_originals(&mut self) {
        let mut cs = mem::take(&mut self.clauses);
        cs.retain(|&cr| {
            if self.satisfied(cr) {
                self.remove_clause(cr, false);
                false
            } else {
                true
            }
        });
        self.clauses = cs;
    }

    pub(crate) fn rebuild_order_heap(&mut self) {
        let vs: Vec<Var> =
            (0..self.n_vars()).map(Var).filter(|&v| self.vars[v.0].decision && self.vars[v.0].assignment == Tristate::Undef).collect();
        self.order_heap.build(&vs, &self.vars);
    }

    /// Frees the worst half of the learned clauses, sparing binary,
    /// low-LBD, locked, and recently frozen clauses.
    pub(crate) fn reduce_db(&mut self) {
        self.stats.nb_reduce_db += 1;
        let mut learnts = mem::take(&mut self.learnts);
        learnts.sort_by(|&x, &y| reduce_db_lt(self.c(x), self.c(y)));

        // lots of good clauses are hard to tell apart, keep more of them
        if self.c(learnts[learnts.len() / RATIO_REMOVE_CLAUSES]).lbd <= 3 {
            self.nb_clauses_before_reduce += self.config.low_level_config().special_inc_reduce_db();
        }
        if self.c(*learnts.last().expect("reduce_db on an empty learnt database")).lbd <= 5 {
            self.nb_clauses_before_reduce += self.config.low_level_config().special_inc_reduce_db();
        }

        let mut limit = learnts.len() / 2;
        let mut j = 0;
        for i in 0..learnts.len() {
            let c_ref = learnts[i];
            let (lbd, len, can_be_del) = {
                let c = self.c(c_ref);
                (c.lbd, c.len(), c.can_be_del)
            };
            if lbd > 2 && len > 2 && can_be_del && !self.locked(c_ref) && i < limit {
                self.remove_clause(c_ref, false);
                self.stats.nb_removed_clauses += 1;
            } else {
                if !can_be_del {
                    // the clause was spared once, allow deleting another instead
                    limit += 1;
                }
                self.c_mut(c_ref).can_be_del = true;
                learnts[j] = c_ref;
                j += 1;
            }
        }
        learnts.truncate(j);
        self.learnts = learnts;
        debug!(kept = j, removed = self.stats.nb_removed_clauses, "clause database reduced");
        self.check_garbage();
    }
}

/// Deletion order for the reducer: removable clauses sort first. Binary
/// clauses sort last and are never removed; otherwise higher LBD first,
/// ties broken by lower activity.
fn reduce_db_lt(x: &Clause, y: &Clause) -> Ordering {
    if x.len() > 2 && y.len() == 2 {
        return Ordering::Less;
    }
    if y.len() > 2 && x.len() == 2 {
        return Ordering::Greater;
    }
    if x.len() == 2 && y.len() == 2 {
        return Ordering::Equal;
    }
    if x.lbd != y.lbd {
        return y.lbd.cmp(&x.lbd);
    }
    x.activity.partial_cmp(&y.activity).unwrap_or(Ordering::Equal)
}
