use super::config::ClauseMinimization;
use super::core_solver::CoreSolver;
use super::datastructures::{not, var, ClauseRef, Lit, Tristate};
use super::hooks::ParallelHooks;

impl CoreSolver {
    /// Analyzes a conflict and produces the First-UIP learned clause.
    ///
    /// The asserting literal ends up at position 0 and the literal of the
    /// backtrack level at position 1. The backtrack level, the clause's
    /// LBD, and its size without selectors are left in the corresponding
    /// `analyze_*` fields.
    #[allow(clippy::too_many_lines)]
    pub(crate) fn analyze(&mut self, clause_ref: ClauseRef, hooks: &mut dyn ParallelHooks) -> Vec<Lit> {
        let mut out_learnt = Vec::new();
        let mut selectors = Vec::new();
        let mut c_ref_option: Option<ClauseRef> = Some(clause_ref);
        let mut path_c = 0_i64;
        let mut p = Lit::UNDEF;
        out_learnt.push(Lit::UNDEF);
        let mut index = self.trail.len() - 1;
        let mut first_run = true;

        while first_run || path_c > 0 {
            first_run = false;
            let c_ref = c_ref_option.expect("conflict analysis reached a literal without a reason");
            // binary convention: position 0 must hold the currently true literal
            if p != Lit::UNDEF && self.c(c_ref).len() == 2 && self.value(self.c(c_ref).get(0)) == Tristate::False {
                debug_assert_eq!(self.value(self.c(c_ref).get(1)), Tristate::True);
                self.c_mut(c_ref).swap(0, 1);
            }
            if self.c(c_ref).learnt {
                hooks.import_clause_during_analysis(self, c_ref);
                self.cla_bump_activity(c_ref);
            } else if !self.c(c_ref).seen {
                self.stats.original_clauses_seen += 1;
                self.c_mut(c_ref).seen = true;
            }
            // on-the-fly LBD improvement; a clause whose LBD shrinks enough is
            // frozen for one reducer pass
            if self.c(c_ref).learnt && self.c(c_ref).lbd > 2 {
                let nb_levels = self.compute_lbd_clause(c_ref);
                if nb_levels + 1 < self.c(c_ref).lbd {
                    if self.c(c_ref).lbd <= self.config.low_level_config().lb_lbd_frozen_clause() {
                        self.c_mut(c_ref).can_be_del = false;
                    }
                    self.c_mut(c_ref).lbd = nb_levels;
                }
            }
            let start = usize::from(p != Lit::UNDEF);
            for j in start..self.c(c_ref).len() {
                let q = self.c(c_ref).get(j);
                let q_var = var(q);
                if !self.seen[q_var.0] && self.v(q).level_greater_zero() {
                    if !self.is_selector(q_var) {
                        // high-centrality variables get an inflated bump until
                        // the decision warm-up threshold is crossed
                        let inc = if self.vars[q_var.0].high_centrality
                            && self.stats.decisions < self.config.low_level_config().decision_warmup()
                        {
                            self.var_inc * self.config.low_level_config().var_inc_centrality()
                        } else {
                            self.var_inc
                        };
                        self.var_bump_activity(q_var, inc);
                    }
                    self.seen[q_var.0] = true;
                    if self.v(q).level.is_some_and(|l| l >= self.decision_level()) {
                        path_c += 1;
                        if !self.is_selector(q_var) && self.v(q).reason.is_some_and(|r| self.c(r).learnt) {
                            self.last_decision_level.push(q);
                        }
                    } else if self.is_selector(q_var) {
                        debug_assert_eq!(self.value(q), Tristate::False);
                        selectors.push(q);
                    } else {
                        out_learnt.push(q);
                    }
                }
            }
            // select next literal to resolve on
            while !self.seen[var(self.trail[index]).0] {
                index -= 1;
            }
            p = self.trail[index];
            c_ref_option = self.v(p).reason;
            self.seen[var(p).0] = false;
            path_c -= 1;
        }
        out_learnt[0] = not(p);
        self.simplify_learnt_clause(&mut out_learnt, &selectors);
        out_learnt
    }

    /// Minimizes the freshly learned clause, determines the backtrack
    /// level, computes the LBD, and performs the post-analysis bumps.
    fn simplify_learnt_clause(&mut self, out_learnt: &mut Vec<Lit>, selectors: &[Lit]) {
        out_learnt.extend_from_slice(selectors);
        let mut analyze_to_clear = out_learnt.clone();
        let mut j: usize;
        match self.config.clause_minimization() {
            ClauseMinimization::Deep => {
                let mut abstract_level = 0;
                for &i in &out_learnt[1..] {
                    abstract_level |= self.abstract_level(var(i));
                }
                j = 1;
                for i in 1..out_learnt.len() {
                    let i_lit = out_learnt[i];
                    if self.v(i_lit).reason.is_none() || !self.lit_redundant(i_lit, abstract_level, &mut analyze_to_clear) {
                        out_learnt[j] = i_lit;
                        j += 1;
                    }
                }
            }
            ClauseMinimization::Basic => {
                j = 1;
                for i in 1..out_learnt.len() {
                    let i_lit = out_learnt[i];
                    if let Some(clause_ref) = self.v(i_lit).reason {
                        let start = usize::from(self.c(clause_ref).len() != 2);
                        for k in start..self.c(clause_ref).len() {
                            let k_lit = self.c(clause_ref).get(k);
                            if !self.seen[var(k_lit).0] && self.v(k_lit).level_greater_zero() {
                                out_learnt[j] = i_lit;
                                j += 1;
                                break;
                            }
                        }
                    } else {
                        out_learnt[j] = i_lit;
                        j += 1;
                    }
                }
            }
            ClauseMinimization::None => {
                j = out_learnt.len();
            }
        }
        out_learnt.truncate(j);

        if !self.config.incremental() && out_learnt.len() <= self.config.low_level_config().lb_size_minimizing_clause() {
            self.minimisation_with_binary_resolution(out_learnt);
        }

        // backtrack level: second-highest literal level, swapped to position 1
        self.analyze_bt_level = 0;
        if out_learnt.len() > 1 {
            let mut max = 1;
            for k in 2..out_learnt.len() {
                if self.v(out_learnt[k]).level > self.v(out_learnt[max]).level {
                    max = k;
                }
            }
            let p = out_learnt[max];
            out_learnt.swap(max, 1);
            self.analyze_bt_level = self.v(p).level.unwrap();
        }

        if self.config.incremental() {
            let mut sz = 0;
            for (i, &l) in out_learnt.iter().enumerate() {
                if self.is_selector(var(l)) {
                    if i > 0 {
                        break;
                    }
                } else {
                    sz += 1;
                }
            }
            self.analyze_sz_without_selectors = sz;
        } else {
            self.analyze_sz_without_selectors = out_learnt.len();
        }

        self.analyze_lbd = self.compute_lbd(out_learnt, out_learnt.len() - selectors.len());

        // literals implied by a learnt reason of better LBD than the new
        // clause get one extra bump
        for k in 0..self.last_decision_level.len() {
            let lit = self.last_decision_level[k];
            let reason = self.v(lit).reason.expect("literal recorded without a reason");
            if self.c(reason).lbd < self.analyze_lbd {
                self.var_bump_activity(var(lit), self.var_inc);
            }
        }
        self.last_decision_level.clear();

        for l in analyze_to_clear {
            self.seen[var(l).0] = false;
        }
        for &s in selectors {
            self.seen[var(s).0] = false;
        }
    }

    /// Checks whether `p` is redundant in the learned clause by a DFS
    /// through its implication ancestors. `abstract_levels` is a 32-bit
    /// fingerprint of the levels present in the clause, used to abort
    /// early on levels that cannot be resolved away.
    pub(crate) fn lit_redundant(&mut self, p: Lit, abstract_levels: usize, analyze_to_clear: &mut Vec<Lit>) -> bool {
        let mut analyze_stack = Vec::with_capacity(analyze_to_clear.len());
        analyze_stack.push(p);
        let top = analyze_to_clear.len();

        while let Some(last) = analyze_stack.pop() {
            let c_ref = self.v(last).reason.expect("redundancy candidate without a reason");
            if self.c(c_ref).len() == 2 && self.value(self.c(c_ref).get(0)) == Tristate::False {
                debug_assert_eq!(self.value(self.c(c_ref).get(1)), Tristate::True);
                self.c_mut(c_ref).swap(0, 1);
            }
            for i in 1..self.c(c_ref).len() {
                let q = self.c(c_ref).get(i);
                if !self.seen[var(q).0] && self.v(q).level_greater_zero() {
                    if self.v(q).reason.is_some() && (self.abstract_level(var(q)) & abstract_levels) != 0 {
                        self.seen[var(q).0] = true;
                        analyze_stack.push(q);
                        analyze_to_clear.push(q);
                    } else {
                        // roll back the marks added by this DFS before giving up
                        for &l in &analyze_to_clear[top..] {
                            self.seen[var(l).0] = false;
                        }
                        analyze_to_clear.truncate(top);
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Removes literals implied by binary clauses of the asserting
    /// literal. Only worthwhile for small clauses of small LBD.
    pub(crate) fn minimisation_with_binary_resolution(&mut self, out_learnt: &mut Vec<Lit>) {
        let lbd = self.compute_lbd(out_learnt, out_learnt.len());
        let p = not(out_learnt[0]);

        if lbd <= self.config.low_level_config().lb_lbd_minimizing_clause() {
            self.my_flag += 1;
            for &l in &out_learnt[1..] {
                self.perm_diff[var(l).0] = self.my_flag;
            }
            let mut nb = 0;
            for k in 0..self.watches_bin.get(p).len() {
                let imp = self.watches_bin.get(p)[k].blocker;
                if self.perm_diff[var(imp).0] == self.my_flag && self.value(imp) == Tristate::True {
                    nb += 1;
                    self.perm_diff[var(imp).0] = self.my_flag - 1;
                }
            }
            if nb > 0 {
                self.stats.nb_reduced_clauses += 1;
                let mut l = out_learnt.len() - 1;
                let mut i = 1;
                while i < out_learnt.len() - nb {
                    if self.perm_diff[var(out_learnt[i]).0] != self.my_flag {
                        out_learnt.swap(l, i);
                        l -= 1;
                        i -= 1;
                    }
                    i += 1;
                }
                out_learnt.truncate(out_learnt.len() - nb);
            }
        }
    }

    /// Expresses the final conflict in terms of the assumptions: collects
    /// the set of assumptions that led to the assignment of `p` into the
    /// `conflict` vector.
    pub(crate) fn analyze_final(&mut self, p: Lit) {
        self.conflict.clear();
        self.conflict.push(p);

        if self.decision_level() == 0 {
            return;
        }
        self.seen[var(p).0] = true;

        for i in (self.trail_lim[0]..self.trail.len()).rev() {
            let x_lit = self.trail[i];
            let x = var(x_lit);
            if self.seen[x.0] {
                if let Some(c_ref) = self.vars[x.0].reason {
                    // binary clauses keep their true literal at position 0, so
                    // the scan must start there
                    let start = usize::from(self.c(c_ref).len() != 2);
                    for j in start..self.c(c_ref).len() {
                        let l = self.c(c_ref).get(j);
                        if self.v(l).level_greater_zero() {
                            self.seen[var(l).0] = true;
                        }
                    }
                } else {
                    debug_assert!(self.vars[x.0].level_greater_zero());
                    self.conflict.push(not(x_lit));
                }
                self.seen[x.0] = false;
            }
        }
        self.seen[var(p).0] = false;
    }

    /// Counts the distinct decision levels among `lits[..]`, skipping
    /// selectors in incremental mode (`end` bounds the number of
    /// non-selector literals considered). Uses the stamped `perm_diff`
    /// array, so no clearing between calls is needed.
    pub(crate) fn compute_lbd(&mut self, lits: &[Lit], end: usize) -> usize {
        let mut nb_levels = 0;
        self.my_flag += 1;
        if self.config.incremental() {
            let mut nb_done = 0;
            for &lit in lits {
                if nb_done >= end {
                    break;
                }
                if self.is_selector(var(lit)) {
                    continue;
                }
                nb_done += 1;
                let l = self.v(lit).level.expect("LBD of an unassigned literal");
                if self.perm_diff[l] != self.my_flag {
                    self.perm_diff[l] = self.my_flag;
                    nb_levels += 1;
                }
            }
        } else {
            for &lit in lits {
                let l = self.v(lit).level.expect("LBD of an unassigned literal");
                if self.perm_diff[l] != self.my_flag {
                    self.perm_diff[l] = self.my_flag;
                    nb_levels += 1;
                }
            }
        }
        if !self.config.low_level_config().reduce_on_size() {
            return nb_levels;
        }
        if lits.len() < self.config.low_level_config().reduce_on_size_size() {
            return lits.len();
        }
        lits.len() + nb_levels
    }

    /// LBD of a stored clause, bounded by its size without selectors in
    /// incremental mode.
    pub(crate) fn compute_lbd_clause(&mut self, c: ClauseRef) -> usize {
        let len = self.c(c).len();
        let size_without_selectors = self.c(c).size_without_selectors;
        let mut nb_levels = 0;
        self.my_flag += 1;
        if self.config.incremental() {
            let mut nb_done = 0;
            for i in 0..len {
                if nb_done >= size_without_selectors {
                    break;
                }
                let lit = self.c(c).get(i);
                if self.is_selector(var(lit)) {
                    continue;
                }
                nb_done += 1;
                let l = self.v(lit).level.expect("LBD of an unassigned literal");
                if self.perm_diff[l] != self.my_flag {
                    self.perm_diff[l] = self.my_flag;
                    nb_levels += 1;
                }
            }
        } else {
            for i in 0..len {
                let lit = self.c(c).get(i);
                let l = self.v(lit).level.expect("LBD of an unassigned literal");
                if self.perm_diff[l] != self.my_flag {
                    self.perm_diff[l] = self.my_flag;
                    nb_levels += 1;
                }
            }
        }
        if !self.config.low_level_config().reduce_on_size() {
            return nb_levels;
        }
        if len < self.config.low_level_config().reduce_on_size_size() {
            return len;
        }
        len + nb_levels
    }
}
