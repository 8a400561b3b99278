use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;

use crate::collections::VEC_INIT_SIZE;

use super::centrality::CommunityStructure;
use super::config::SolverConfig;
use super::datastructures::{
    mk_lit, not, sign, var, BoundedQueue, Clause, ClauseArena, ClauseRef, Lit, Tristate, Var, VarOrderHeap, Variable, Watcher,
    WatchLists,
};

pub const RATIO_REMOVE_CLAUSES: usize = 2;
pub const LB_BLOCKING_RESTART: u64 = 10_000;

/// Search and heuristic counters, updated as the solver runs.
#[derive(Clone, Debug, Default)]
pub struct SolverStats {
    pub starts: u64,
    pub conflicts: u64,
    pub conflicts_restarts: u64,
    pub decisions: u64,
    pub rnd_decisions: u64,
    pub propagations: u64,
    pub nb_reduce_db: u64,
    pub nb_removed_clauses: u64,
    pub nb_reduced_clauses: u64,
    pub nb_dl2: u64,
    pub nb_bin: u64,
    pub nb_un: u64,
    pub nb_promoted: u64,
    pub nb_stops_restarts: u64,
    pub original_clauses_seen: u64,
    pub sum_decision_levels: u64,
    /// Decisions on bridge variables.
    pub bridge_decisions: u64,
    /// Decisions on high-centrality variables.
    pub highcenter_decisions: u64,
    /// Decisions on variables that are both bridges and high-centrality.
    pub mutual_bridge_center_decisions: u64,
}

/// The CDCL core: clause database, trail, watches, and all search state.
#[allow(clippy::struct_excessive_bools)]
pub struct CoreSolver {
    pub(crate) config: SolverConfig,

    // internal solver state
    pub(crate) ok: bool,
    pub(crate) qhead: usize,
    pub(crate) arena: ClauseArena,
    pub(crate) clauses: Vec<ClauseRef>,
    pub(crate) learnts: Vec<ClauseRef>,
    /// The purgatory: imported clauses watched only at position 0.
    pub(crate) unary_watched_clauses: Vec<ClauseRef>,
    pub(crate) watches: WatchLists,
    pub(crate) watches_bin: WatchLists,
    pub(crate) unary_watches: WatchLists,
    pub(crate) vars: Vec<Variable>,
    pub(crate) order_heap: VarOrderHeap,
    pub(crate) trail: Vec<Lit>,
    pub(crate) trail_lim: Vec<usize>,
    pub(crate) assumptions: Vec<Lit>,
    pub(crate) model: Vec<bool>,
    pub(crate) conflict: Vec<Lit>,
    pub(crate) seen: Vec<bool>,
    pub(crate) analyze_bt_level: usize,
    pub(crate) analyze_lbd: usize,
    pub(crate) analyze_sz_without_selectors: usize,
    pub(crate) cla_inc: f64,
    pub(crate) var_inc: f64,
    pub(crate) var_decay: f64,
    pub(crate) clauses_literals: usize,
    pub(crate) learnts_literals: usize,

    // glucose-related state
    pub(crate) perm_diff: Vec<isize>,
    pub(crate) my_flag: isize,
    pub(crate) last_decision_level: Vec<Lit>,
    pub(crate) lbd_queue: BoundedQueue,
    pub(crate) trail_queue: BoundedQueue,
    pub(crate) nb_clauses_before_reduce: usize,
    pub(crate) cur_restart: usize,
    pub(crate) sum_lbd: u64,
    pub(crate) simp_db_assigns: i64,
    pub(crate) simp_db_props: i64,

    // incremental mode
    pub(crate) n_initial_vars: usize,

    // budgets and interruption
    pub(crate) conflict_budget: i64,
    pub(crate) propagation_budget: i64,
    pub(crate) asynch_interrupt: Arc<AtomicBool>,

    pub(crate) rng: fastrand::Rng,

    /// DRAT-like certificate log: a leading `1` marks an addition, `-1`
    /// a deletion, and `[0]` the empty clause. Only filled when proof
    /// generation is enabled.
    pub(crate) proof: Vec<Vec<isize>>,

    pub(crate) communities: CommunityStructure,
    pub(crate) stats: SolverStats,
}

impl Default for CoreSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreSolver {
    /// Constructs a new solver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_config(SolverConfig::default())
    }

    /// Constructs a new solver with custom configuration.
    pub fn new_with_config(config: SolverConfig) -> Self {
        let low = config.low_level_config().clone();
        Self {
            ok: true,
            qhead: 0,
            arena: ClauseArena::new(),
            clauses: Vec::with_capacity(VEC_INIT_SIZE),
            learnts: Vec::with_capacity(VEC_INIT_SIZE),
            unary_watched_clauses: Vec::new(),
            watches: WatchLists::new(),
            watches_bin: WatchLists::new(),
            unary_watches: WatchLists::new(),
            vars: Vec::with_capacity(VEC_INIT_SIZE),
            order_heap: VarOrderHeap::new(),
            trail: Vec::with_capacity(VEC_INIT_SIZE),
            trail_lim: Vec::with_capacity(VEC_INIT_SIZE),
            assumptions: Vec::new(),
            model: Vec::new(),
            conflict: Vec::new(),
            seen: Vec::with_capacity(VEC_INIT_SIZE),
            analyze_bt_level: 0,
            analyze_lbd: 0,
            analyze_sz_without_selectors: 0,
            cla_inc: 1.0,
            var_inc: low.var_inc(),
            var_decay: low.var_decay(),
            clauses_literals: 0,
            learnts_literals: 0,
            // indexed by decision level, which can reach the variable count
            perm_diff: vec![0],
            my_flag: 0,
            last_decision_level: Vec::new(),
            lbd_queue: BoundedQueue::new(low.size_lbd_queue()),
            trail_queue: BoundedQueue::new(low.size_trail_queue()),
            nb_clauses_before_reduce: low.first_reduce_db(),
            cur_restart: 1,
            sum_lbd: 0,
            simp_db_assigns: -1,
            simp_db_props: 0,
            n_initial_vars: usize::MAX,
            conflict_budget: -1,
            propagation_budget: -1,
            asynch_interrupt: Arc::new(AtomicBool::new(false)),
            rng: fastrand::Rng::with_seed(low.random_seed()),
            proof: Vec::new(),
            communities: CommunityStructure::default(),
            stats: SolverStats::default(),
            config,
        }
    }

    pub(crate) fn c(&self, cls: ClauseRef) -> &Clause {
        self.arena.get(cls)
    }

    pub(crate) fn c_mut(&mut self, cls: ClauseRef) -> &mut Clause {
        self.arena.get_mut(cls)
    }

    pub(crate) fn v(&self, lit: Lit) -> &Variable {
        &self.vars[var(lit).0]
    }

    pub(crate) fn v_mut(&mut self, lit: Lit) -> &mut Variable {
        &mut self.vars[var(lit).0]
    }

    pub(crate) fn value(&self, lit: Lit) -> Tristate {
        let val = self.v(lit).assignment;
        if sign(lit) {
            val.negate()
        } else {
            val
        }
    }

    /// Creates a new variable with an initial polarity and decision
    /// eligibility.
    pub fn new_var(&mut self, polarity: bool, dvar: bool) -> Var {
        let v = Var(self.vars.len());
        self.vars.push(Variable::new(polarity, dvar));
        self.watches.init_var();
        self.watches_bin.init_var();
        self.unary_watches.init_var();
        self.seen.push(false);
        self.perm_diff.push(0);
        self.insert_var_order(v);
        v
    }

    /// Creates variables up to index `n - 1`.
    pub fn ensure_vars(&mut self, n: usize) {
        while self.vars.len() < n {
            self.new_var(!self.config.initial_phase(), true);
        }
    }

    /// Adds a clause given as non-zero DIMACS literals, creating missing
    /// variables on the fly.
    pub fn add_clause_from_dimacs(&mut self, lits: &[isize]) -> bool {
        let mut ps = Vec::with_capacity(lits.len());
        for &l in lits {
            debug_assert!(l != 0);
            let v = l.unsigned_abs() - 1;
            self.ensure_vars(v + 1);
            ps.push(mk_lit(Var(v), l < 0));
        }
        self.add_clause(ps)
    }

    /// Adds a clause to the solver.
    ///
    /// Sorts the literals, drops level-0-false and duplicate ones,
    /// short-circuits on tautologies and level-0-true literals, asserts
    /// unit clauses immediately. Returns `false` when the clause made the
    /// formula unsatisfiable at level 0.
    pub fn add_clause(&mut self, mut ps: Vec<Lit>) -> bool {
        assert_eq!(self.decision_level(), 0);
        if !self.ok {
            return false;
        }
        ps.sort_unstable();

        let flag = self.config.proof_generation() && ps.iter().any(|&l| self.value(l) != Tristate::Undef);
        let oc = if flag { Some(ps.clone()) } else { None };

        let mut j = 0_usize;
        let mut p = Lit::UNDEF;
        for i in 0..ps.len() {
            let elem = ps[i];
            let elem_value = self.value(elem);
            if elem_value == Tristate::True || elem == not(p) {
                return true;
            } else if elem_value != Tristate::False && elem != p {
                p = elem;
                ps[j] = p;
                j += 1;
            }
        }
        ps.truncate(j);

        if let Some(oc) = oc {
            let mut add = Vec::with_capacity(ps.len() + 1);
            add.push(1);
            add.extend(ps.iter().map(|&l| dimacs_lit(l)));
            self.proof.push(add);
            let mut del = Vec::with_capacity(oc.len() + 1);
            del.push(-1);
            del.extend(oc.iter().map(|&l| dimacs_lit(l)));
            self.proof.push(del);
        }

        if ps.is_empty() {
            self.ok = false;
            if self.config.proof_generation() {
                self.proof.push(vec![0]);
            }
            return false;
        } else if ps.len() == 1 {
            self.unchecked_enqueue(ps[0], None);
            self.ok = self.propagate().is_none();
            if !self.ok && self.config.proof_generation() {
                self.proof.push(vec![0]);
            }
            return self.ok;
        }
        let cref = self.arena.alloc(ps, false);
        self.clauses.push(cref);
        self.attach_clause(cref);
        true
    }

    /// Installs an imported clause into the purgatory: it is watched only
    /// at position 0 until a conflict promotes it into the regular
    /// two-watched database.
    pub fn add_imported_clause(&mut self, lits: Vec<Lit>, lbd: usize) -> ClauseRef {
        debug_assert!(lits.len() > 1);
        let cref = self.arena.alloc(lits, true);
        let clause = self.arena.get_mut(cref);
        clause.lbd = lbd;
        clause.one_watched = true;
        self.unary_watched_clauses.push(cref);
        self.attach_clause_purgatory(cref);
        cref
    }

    pub(crate) fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }

    pub(crate) fn n_assigns(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn abstract_level(&self, x: Var) -> usize {
        1 << (self.vars[x.0].level.unwrap() & 31)
    }

    /// True while the variable index belongs to the selector range of
    /// incremental mode. Selectors are never bumped and never counted in
    /// LBD.
    pub(crate) fn is_selector(&self, x: Var) -> bool {
        self.config.incremental() && x.0 >= self.n_initial_vars
    }

    pub(crate) fn insert_var_order(&mut self, x: Var) {
        if !self.order_heap.in_heap(x) && self.vars[x.0].decision {
            self.order_heap.insert(x, &self.vars);
        }
    }

    pub(crate) fn var_decay_activities(&mut self) {
        self.var_inc *= 1.0 / self.var_decay;
    }

    pub(crate) fn var_bump_activity(&mut self, v: Var, inc: f64) {
        let variable = &mut self.vars[v.0];
        variable.increment_activity(inc);
        if variable.activity > 1e100 {
            for variable in &mut self.vars {
                variable.rescale_activity();
            }
            self.var_inc *= 1e-100;
        }
        if self.order_heap.in_heap(v) {
            self.order_heap.decrease(v, &self.vars);
        }
    }

    pub(crate) fn cla_decay_activities(&mut self) {
        self.cla_inc *= 1.0 / self.config.low_level_config().clause_decay();
    }

    pub(crate) fn cla_bump_activity(&mut self, c: ClauseRef) {
        let cls = self.arena.get_mut(c);
        cls.increment_activity(self.cla_inc);
        if cls.activity > 1e20 {
            for &learnt in &self.learnts {
                self.arena.get_mut(learnt).rescale_activity();
            }
            self.cla_inc *= 1e-20;
        }
    }

    /// A learned clause is locked while it is the reason of its first
    /// literal's assignment; locked clauses must not be removed.
    pub(crate) fn locked(&self, cls: ClauseRef) -> bool {
        let c = self.c(cls);
        self.value(c.get(0)) == Tristate::True && self.v(c.get(0)).reason.is_some_and(|r| r == cls)
    }

    pub(crate) fn unchecked_enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        debug_assert!(self.value(lit) == Tristate::Undef);
        let level = self.decision_level();
        let variable = self.v_mut(lit);
        variable.assignment = Tristate::from_bool(!sign(lit));
        variable.reason = reason;
        variable.level = Some(level);
        self.trail.push(lit);
    }

    pub(crate) fn attach_clause(&mut self, clause_ref: ClauseRef) {
        let clause = self.arena.get(clause_ref);
        assert!(clause.len() > 1);
        let lit0 = clause.get(0);
        let lit1 = clause.get(1);
        let learnt = clause.learnt;
        let size = clause.len();

        if size == 2 {
            self.watches_bin.push(not(lit0), Watcher { clause_ref, blocker: lit1 });
            self.watches_bin.push(not(lit1), Watcher { clause_ref, blocker: lit0 });
        } else {
            self.watches.push(not(lit0), Watcher { clause_ref, blocker: lit1 });
            self.watches.push(not(lit1), Watcher { clause_ref, blocker: lit0 });
        }
        if learnt {
            self.learnts_literals += size;
        } else {
            self.clauses_literals += size;
        }
    }

    /// Attaches a clause to the purgatory, watching only position 0.
    pub(crate) fn attach_clause_purgatory(&mut self, clause_ref: ClauseRef) {
        let clause = self.arena.get(clause_ref);
        assert!(clause.len() > 1);
        let lit0 = clause.get(0);
        let lit1 = clause.get(1);
        self.unary_watches.push(not(lit0), Watcher { clause_ref, blocker: lit1 });
    }

    pub(crate) fn detach_clause(&mut self, clause_ref: ClauseRef, strict: bool) {
        let clause = self.arena.get(clause_ref);
        debug_assert!(clause.len() > 1);
        let lit0 = clause.get(0);
        let lit1 = clause.get(1);
        let learnt = clause.learnt;
        let size = clause.len();

        let lists = if size == 2 { &mut self.watches_bin } else { &mut self.watches };
        if strict {
            remove_watcher(lists, not(lit0), clause_ref);
            remove_watcher(lists, not(lit1), clause_ref);
        } else {
            lists.smudge(not(lit0));
            lists.smudge(not(lit1));
        }
        if learnt {
            self.learnts_literals -= size;
        } else {
            self.clauses_literals -= size;
        }
    }

    pub(crate) fn detach_clause_purgatory(&mut self, clause_ref: ClauseRef, strict: bool) {
        let lit0 = self.arena.get(clause_ref).get(0);
        if strict {
            remove_watcher(&mut self.unary_watches, not(lit0), clause_ref);
        } else {
            self.unary_watches.smudge(not(lit0));
        }
    }

    /// Removes a clause from the database: records the deletion in the
    /// proof, detaches lazily, releases a lock if held, and frees the
    /// arena slot.
    pub(crate) fn remove_clause(&mut self, cls: ClauseRef, in_purgatory: bool) {
        if self.config.proof_generation() {
            let c = self.c(cls);
            let mut del = Vec::with_capacity(c.len() + 1);
            del.push(-1);
            del.extend(c.data.iter().map(|&l| dimacs_lit(l)));
            self.proof.push(del);
        }
        if in_purgatory {
            self.detach_clause_purgatory(cls, false);
        } else {
            self.detach_clause(cls, false);
        }
        if self.locked(cls) {
            let lit0 = self.c(cls).get(0);
            self.v_mut(lit0).reason = None;
        }
        self.arena.free(cls);
    }

    pub(crate) fn satisfied(&self, cls: ClauseRef) -> bool {
        self.c(cls).data.iter().any(|&l| self.value(l) == Tristate::True)
    }

    /// Reverts to the state at the given level, keeping all assignments
    /// at `level` but not beyond.
    pub(crate) fn cancel_until(&mut self, level: usize) {
        if self.decision_level() > level {
            let phase_saving = self.config.low_level_config().phase_saving();
            let last_lim = *self.trail_lim.last().unwrap();
            for c in (self.trail_lim[level]..self.trail.len()).rev() {
                let lit = self.trail[c];
                let x = var(lit);
                self.vars[x.0].assignment = Tristate::Undef;
                if phase_saving > 1 || (phase_saving == 1 && c > last_lim) {
                    self.vars[x.0].polarity = sign(lit);
                }
                self.insert_var_order(x);
            }
            self.qhead = self.trail_lim[level];
            self.trail.truncate(self.qhead);
            self.trail_lim.truncate(level);
        }
    }

    // ---- budgets and interruption ------------------------------------

    /// Limits the number of conflicts of subsequent `solve` calls.
    pub fn set_conf_budget(&mut self, x: u64) {
        self.conflict_budget = i64::try_from(self.stats.conflicts + x).unwrap_or(i64::MAX);
    }

    /// Limits the number of propagations of subsequent `solve` calls.
    pub fn set_prop_budget(&mut self, x: u64) {
        self.propagation_budget = i64::try_from(self.stats.propagations + x).unwrap_or(i64::MAX);
    }

    /// Removes all budget limits.
    pub fn budget_off(&mut self) {
        self.conflict_budget = -1;
        self.propagation_budget = -1;
    }

    pub(crate) fn within_budget(&self) -> bool {
        !self.asynch_interrupt.load(Ordering::Relaxed)
            && (self.conflict_budget < 0 || self.stats.conflicts < self.conflict_budget.unsigned_abs())
            && (self.propagation_budget < 0 || self.stats.propagations < self.propagation_budget.unsigned_abs())
    }

    /// Requests an asynchronous interruption; the search returns `Undef`
    /// at the next budget check.
    pub fn interrupt(&self) {
        self.asynch_interrupt.store(true, Ordering::Relaxed);
    }

    /// Clears a pending interruption request.
    pub fn clear_interrupt(&self) {
        self.asynch_interrupt.store(false, Ordering::Relaxed);
    }

    /// A shareable handle to the interrupt flag, e.g. for signal handlers.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.asynch_interrupt)
    }

    // ---- incremental mode --------------------------------------------

    /// Declares the number of variables of the initial formula; in
    /// incremental mode every variable beyond this range is a selector.
    pub fn set_initial_var_count(&mut self, n: usize) {
        self.n_initial_vars = n;
    }

    // ---- accessors ---------------------------------------------------

    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn n_learnts(&self) -> usize {
        self.learnts.len()
    }

    /// The model of the last satisfiable `solve` call, one boolean per
    /// variable.
    pub fn model(&self) -> &[bool] {
        &self.model
    }

    /// The final conflict clause over the assumptions of the last
    /// unsatisfiable `solve` call.
    pub fn final_conflict(&self) -> &[Lit] {
        &self.conflict
    }

    pub const fn ok(&self) -> bool {
        self.ok
    }

    pub const fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The recorded certificate log (empty unless proof generation is
    /// enabled).
    pub fn proof(&self) -> &[Vec<isize>] {
        &self.proof
    }

    pub(crate) fn progress_estimate(&self) -> f64 {
        let mut progress = 0.0;
        let f = 1.0 / self.vars.len() as f64;
        for i in 0..=self.decision_level() {
            let beg = if i == 0 { 0 } else { self.trail_lim[i - 1] };
            let end = if i == self.decision_level() { self.trail.len() } else { self.trail_lim[i] };
            progress += f.powi(i32::try_from(i).unwrap_or(i32::MAX)) * (end - beg) as f64;
        }
        progress / self.vars.len() as f64
    }
}

/// Converts an internal literal to its 1-based signed DIMACS form.
pub(crate) fn dimacs_lit(l: Lit) -> isize {
    (var(l).0 as isize + 1) * (-2 * isize::from(sign(l)) + 1)
}

fn remove_watcher(lists: &mut WatchLists, lit: Lit, clause_ref: ClauseRef) {
    let list = lists.get_mut(lit);
    if let Some((index, _)) = list.iter().find_position(|w| w.clause_ref == clause_ref) {
        list.remove(index);
    }
}

impl std::fmt::Debug for CoreSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ok: {}\nqhead: {}\n#clauses: {}\n#learnts: {}\n#vars: {}\n#orderheap: {}\n#trail: {}\n#trail_lim: {}\nmodel: {}\nconflict: {}\nassumptions: {}\ncla_inc: {}\n#clause lits: {}\n#learnts lits: {}",
            self.ok,
            self.qhead,
            self.clauses.len(),
            self.learnts.len(),
            self.vars.len(),
            self.order_heap.len(),
            self.trail.len(),
            self.trail_lim.len(),
            self.model.len(),
            self.conflict.len(),
            self.assumptions.len(),
            self.cla_inc,
            self.clauses_literals,
            self.learnts_literals
        )
    }
}
