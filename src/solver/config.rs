/// Top-level solver configuration, constructed once at solver creation.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    pub proof_generation: bool,
    pub incremental: bool,
    pub clause_minimization: ClauseMinimization,
    pub initial_phase: bool,
    pub low_level_config: LowLevelConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self {
            proof_generation: false,
            incremental: false,
            clause_minimization: ClauseMinimization::Deep,
            initial_phase: false,
            low_level_config: LowLevelConfig::new(),
        }
    }

    pub const fn proof_generation(&self) -> bool {
        self.proof_generation
    }

    #[must_use]
    pub const fn with_proof_generation(mut self, proof_generation: bool) -> Self {
        self.proof_generation = proof_generation;
        self
    }

    pub const fn incremental(&self) -> bool {
        self.incremental
    }

    #[must_use]
    pub const fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub const fn clause_minimization(&self) -> ClauseMinimization {
        self.clause_minimization
    }

    #[must_use]
    pub const fn with_clause_minimization(mut self, clause_minimization: ClauseMinimization) -> Self {
        self.clause_minimization = clause_minimization;
        self
    }

    pub const fn initial_phase(&self) -> bool {
        self.initial_phase
    }

    #[must_use]
    pub const fn with_initial_phase(mut self, initial_phase: bool) -> Self {
        self.initial_phase = initial_phase;
        self
    }

    pub const fn low_level_config(&self) -> &LowLevelConfig {
        &self.low_level_config
    }

    #[must_use]
    pub const fn with_low_level_config(mut self, low_level_config: LowLevelConfig) -> Self {
        self.low_level_config = low_level_config;
        self
    }
}

/// Conflict-clause minimization strength (the `ccmin-mode` option:
/// 0 = none, 1 = basic, 2 = deep).
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum ClauseMinimization {
    None,
    Basic,
    Deep,
}

/// Glucose-level tuning knobs. The defaults are the published magic
/// constants; change them only with benchmarks in hand.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq)]
pub struct LowLevelConfig {
    var_decay: f64,
    max_var_decay: f64,
    var_inc: f64,
    /// Multiplier applied to activity bumps of high-centrality variables
    /// during the warm-up phase.
    var_inc_centrality: f64,
    /// Number of decisions after which the centrality bump switches off.
    decision_warmup: u64,
    clause_decay: f64,
    random_var_freq: f64,
    random_seed: u64,
    rnd_pol: bool,
    lb_lbd_minimizing_clause: usize,
    lb_lbd_frozen_clause: usize,
    lb_size_minimizing_clause: usize,
    first_reduce_db: usize,
    special_inc_reduce_db: usize,
    inc_reduce_db: usize,
    factor_k: f64,
    factor_r: f64,
    size_lbd_queue: usize,
    size_trail_queue: usize,
    reduce_on_size: bool,
    reduce_on_size_size: usize,
    phase_saving: usize,
    garbage_frac: f64,
    use_unary_watches: bool,
    promote_one_watched: bool,
    remove_satisfied: bool,
}

impl Default for LowLevelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LowLevelConfig {
    pub const fn new() -> Self {
        Self {
            var_decay: 0.8,
            max_var_decay: 0.95,
            var_inc: 1.0,
            var_inc_centrality: 1.1,
            decision_warmup: 100_000,
            clause_decay: 0.999,
            random_var_freq: 0.0,
            random_seed: 91_648_253,
            rnd_pol: false,
            lb_lbd_minimizing_clause: 6,
            lb_lbd_frozen_clause: 30,
            lb_size_minimizing_clause: 30,
            first_reduce_db: 2000,
            special_inc_reduce_db: 1000,
            inc_reduce_db: 300,
            factor_k: 0.8,
            factor_r: 1.4,
            size_lbd_queue: 50,
            size_trail_queue: 5000,
            reduce_on_size: false,
            reduce_on_size_size: 12,
            phase_saving: 2,
            garbage_frac: 0.20,
            use_unary_watches: false,
            promote_one_watched: true,
            remove_satisfied: true,
        }
    }

    pub const fn var_decay(&self) -> f64 {
        self.var_decay
    }

    #[must_use]
    pub const fn with_var_decay(mut self, var_decay: f64) -> Self {
        self.var_decay = var_decay;
        self
    }

    pub const fn max_var_decay(&self) -> f64 {
        self.max_var_decay
    }

    #[must_use]
    pub const fn with_max_var_decay(mut self, max_var_decay: f64) -> Self {
        self.max_var_decay = max_var_decay;
        self
    }

    pub const fn var_inc(&self) -> f64 {
        self.var_inc
    }

    #[must_use]
    pub const fn with_var_inc(mut self, var_inc: f64) -> Self {
        self.var_inc = var_inc;
        self
    }

    pub const fn var_inc_centrality(&self) -> f64 {
        self.var_inc_centrality
    }

    #[must_use]
    pub const fn with_var_inc_centrality(mut self, var_inc_centrality: f64) -> Self {
        self.var_inc_centrality = var_inc_centrality;
        self
    }

    pub const fn decision_warmup(&self) -> u64 {
        self.decision_warmup
    }

    #[must_use]
    pub const fn with_decision_warmup(mut self, decision_warmup: u64) -> Self {
        self.decision_warmup = decision_warmup;
        self
    }

    pub const fn clause_decay(&self) -> f64 {
        self.clause_decay
    }

    #[must_use]
    pub const fn with_clause_decay(mut self, clause_decay: f64) -> Self {
        self.clause_decay = clause_decay;
        self
    }

    pub const fn random_var_freq(&self) -> f64 {
        self.random_var_freq
    }

    #[must_use]
    pub const fn with_random_var_freq(mut self, random_var_freq: f64) -> Self {
        self.random_var_freq = random_var_freq;
        self
    }

    pub const fn random_seed(&self) -> u64 {
        self.random_seed
    }

    #[must_use]
    pub const fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    pub const fn rnd_pol(&self) -> bool {
        self.rnd_pol
    }

    #[must_use]
    pub const fn with_rnd_pol(mut self, rnd_pol: bool) -> Self {
        self.rnd_pol = rnd_pol;
        self
    }

    pub const fn lb_lbd_minimizing_clause(&self) -> usize {
        self.lb_lbd_minimizing_clause
    }

    #[must_use]
    pub const fn with_lb_lbd_minimizing_clause(mut self, lb_lbd_minimizing_clause: usize) -> Self {
        self.lb_lbd_minimizing_clause = lb_lbd_minimizing_clause;
        self
    }

    pub const fn lb_lbd_frozen_clause(&self) -> usize {
        self.lb_lbd_frozen_clause
    }

    #[must_use]
    pub const fn with_lb_lbd_frozen_clause(mut self, lb_lbd_frozen_clause: usize) -> Self {
        self.lb_lbd_frozen_clause = lb_lbd_frozen_clause;
        self
    }

    pub const fn lb_size_minimizing_clause(&self) -> usize {
        self.lb_size_minimizing_clause
    }

    #[must_use]
    pub const fn with_lb_size_minimizing_clause(mut self, lb_size_minimizing_clause: usize) -> Self {
        self.lb_size_minimizing_clause = lb_size_minimizing_clause;
        self
    }

    pub const fn first_reduce_db(&self) -> usize {
        self.first_reduce_db
    }

    #[must_use]
    pub const fn with_first_reduce_db(mut self, first_reduce_db: usize) -> Self {
        self.first_reduce_db = first_reduce_db;
        self
    }

    pub const fn special_inc_reduce_db(&self) -> usize {
        self.special_inc_reduce_db
    }

    #[must_use]
    pub const fn with_special_inc_reduce_db(mut self, special_inc_reduce_db: usize) -> Self {
        self.special_inc_reduce_db = special_inc_reduce_db;
        self
    }

    pub const fn inc_reduce_db(&self) -> usize {
        self.inc_reduce_db
    }

    #[must_use]
    pub const fn with_inc_reduce_db(mut self, inc_reduce_db: usize) -> Self {
        self.inc_reduce_db = inc_reduce_db;
        self
    }

    pub const fn factor_k(&self) -> f64 {
        self.factor_k
    }

    #[must_use]
    pub const fn with_factor_k(mut self, factor_k: f64) -> Self {
        self.factor_k = factor_k;
        self
    }

    pub const fn factor_r(&self) -> f64 {
        self.factor_r
    }

    #[must_use]
    pub const fn with_factor_r(mut self, factor_r: f64) -> Self {
        self.factor_r = factor_r;
        self
    }

    pub const fn size_lbd_queue(&self) -> usize {
        self.size_lbd_queue
    }

    #[must_use]
    pub const fn with_size_lbd_queue(mut self, size_lbd_queue: usize) -> Self {
        self.size_lbd_queue = size_lbd_queue;
        self
    }

    pub const fn size_trail_queue(&self) -> usize {
        self.size_trail_queue
    }

    #[must_use]
    pub const fn with_size_trail_queue(mut self, size_trail_queue: usize) -> Self {
        self.size_trail_queue = size_trail_queue;
        self
    }

    pub const fn reduce_on_size(&self) -> bool {
        self.reduce_on_size
    }

    #[must_use]
    pub const fn with_reduce_on_size(mut self, reduce_on_size: bool) -> Self {
        self.reduce_on_size = reduce_on_size;
        self
    }

    pub const fn reduce_on_size_size(&self) -> usize {
        self.reduce_on_size_size
    }

    #[must_use]
    pub const fn with_reduce_on_size_size(mut self, reduce_on_size_size: usize) -> Self {
        self.reduce_on_size_size = reduce_on_size_size;
        self
    }

    pub const fn phase_saving(&self) -> usize {
        self.phase_saving
    }

    #[must_use]
    pub const fn with_phase_saving(mut self, phase_saving: usize) -> Self {
        self.phase_saving = phase_saving;
        self
    }

    pub const fn garbage_frac(&self) -> f64 {
        self.garbage_frac
    }

    #[must_use]
    pub const fn with_garbage_frac(mut self, garbage_frac: f64) -> Self {
        self.garbage_frac = garbage_frac;
        self
    }

    pub const fn use_unary_watches(&self) -> bool {
        self.use_unary_watches
    }

    #[must_use]
    pub const fn with_use_unary_watches(mut self, use_unary_watches: bool) -> Self {
        self.use_unary_watches = use_unary_watches;
        self
    }

    pub const fn promote_one_watched(&self) -> bool {
        self.promote_one_watched
    }

    #[must_use]
    pub const fn with_promote_one_watched(mut self, promote_one_watched: bool) -> Self {
        self.promote_one_watched = promote_one_watched;
        self
    }

    pub const fn remove_satisfied(&self) -> bool {
        self.remove_satisfied
    }

    #[must_use]
    pub const fn with_remove_satisfied(mut self, remove_satisfied: bool) -> Self {
        self.remove_satisfied = remove_satisfied;
        self
    }
}
