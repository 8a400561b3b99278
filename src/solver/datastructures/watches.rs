use crate::collections::VEC_INIT_SIZE;

use super::arena::ClauseArena;
use super::types::{Lit, Watcher};

/// Watch lists keyed by literal, with lazy deletion.
///
/// Removing a clause from the database outside propagation only marks
/// the affected lists dirty (`smudge`); the stale watcher entries are
/// swept by `clean_all`, which the propagator runs before its loop.
#[derive(Debug, Default)]
pub struct WatchLists {
    lists: Vec<Vec<Watcher>>,
    dirty: Vec<bool>,
    dirties: Vec<Lit>,
}

impl WatchLists {
    pub fn new() -> Self {
        Self { lists: Vec::new(), dirty: Vec::new(), dirties: Vec::new() }
    }

    /// Registers the two literals of a freshly created variable.
    pub fn init_var(&mut self) {
        self.lists.push(Vec::with_capacity(VEC_INIT_SIZE));
        self.lists.push(Vec::with_capacity(VEC_INIT_SIZE));
        self.dirty.push(false);
        self.dirty.push(false);
    }

    pub fn get(&self, lit: Lit) -> &Vec<Watcher> {
        &self.lists[lit.0]
    }

    pub fn get_mut(&mut self, lit: Lit) -> &mut Vec<Watcher> {
        &mut self.lists[lit.0]
    }

    pub fn push(&mut self, lit: Lit, watcher: Watcher) {
        self.lists[lit.0].push(watcher);
    }

    /// Marks the list of `lit` as containing stale entries.
    pub fn smudge(&mut self, lit: Lit) {
        if !self.dirty[lit.0] {
            self.dirty[lit.0] = true;
            self.dirties.push(lit);
        }
    }

    /// Sweeps all smudged lists, dropping watchers whose clause carries
    /// the deletion tombstone.
    pub fn clean_all(&mut self, arena: &ClauseArena) {
        for i in 0..self.dirties.len() {
            let lit = self.dirties[i];
            // a list may have been smudged more than once before this sweep
            if self.dirty[lit.0] {
                self.lists[lit.0].retain(|w| !arena.get(w.clause_ref).deleted);
                self.dirty[lit.0] = false;
            }
        }
        self.dirties.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::super::arena::ClauseArena;
    use super::super::types::{Lit, Watcher};
    use super::WatchLists;

    #[test]
    fn test_smudge_and_clean() {
        let mut arena = ClauseArena::new();
        let keep = arena.alloc(vec![Lit(0), Lit(2)], false);
        let gone = arena.alloc(vec![Lit(1), Lit(3)], false);

        let mut watches = WatchLists::new();
        watches.init_var();
        watches.init_var();
        let p = Lit(1);
        watches.push(p, Watcher { clause_ref: keep, blocker: Lit(2) });
        watches.push(p, Watcher { clause_ref: gone, blocker: Lit(3) });

        arena.free(gone);
        watches.smudge(p);
        watches.smudge(p);
        watches.clean_all(&arena);

        assert_eq!(watches.get(p).len(), 1);
        assert_eq!(watches.get(p)[0].clause_ref, keep);
        // a second sweep is a no-op
        watches.clean_all(&arena);
        assert_eq!(watches.get(p).len(), 1);
    }
}
