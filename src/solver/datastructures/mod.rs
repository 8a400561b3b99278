mod arena;
mod bounded_queue;
mod heap;
mod types;
mod watches;

pub use arena::ClauseArena;
pub use bounded_queue::BoundedQueue;
pub use heap::VarOrderHeap;
pub use types::{mk_lit, not, sign, var, Clause, ClauseRef, Lit, Tristate, Var, Variable, Watcher};
pub use watches::WatchLists;
