mod community_reader;
mod dimacs_reader;

pub use community_reader::{read_centrality, read_communities};
pub use dimacs_reader::{load_cnf, read_cnf, DimacsFormula};
