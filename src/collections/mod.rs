mod vector_functions;

pub use vector_functions::*;

pub const VEC_INIT_SIZE: usize = 5;
