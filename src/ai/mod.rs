pub mod eval;
pub mod search;
pub mod weights;
