pub mod anneal;
pub mod cost;
pub mod moves;
