pub mod core;
pub mod grid;
pub mod indices;
pub mod parser;
