//! # weightsat-format
//!
//! Formula model and file format parsing for weightsat.
//!
//! Supports:
//! - **Formula**: immutable weighted CNF with 1-based variables
//! - **Weighted DIMACS**: DIMACS CNF extended with a `w` weights line
//! - **Assignment**: total truth assignments and solver model files

pub mod assignment;
pub mod dimacs;
pub mod formula;

pub use assignment::Assignment;
pub use dimacs::parse_model;
pub use formula::{Clause, Formula, MAX_SCORE};
