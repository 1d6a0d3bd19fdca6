//! # weightsat-base
//!
//! Core types and utilities shared by the weightsat crates.
//!
//! This crate provides the foundational building blocks used across all other
//! weightsat crates, including:
//!
//! - **Types**: variable and clause identifiers, weights, literals
//! - **Error Types**: unified error handling across parsing and solving

pub mod error;
pub mod types;

pub use error::{Error, ParseError, Result};
pub use types::{ClauseId, Literal, VarId, Weight};
