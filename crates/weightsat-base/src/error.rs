//! Unified error types for weightsat.

use thiserror::Error;

/// The main error type for weightsat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The weighted DIMACS input was malformed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A formula built in code violated a structural rule.
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    /// Solver configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Violated expectations of the weighted DIMACS format.
///
/// Line numbers are 1-based and refer to the physical line of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `p` line declaring the variable count was seen before the clauses.
    #[error("missing 'p' header with a variable count")]
    MissingHeader,

    /// The `p` line had no usable third token.
    #[error("line {line}: invalid header, expected 'p <format> <n_vars> ...'")]
    InvalidHeader { line: usize },

    /// A token could not be read as an integer.
    #[error("line {line}: invalid token '{token}'")]
    InvalidToken { line: usize, token: String },

    /// A literal refers to a variable outside `[1, n_vars]`.
    #[error("line {line}: variable {var} is outside the declared range 1..={n_vars}")]
    VariableOutOfRange { line: usize, var: u64, n_vars: usize },

    /// No `w` line was present.
    #[error("missing 'w' weights line")]
    MissingWeights,

    /// The `w` line did not carry exactly one weight per variable.
    #[error("weights line has {found} entries, expected {expected}")]
    WeightArity { expected: usize, found: usize },

    /// More than one `w` line was present.
    #[error("line {line}: duplicate 'w' weights line")]
    DuplicateWeights { line: usize },

    /// The weights are too large to score every assignment exactly.
    #[error("weights sum to more than the supported maximum score of {max}")]
    WeightOverflow { max: u64 },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts() {
        let err: Error = ParseError::WeightArity { expected: 3, found: 2 }.into();
        assert!(matches!(err, Error::Parse(ParseError::WeightArity { .. })));
        assert_eq!(
            err.to_string(),
            "Parse error: weights line has 2 entries, expected 3"
        );
    }
}
