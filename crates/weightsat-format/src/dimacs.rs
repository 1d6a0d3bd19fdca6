//! Weighted DIMACS CNF parser.
//!
//! Standard DIMACS extended with a `w` line listing one weight per variable:
//!
//! ```text
//! c comment
//! p cnf 3 3
//! w 5 1 10 0
//! 1 2 0
//! -1 3 0
//! -2 -3 0
//! ```
//!
//! Lines starting with `c` or `%` are comments. Clauses may span lines and
//! the terminating `0` of the final clause is optional.

use crate::assignment::Assignment;
use crate::formula::{Clause, Formula, MAX_SCORE};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use weightsat_base::{Error, Literal, ParseError, Result, Weight};

impl Formula {
    /// Parses weighted DIMACS from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut n_vars: Option<usize> = None;
        let mut weights: Option<Vec<Weight>> = None;
        let mut clauses = Vec::new();
        let mut clause: Vec<Literal> = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_no = idx + 1;

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
                continue;
            }

            if line.starts_with('p') {
                let count = line
                    .split_whitespace()
                    .nth(2)
                    .and_then(|t| t.parse::<usize>().ok())
                    .ok_or(ParseError::InvalidHeader { line: line_no })?;
                n_vars = Some(count);
                continue;
            }

            if line.starts_with('w') {
                if weights.is_some() {
                    return Err(ParseError::DuplicateWeights { line: line_no }.into());
                }
                weights = Some(parse_weights(line, line_no)?);
                continue;
            }

            let declared = n_vars.ok_or(ParseError::MissingHeader)?;
            for token in line.split_whitespace() {
                let value: i64 = token.parse().map_err(|_| ParseError::InvalidToken {
                    line: line_no,
                    token: token.to_string(),
                })?;
                match Literal::from_dimacs(value) {
                    None => {
                        if !clause.is_empty() {
                            clauses.push(Clause::new(clause.drain(..)));
                        }
                    }
                    Some(lit) if lit.var > declared => {
                        return Err(ParseError::VariableOutOfRange {
                            line: line_no,
                            var: value.unsigned_abs(),
                            n_vars: declared,
                        }
                        .into());
                    }
                    Some(lit) => clause.push(lit),
                }
            }
        }
        // Final clause without a terminating 0
        if !clause.is_empty() {
            clauses.push(Clause::new(clause));
        }

        let n_vars = n_vars.ok_or(ParseError::MissingHeader)?;
        let weights = weights.ok_or(ParseError::MissingWeights)?;
        if weights.len() != n_vars {
            return Err(ParseError::WeightArity {
                expected: n_vars,
                found: weights.len(),
            }
            .into());
        }
        if Formula::score_bound(&weights, clauses.len()).is_none() {
            return Err(ParseError::WeightOverflow { max: MAX_SCORE }.into());
        }

        tracing::debug!("Parsed weighted DIMACS: {} vars, {} clauses", n_vars, clauses.len());
        Ok(Self::from_parts(n_vars, weights, clauses))
    }

    /// Parses weighted DIMACS from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

/// Reads the tokens between `w` and the trailing terminator.
fn parse_weights(line: &str, line_no: usize) -> Result<Vec<Weight>> {
    let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
    let body = match tokens.split_last() {
        Some((_terminator, body)) => body,
        None => &[],
    };
    body.iter()
        .map(|t| {
            t.parse::<Weight>().map_err(|_| {
                Error::from(ParseError::InvalidToken {
                    line: line_no,
                    token: (*t).to_string(),
                })
            })
        })
        .collect()
}

/// Reads a solver model: `v` lines of DIMACS literals, as printed by the CLI.
///
/// Lines starting with `c`, `s` or `o` are ignored. Variables that are not
/// mentioned are false.
pub fn parse_model<R: Read>(reader: R, n_vars: usize) -> Result<Assignment> {
    let reader = BufReader::new(reader);
    let mut literals = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let Some(rest) = line.strip_prefix('v') else {
            continue;
        };
        for token in rest.split_whitespace() {
            let lit: i64 = token.parse().map_err(|_| ParseError::InvalidToken {
                line: idx + 1,
                token: token.to_string(),
            })?;
            literals.push(lit);
        }
    }

    Assignment::from_dimacs(n_vars, &literals)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r"
c Three clause example
p cnf 3 3
w 5 1 10 0
1 2 0
-1 3 0
-2 -3 0
";

    #[test]
    fn test_parse_weighted_dimacs() {
        let f: Formula = EXAMPLE.parse().unwrap();
        assert_eq!(f.n_vars(), 3);
        assert_eq!(f.num_clauses(), 3);
        assert_eq!(f.weights(), &[0, 5, 1, 10]);
        assert_eq!(f.clauses()[1].literals(), &[Literal::neg(1), Literal::pos(3)]);
    }

    #[test]
    fn test_clause_spanning_lines_and_open_final_clause() {
        let input = "p cnf 3 2\nw 1 1 1 0\n1 -2\n3 0 2\n-3";
        let f: Formula = input.parse().unwrap();
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(f.clauses()[0].size(), 3);
        assert_eq!(f.clauses()[1].literals(), &[Literal::pos(2), Literal::neg(3)]);
    }

    #[test]
    fn test_satlib_trailer_is_ignored() {
        let input = "p cnf 2 1\nw 3 4 0\n1 2 0\n%\n0\n\n";
        let f: Formula = input.parse().unwrap();
        assert_eq!(f.num_clauses(), 1);
    }

    #[test]
    fn test_missing_header() {
        let err = "w 1 0\n1 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingHeader)));
    }

    #[test]
    fn test_invalid_header() {
        let err = "p cnf\nw 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidHeader { line: 1 })));
    }

    #[test]
    fn test_missing_weights() {
        let err = "p cnf 1 1\n1 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingWeights)));
    }

    #[test]
    fn test_weight_arity() {
        let err = "p cnf 3 1\nw 1 2 0\n1 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::WeightArity { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_variable_out_of_range() {
        let err = "p cnf 2 1\nw 1 1 0\n1 -3 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::VariableOutOfRange { line: 3, var: 3, n_vars: 2 })
        ));
    }

    #[test]
    fn test_weights_too_large_to_score_rejected() {
        let err = "p cnf 2 1\nw 18446744073709551615 1 0\n1 2 0\n"
            .parse::<Formula>()
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::WeightOverflow { .. })));

        let err = "p cnf 2 2\nw 9223372036854775807 1 0\n1 2 0\n-1 0\n"
            .parse::<Formula>()
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::WeightOverflow { max: MAX_SCORE })));

        // Largest accepted total for one clause: (2^52 - 1 + 1) * 2 = 2^53.
        let ok = "p cnf 2 1\nw 4503599627370494 1 0\n1 2 0\n".parse::<Formula>().unwrap();
        assert_eq!(ok.total_weight(), (1 << 52) - 1);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = "p cnf 2 0\nw 1 -1 0\n".parse::<Formula>().unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidToken { line: 2, .. })));
    }

    #[test]
    fn test_dimacs_round_trip() {
        let f: Formula = EXAMPLE.parse().unwrap();
        let again: Formula = f.to_dimacs().parse().unwrap();
        assert_eq!(f, again);
    }

    #[test]
    fn test_parse_model() {
        let out = "s OPTIMUM FOUND\no 15\nv 1 -2\nv 3 0\n";
        let model = parse_model(out.as_bytes(), 3).unwrap();
        assert_eq!(model.to_dimacs(), vec![1, -2, 3]);
    }
}
