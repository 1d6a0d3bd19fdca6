//! Total truth assignments, the output of every solver.

use serde::{Deserialize, Serialize};
use std::fmt;
use weightsat_base::{Error, Literal, Result, VarId};

/// A value for every variable `1..=n_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// `values[i]` is the value of variable `i + 1`.
    values: Vec<bool>,
}

impl Assignment {
    /// Creates an assignment from values of variables `1..=values.len()`.
    pub fn from_values(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Creates an assignment with every variable false.
    pub fn all_false(n_vars: usize) -> Self {
        Self {
            values: vec![false; n_vars],
        }
    }

    /// Builds an assignment from DIMACS literals.
    ///
    /// Variables not mentioned are false. A trailing `0` is allowed.
    pub fn from_dimacs(n_vars: usize, literals: &[i64]) -> Result<Self> {
        let mut values = vec![false; n_vars];
        for lit in literals.iter().filter_map(|&l| Literal::from_dimacs(l)) {
            if lit.var > n_vars {
                return Err(Error::InvalidFormula(format!(
                    "model assigns variable {} outside 1..={n_vars}",
                    lit.var
                )));
            }
            values[lit.var - 1] = !lit.negated;
        }
        Ok(Self { values })
    }

    /// Number of variables covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment covers no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `var` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `var` is 0 or larger than [`len`](Self::len).
    pub fn value(&self, var: VarId) -> bool {
        self.values[var - 1]
    }

    /// Iterates `(var, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, bool)> + '_ {
        self.values.iter().enumerate().map(|(i, &v)| (i + 1, v))
    }

    /// Variables set true.
    pub fn true_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.iter().filter(|&(_, v)| v).map(|(var, _)| var)
    }

    /// DIMACS literals, one per variable, without the trailing `0`.
    pub fn to_dimacs(&self) -> Vec<i64> {
        self.iter()
            .map(|(var, v)| if v { var as i64 } else { -(var as i64) })
            .collect()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (var, val) in self.iter() {
            if var > 1 {
                write!(f, ", ")?;
            }
            write!(f, "x{} = {}", var, u8::from(val))?;
        }
        write!(f, "]")
    }
}
