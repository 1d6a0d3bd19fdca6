//! Subcommands.

pub mod solve;
pub mod verify;

use weightsat_format::Assignment;

/// Formats a model as a DIMACS `v` line.
pub fn model_line(assignment: &Assignment) -> String {
    let mut line = String::from("v");
    for lit in assignment.to_dimacs() {
        line.push(' ');
        line.push_str(&lit.to_string());
    }
    line.push_str(" 0");
    line
}
