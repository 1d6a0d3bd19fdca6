//! Verify command.

use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use weightsat_format::{parse_model, Formula};

#[derive(Args)]
pub struct VerifyArgs {
    /// Weighted DIMACS input file
    pub input: PathBuf,

    /// Model file with `v` lines
    pub model: PathBuf,
}

pub fn run(args: VerifyArgs) -> anyhow::Result<()> {
    let formula = Formula::from_path(&args.input)?;
    let assignment = parse_model(File::open(&args.model)?, formula.n_vars())?;

    let satisfied = formula.count_satisfied(&assignment);
    let weight = formula.weight_of(&assignment);
    println!("c {}/{} clauses satisfied", satisfied, formula.num_clauses());
    println!("o {}", weight);

    if satisfied != formula.num_clauses() {
        let first = formula
            .clauses()
            .iter()
            .position(|clause| !clause.is_satisfied_by(&assignment));
        if let Some(clause) = first {
            tracing::info!("First falsified clause: {} ({})", clause, formula.clauses()[clause]);
        }
        println!("s NOT SATISFIED");
        anyhow::bail!(
            "model falsifies {} of {} clauses",
            formula.num_clauses() - satisfied,
            formula.num_clauses()
        );
    }

    println!("s SATISFIED");
    Ok(())
}
