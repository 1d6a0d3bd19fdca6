//! Solve command.

use super::model_line;
use crate::config::AnnealingArgs;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use weightsat_format::Formula;
use weightsat_search::{AnnealingSolver, BnbOutcome, BranchAndBound};

/// Search method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Exact branch and bound
    Bnb,
    /// Simulated annealing
    Anneal,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Weighted DIMACS input file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Search method
    #[arg(short, long, value_enum, default_value_t = Method::Bnb)]
    pub method: Method,

    /// Output file for the model
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a JSON report instead of DIMACS-style lines
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub annealing: AnnealingArgs,
}

/// Machine-readable result of a run.
#[derive(Serialize)]
struct Report {
    method: Method,
    status: &'static str,
    weight: Option<u64>,
    satisfied_clauses: Option<usize>,
    num_clauses: usize,
    model: Option<Vec<i64>>,
    elapsed_secs: f64,
    stats: serde_json::Value,
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    tracing::info!("Loading problem from {:?}", args.input);
    let formula = Formula::from_path(&args.input)?;
    tracing::info!(
        "Problem: {} variables, {} clauses",
        formula.n_vars(),
        formula.num_clauses()
    );

    let start = Instant::now();
    let (status, solution, stats) = match args.method {
        Method::Bnb => {
            let mut solver = BranchAndBound::new(&formula);
            let outcome = solver.run();
            let stats = serde_json::to_value(solver.stats())?;
            match outcome {
                BnbOutcome::Optimal(solution) => ("OPTIMUM FOUND", Some(solution), stats),
                BnbOutcome::Unsatisfiable => ("UNSATISFIABLE", None, stats),
            }
        }
        Method::Anneal => {
            let config = args.annealing.load()?;
            let mut solver = AnnealingSolver::new(&formula, config)?;
            let result = solver.run();
            let stats = serde_json::to_value(solver.stats())?;
            let status = if result.solution.is_satisfying() {
                "SATISFIABLE"
            } else {
                "UNKNOWN"
            };
            (status, Some(result.solution), stats)
        }
    };
    let elapsed = start.elapsed();
    tracing::info!("Solved in {:?}", elapsed);

    if let (Some(output), Some(solution)) = (&args.output, &solution) {
        fs::write(output, format!("{}\n", model_line(&solution.assignment)))?;
    }

    if args.json {
        let report = Report {
            method: args.method,
            status,
            weight: solution.as_ref().map(|s| s.weight),
            satisfied_clauses: solution.as_ref().map(|s| s.satisfied_clauses),
            num_clauses: formula.num_clauses(),
            model: solution.as_ref().map(|s| s.assignment.to_dimacs()),
            elapsed_secs: elapsed.as_secs_f64(),
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("s {}", status);
    if let Some(solution) = &solution {
        println!("o {}", solution.weight);
        println!("{}", model_line(&solution.assignment));
    }
    println!("c Time: {:.3}s", elapsed.as_secs_f64());

    Ok(())
}
