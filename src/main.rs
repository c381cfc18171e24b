use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cnfsat::{
    dimacs::{read_dimacs, write_dimacs},
    generator::Generator,
    report::print_summary,
    verify::verify,
    DavisPutnam, Resolution, Solver, CNF, DPLL,
};
use colored::Colorize;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::PathBuf, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Resolution,
    #[value(name = "dp")]
    DavisPutnam,
    Dpll,
}

/// Decide satisfiability of a CNF formula by resolution, Davis-Putnam and DPLL
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// DIMACS CNF file. A random formula is generated if omitted.
    input: Option<PathBuf>,

    /// Variables of the generated formula
    #[arg(long, default_value_t = 5)]
    variables: u32,
    /// Clauses of the generated formula
    #[arg(long, default_value_t = 10)]
    clauses: usize,
    /// Literals per clause of the generated formula
    #[arg(long, default_value_t = 3)]
    clause_size: usize,
    /// Only generate clauses satisfied by a hidden assignment
    #[arg(long)]
    planted: bool,
    /// Seed of the generator, random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Write the generated formula in DIMACS format
    #[arg(long)]
    save_generated: Option<PathBuf>,

    #[arg(long, value_enum, value_delimiter = ',', default_value = "resolution,dp,dpll")]
    algorithms: Vec<Algorithm>,
    #[arg(long, default_value_t = 30.0)]
    resolution_timeout_secs: f64,
    #[arg(long, default_value_t = 30.0)]
    dp_timeout_secs: f64,
    #[arg(long, default_value_t = 3600.0)]
    dpll_timeout_secs: f64,

    /// Assign pure literals in DPLL
    #[arg(long)]
    pure_literal: bool,
    /// Maximum decision depth of DPLL
    #[arg(long)]
    max_depth: Option<usize>,
    /// Skip checking the DPLL model against the formula
    #[arg(long)]
    no_verify: bool,
    /// Write all reports as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn load(args: &Args) -> Result<CNF> {
    if let Some(path) = &args.input {
        return read_dimacs(path);
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let generator = Generator {
        num_variables: args.variables,
        num_clauses: args.clauses,
        clause_size: args.clause_size,
        planted: args.planted,
    };
    eprintln!(
        "{:>18} {}-CNF with {} variables and {} clauses (seed = {})",
        "Generating".bold().blue(),
        generator.clause_size,
        generator.num_variables,
        generator.num_clauses,
        seed
    );
    let (cnf, _hidden) = generator.generate(&mut StdRng::seed_from_u64(seed))?;

    if let Some(path) = &args.save_generated {
        let comment = format!(
            "Random {}-CNF, seed = {}{}",
            generator.clause_size,
            seed,
            if generator.planted { ", planted" } else { "" }
        );
        fs::write(path, write_dimacs(&cnf, &comment))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{:>18} {}", "Saved".bold().blue(), path.display());
    }
    Ok(cnf)
}

fn timeout(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| format!("Invalid timeout: {}", secs))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cnf = load(&args)?;
    eprintln!(
        "{:>18} {} variables, {} clauses",
        "Formula".bold().magenta(),
        cnf.num_variables(),
        cnf.len()
    );

    let mut reports = Vec::new();
    for algorithm in &args.algorithms {
        let (mut solver, timeout): (Box<dyn Solver>, Duration) = match algorithm {
            Algorithm::Resolution => (
                Box::new(Resolution::default()),
                timeout(args.resolution_timeout_secs)?,
            ),
            Algorithm::DavisPutnam => (
                Box::new(DavisPutnam::default()),
                timeout(args.dp_timeout_secs)?,
            ),
            Algorithm::Dpll => (
                Box::new(DPLL {
                    pure_literal: args.pure_literal,
                    max_depth: args.max_depth,
                }),
                timeout(args.dpll_timeout_secs)?,
            ),
        };

        eprintln!("{:>18} {}", "Solving".bold().blue(), solver.name());
        let report = solver.solve(&cnf, timeout)?;
        report.print();

        if let Some(model) = &report.model {
            if !args.no_verify {
                verify(&cnf, model)
                    .with_context(|| format!("{} model does not satisfy the formula", report.solver))?;
                eprintln!("{:>18} model satisfies every clause", "Verified".bold().green());
            }
        }
        reports.push(report);
    }

    print_summary(&reports);

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
